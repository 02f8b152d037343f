//! Facet panel: grouping and URL toggles.

use ever_and_always_core::FacetValueId;

use crate::catalog::search::SearchParams;
use crate::vendure::FacetValueResult;

/// Facet values grouped under their facet.
#[derive(Debug, Clone)]
pub struct FacetGroup {
    /// Facet ID.
    pub id: String,
    /// Facet name, used as the group heading.
    pub name: String,
    /// Values in the order the search returned them.
    pub values: Vec<FacetOption>,
}

/// A checkbox in the facet panel.
#[derive(Debug, Clone)]
pub struct FacetOption {
    pub id: FacetValueId,
    pub name: String,
    pub count: u32,
    /// Whether the value is in the current `facets` parameter.
    pub selected: bool,
    /// URL with this value toggled.
    pub toggle_url: String,
}

/// The rendered facet panel.
#[derive(Debug, Clone)]
pub struct FacetPanel {
    pub groups: Vec<FacetGroup>,
    /// Number of selected facet values.
    pub selected_count: usize,
    /// URL without any facet selection.
    pub clear_url: String,
}

impl FacetPanel {
    /// Build the panel for `path`. `None` when the result carries no facets.
    #[must_use]
    pub fn build(values: &[FacetValueResult], path: &str, params: &SearchParams) -> Option<Self> {
        let mut groups = group_facet_values(values);
        if groups.is_empty() {
            return None;
        }

        for option in groups.iter_mut().flat_map(|g| g.values.iter_mut()) {
            option.selected = params.has_facet(&option.id);
            option.toggle_url = toggle_facet_url(path, params, &option.id);
        }

        Some(Self {
            groups,
            selected_count: params.facets().len(),
            clear_url: clear_facets_url(path, params),
        })
    }
}

/// Group facet values by facet name, groups in first-seen order.
#[must_use]
pub fn group_facet_values(values: &[FacetValueResult]) -> Vec<FacetGroup> {
    let mut groups: Vec<FacetGroup> = Vec::new();

    for item in values {
        let facet = &item.facet_value.facet;
        let option = FacetOption {
            id: item.facet_value.id.clone(),
            name: item.facet_value.name.clone(),
            count: item.count,
            selected: false,
            toggle_url: String::new(),
        };

        match groups.iter_mut().find(|g| g.name == facet.name) {
            Some(group) => group.values.push(option),
            None => groups.push(FacetGroup {
                id: facet.id.clone(),
                name: facet.name.clone(),
                values: vec![option],
            }),
        }
    }

    groups
}

/// URL with `id` added to or removed from `facets`. Always returns to page 1.
///
/// Removing keeps the remaining IDs in their original order.
#[must_use]
pub fn toggle_facet_url(path: &str, params: &SearchParams, id: &FacetValueId) -> String {
    let mut next = params.clone();

    if params.has_facet(id) {
        let remaining: Vec<String> = params
            .get_all("facets")
            .filter(|v| *v != id.as_str())
            .map(ToString::to_string)
            .collect();
        next.remove("facets");
        for value in remaining {
            next.append("facets", value);
        }
    } else {
        next.append("facets", id.as_str());
    }

    next.remove("page");
    next.to_url(path)
}

/// URL with every facet cleared. Always returns to page 1.
#[must_use]
pub fn clear_facets_url(path: &str, params: &SearchParams) -> String {
    let mut next = params.clone();
    next.remove("facets");
    next.remove("page");
    next.to_url(path)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn facet_values() -> Vec<FacetValueResult> {
        serde_json::from_value(json!([
            {"count": 4, "facetValue": {"id": "1", "name": "Gold", "facet": {"id": "10", "name": "Metal"}}},
            {"count": 2, "facetValue": {"id": "5", "name": "Oval", "facet": {"id": "11", "name": "Shape"}}},
            {"count": 7, "facetValue": {"id": "2", "name": "Platinum", "facet": {"id": "10", "name": "Metal"}}}
        ]))
        .unwrap()
    }

    #[test]
    fn test_groups_in_first_seen_order() {
        let groups = group_facet_values(&facet_values());
        let names: Vec<_> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, ["Metal", "Shape"]);
        let metal: Vec<_> = groups[0].values.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(metal, ["Gold", "Platinum"]);
        assert_eq!(groups[0].values[1].count, 7);
    }

    #[test]
    fn test_no_facets_no_panel() {
        assert!(FacetPanel::build(&[], "/search", &SearchParams::default()).is_none());
    }

    #[test]
    fn test_toggle_on_resets_page() {
        let params = SearchParams::from_query("q=ring&facets=1&page=3");
        assert_eq!(
            toggle_facet_url("/search", &params, &FacetValueId::new("5")),
            "/search?q=ring&facets=1&facets=5"
        );
    }

    #[test]
    fn test_toggle_on_then_off_restores_facets() {
        let before = SearchParams::from_query("facets=3&facets=1&facets=8");
        let added = toggle_facet_url("/search", &before, &FacetValueId::new("5"));
        let added = SearchParams::from_query(added.trim_start_matches("/search?"));
        let removed = toggle_facet_url("/search", &added, &FacetValueId::new("5"));
        let removed = SearchParams::from_query(removed.trim_start_matches("/search?"));

        assert_eq!(removed.facets(), before.facets());
    }

    #[test]
    fn test_toggle_off_keeps_order() {
        let params = SearchParams::from_query("facets=3&q=x&facets=1&facets=8");
        assert_eq!(
            toggle_facet_url("/collection/rings", &params, &FacetValueId::new("1")),
            "/collection/rings?q=x&facets=3&facets=8"
        );
    }

    #[test]
    fn test_panel_marks_selection() {
        let params = SearchParams::from_query("facets=2&page=2");
        let panel = FacetPanel::build(&facet_values(), "/search", &params).unwrap();
        assert_eq!(panel.selected_count, 1);
        assert_eq!(panel.clear_url, "/search");
        let platinum = &panel.groups[0].values[1];
        assert!(platinum.selected);
        assert_eq!(platinum.toggle_url, "/search");
    }
}
