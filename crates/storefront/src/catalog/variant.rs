//! Variant selection from URL option parameters.
//!
//! Each option group's `code` is a query parameter whose value is an option
//! `code` (`?metal=rose-gold&size=7`). A selection resolves to a variant only
//! when every group has exactly one choice.

use std::collections::BTreeMap;

use ever_and_always_core::{OptionGroupId, OptionId, format_price};

use crate::catalog::search::SearchParams;
use crate::vendure::{Product, ProductVariant};

/// Chosen option per option group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionSelection(BTreeMap<OptionGroupId, OptionId>);

impl OptionSelection {
    /// Seed a selection from the query string.
    ///
    /// A group counts only when its code appears exactly once and names one
    /// of the group's options.
    #[must_use]
    pub fn from_query(product: &Product, params: &SearchParams) -> Self {
        let mut selection = BTreeMap::new();
        for group in &product.option_groups {
            let Some(code) = params.get_single(&group.code) else {
                continue;
            };
            if let Some(option) = group.options.iter().find(|o| o.code == code) {
                selection.insert(group.id.clone(), option.id.clone());
            }
        }
        Self(selection)
    }

    /// Number of groups with a choice.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether nothing is chosen.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The option chosen for `group`.
    #[must_use]
    pub fn get(&self, group: &OptionGroupId) -> Option<&OptionId> {
        self.0.get(group)
    }

    /// Choose `option` for `group`.
    pub fn insert(&mut self, group: OptionGroupId, option: OptionId) {
        self.0.insert(group, option);
    }
}

/// The variant matching `selection`.
///
/// Single-variant products always resolve to their variant. Otherwise every
/// option group needs a choice and the variant must carry all of them.
#[must_use]
pub fn resolve_variant<'a>(
    product: &'a Product,
    selection: &OptionSelection,
) -> Option<&'a ProductVariant> {
    if let [only] = product.variants.as_slice() {
        return Some(only);
    }

    if selection.len() != product.option_groups.len() {
        return None;
    }

    product.variants.iter().find(|variant| {
        selection
            .0
            .values()
            .all(|chosen| variant.options.iter().any(|o| &o.id == chosen))
    })
}

/// URL selecting `option_code` for `group_code`, keeping other parameters.
#[must_use]
pub fn option_url(path: &str, params: &SearchParams, group_code: &str, option_code: &str) -> String {
    let mut next = params.clone();
    next.set(group_code, option_code);
    next.to_url(path)
}

/// Add-to-cart button state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddToCartState {
    /// No variant resolved yet.
    SelectOptions,
    /// Resolved variant is out of stock.
    OutOfStock,
    /// Resolved and purchasable.
    Ready,
}

impl AddToCartState {
    /// State for a resolution result.
    #[must_use]
    pub fn for_variant(variant: Option<&ProductVariant>) -> Self {
        match variant {
            None => Self::SelectOptions,
            Some(v) if !v.stock_level.is_available() => Self::OutOfStock,
            Some(_) => Self::Ready,
        }
    }

    /// Button label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SelectOptions => "Select Options",
            Self::OutOfStock => "Out of Stock",
            Self::Ready => "Add to Cart",
        }
    }

    /// Whether the button is enabled.
    #[must_use]
    pub const fn enabled(self) -> bool {
        matches!(self, Self::Ready)
    }
}

/// An option button.
#[derive(Debug, Clone)]
pub struct OptionLink {
    pub name: String,
    pub url: String,
    pub selected: bool,
}

/// An option group with its buttons.
#[derive(Debug, Clone)]
pub struct OptionGroupView {
    pub name: String,
    pub code: String,
    /// Whether a choice has been made.
    pub chosen: bool,
    pub options: Vec<OptionLink>,
}

/// Everything the product form renders.
#[derive(Debug, Clone)]
pub struct VariantPicker {
    pub groups: Vec<OptionGroupView>,
    /// ID posted to `/cart/add`, when resolved.
    pub variant_id: Option<String>,
    /// SKU of the resolved variant.
    pub sku: Option<String>,
    /// Resolved variant's price, else the first variant's.
    pub price: Option<String>,
    pub state: AddToCartState,
}

impl VariantPicker {
    /// Build the picker for `product` under `path` (`/product/{slug}`).
    #[must_use]
    pub fn build(product: &Product, path: &str, params: &SearchParams) -> Self {
        let selection = OptionSelection::from_query(product, params);
        let resolved = resolve_variant(product, &selection);

        let groups = product
            .option_groups
            .iter()
            .map(|group| {
                let chosen = selection.get(&group.id);
                OptionGroupView {
                    name: group.name.clone(),
                    code: group.code.clone(),
                    chosen: chosen.is_some(),
                    options: group
                        .options
                        .iter()
                        .map(|option| OptionLink {
                            name: option.name.clone(),
                            url: option_url(path, params, &group.code, &option.code),
                            selected: chosen == Some(&option.id),
                        })
                        .collect(),
                }
            })
            .collect();

        let priced = resolved.or_else(|| product.variants.first());

        Self {
            groups,
            variant_id: resolved.map(|v| v.id.to_string()),
            sku: resolved.map(|v| v.sku.clone()),
            price: priced.map(|v| format_price(v.price_with_tax, &v.currency_code)),
            state: AddToCartState::for_variant(resolved),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn ring() -> Product {
        serde_json::from_value(json!({
            "id": "1",
            "name": "Classic Solitaire",
            "slug": "classic-solitaire",
            "optionGroups": [
                {"id": "g1", "code": "metal", "name": "Metal", "options": [
                    {"id": "o1", "code": "gold", "name": "Gold"},
                    {"id": "o2", "code": "silver", "name": "Silver"}
                ]},
                {"id": "g2", "code": "size", "name": "Size", "options": [
                    {"id": "o3", "code": "6", "name": "6"},
                    {"id": "o4", "code": "7", "name": "7"}
                ]}
            ],
            "variants": [
                {"id": "v1", "name": "Gold 6", "sku": "CS-G-6", "priceWithTax": 120000,
                 "currencyCode": "USD", "stockLevel": "IN_STOCK",
                 "options": [{"id": "o1", "code": "gold", "name": "Gold"}, {"id": "o3", "code": "6", "name": "6"}]},
                {"id": "v2", "name": "Gold 7", "sku": "CS-G-7", "priceWithTax": 125000,
                 "currencyCode": "USD", "stockLevel": "OUT_OF_STOCK",
                 "options": [{"id": "o1", "code": "gold", "name": "Gold"}, {"id": "o4", "code": "7", "name": "7"}]},
                {"id": "v3", "name": "Silver 6", "sku": "CS-S-6", "priceWithTax": 60000,
                 "currencyCode": "USD", "stockLevel": "LOW_STOCK",
                 "options": [{"id": "o2", "code": "silver", "name": "Silver"}, {"id": "o3", "code": "6", "name": "6"}]}
            ]
        }))
        .unwrap()
    }

    fn resolve(product: &Product, query: &str) -> Option<String> {
        let selection = OptionSelection::from_query(product, &SearchParams::from_query(query));
        resolve_variant(product, &selection).map(|v| v.sku.clone())
    }

    #[test]
    fn test_partial_selection_resolves_nothing() {
        assert_eq!(resolve(&ring(), "metal=gold"), None);
    }

    #[test]
    fn test_full_selection_resolves_variant() {
        assert_eq!(resolve(&ring(), "metal=gold&size=7").as_deref(), Some("CS-G-7"));
    }

    #[test]
    fn test_missing_combination_resolves_nothing() {
        assert_eq!(resolve(&ring(), "metal=silver&size=7"), None);
    }

    #[test]
    fn test_repeated_parameter_is_ignored() {
        assert_eq!(resolve(&ring(), "metal=gold&size=6&size=7"), None);
    }

    #[test]
    fn test_unknown_option_code_is_ignored() {
        assert_eq!(resolve(&ring(), "metal=platinum&size=6"), None);
    }

    #[test]
    fn test_single_variant_always_resolves() {
        let mut product = ring();
        product.variants.truncate(1);
        assert_eq!(resolve(&product, "").as_deref(), Some("CS-G-6"));
        assert_eq!(resolve(&product, "metal=silver&size=7").as_deref(), Some("CS-G-6"));
    }

    #[test]
    fn test_add_to_cart_states() {
        let product = ring();
        let picker = |q: &str| VariantPicker::build(&product, "/product/classic-solitaire", &SearchParams::from_query(q));

        let none = picker("metal=gold");
        assert_eq!(none.state, AddToCartState::SelectOptions);
        assert_eq!(none.state.label(), "Select Options");
        assert_eq!(none.price.as_deref(), Some("$1,200.00"));
        assert_eq!(none.variant_id, None);

        let out = picker("metal=gold&size=7");
        assert_eq!(out.state, AddToCartState::OutOfStock);
        assert!(!out.state.enabled());

        let low = picker("metal=silver&size=6");
        assert_eq!(low.state, AddToCartState::Ready);
        assert_eq!(low.sku.as_deref(), Some("CS-S-6"));
        assert_eq!(low.price.as_deref(), Some("$600.00"));
    }

    #[test]
    fn test_option_links_keep_other_groups() {
        let product = ring();
        let picker = VariantPicker::build(
            &product,
            "/product/classic-solitaire",
            &SearchParams::from_query("metal=gold"),
        );
        let size = &picker.groups[1];
        assert!(!size.chosen);
        assert_eq!(size.options[1].url, "/product/classic-solitaire?metal=gold&size=7");
        assert!(picker.groups[0].options[0].selected);
        assert_eq!(picker.groups[0].options[1].url, "/product/classic-solitaire?metal=silver");
    }
}
