//! Breadcrumb trails shared by the visible nav and the JSON-LD document.

use crate::config::StorefrontConfig;
use crate::content::CrumbMeta;
use crate::seo::schema::BreadcrumbListSchema;

/// One step in a trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crumb {
    pub name: String,
    /// Site path, e.g. `/blog`.
    pub href: String,
}

impl Crumb {
    #[must_use]
    pub fn new(name: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            href: href.into(),
        }
    }
}

impl From<&CrumbMeta> for Crumb {
    fn from(meta: &CrumbMeta) -> Self {
        Self::new(meta.name.clone(), meta.href.clone())
    }
}

/// A trail from the section root to the current page, without Home.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Breadcrumbs(Vec<Crumb>);

impl Breadcrumbs {
    #[must_use]
    pub const fn new(items: Vec<Crumb>) -> Self {
        Self(items)
    }

    /// Trail declared in landing page front matter.
    #[must_use]
    pub fn from_front_matter(items: &[CrumbMeta]) -> Self {
        Self(items.iter().map(Crumb::from).collect())
    }

    /// Append a step.
    #[must_use]
    pub fn then(mut self, name: impl Into<String>, href: impl Into<String>) -> Self {
        self.0.push(Crumb::new(name, href));
        self
    }

    /// The rendered trail: Home first, the current page last.
    #[must_use]
    pub fn visible(&self) -> Vec<Crumb> {
        std::iter::once(Crumb::new("Home", "/"))
            .chain(self.0.iter().cloned())
            .collect()
    }

    /// `BreadcrumbList` with absolute URLs.
    #[must_use]
    pub fn schema(&self, config: &StorefrontConfig) -> BreadcrumbListSchema {
        BreadcrumbListSchema::new(
            self.0
                .iter()
                .map(|crumb| (crumb.name.as_str(), config.absolute_url(&crumb.href))),
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_prepends_home() {
        let trail = Breadcrumbs::default()
            .then("Blog", "/blog")
            .then("Trends", "/blog/category/trends");
        let visible = trail.visible();
        assert_eq!(visible.len(), 3);
        assert_eq!(visible[0], Crumb::new("Home", "/"));
        assert_eq!(visible[2].name, "Trends");
    }

    #[test]
    fn test_schema_is_absolute_without_home() {
        let config = StorefrontConfig::from_lookup(|key| match key {
            "VENDURE_SHOP_API_URL" => Some("http://localhost:3000/shop-api".to_string()),
            "SITE_URL" => Some("https://shop.test".to_string()),
            _ => None,
        })
        .unwrap();
        let schema = Breadcrumbs::default().then("Jewelry", "/jewelry").schema(&config);
        let doc = serde_json::to_value(&schema).unwrap();
        assert_eq!(doc["itemListElement"][0]["item"], "https://shop.test/jewelry");
        assert_eq!(doc["itemListElement"].as_array().unwrap().len(), 1);
    }
}
