//! Sitemap entries.

use chrono::NaiveDate;

use crate::config::StorefrontConfig;
use crate::content::ContentStore;

/// `<changefreq>` values in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFrequency {
    Daily,
    Weekly,
    Monthly,
}

impl ChangeFrequency {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

/// A `<url>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapEntry {
    /// Absolute URL.
    pub loc: String,
    pub lastmod: NaiveDate,
    pub changefreq: ChangeFrequency,
    pub priority: &'static str,
}

/// Every indexable URL: home, blog index, SEO collections, price pages,
/// then posts.
///
/// Static entries use `today` as `lastmod`, posts their publish date.
#[must_use]
pub fn sitemap_entries(
    config: &StorefrontConfig,
    content: &ContentStore,
    today: NaiveDate,
) -> Vec<SitemapEntry> {
    let entry = |path: &str, lastmod, changefreq, priority| SitemapEntry {
        loc: config.absolute_url(path),
        lastmod,
        changefreq,
        priority,
    };

    let mut entries = vec![
        entry("/", today, ChangeFrequency::Daily, "1.0"),
        entry("/blog", today, ChangeFrequency::Weekly, "0.8"),
    ];
    entries.extend(content.seo_collections().map(|c| {
        entry(
            &format!("/collections/{}", c.slug),
            today,
            ChangeFrequency::Weekly,
            "0.9",
        )
    }));
    entries.extend(content.price_pages().map(|p| {
        entry(
            &format!("/price/{}", p.slug),
            today,
            ChangeFrequency::Weekly,
            "0.8",
        )
    }));
    entries.extend(content.posts().map(|p| {
        entry(
            &format!("/blog/{}", p.slug),
            p.meta.published_at,
            ChangeFrequency::Monthly,
            "0.7",
        )
    }));

    entries
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn test_entries_in_section_order() {
        let config = StorefrontConfig::from_lookup(|key| match key {
            "VENDURE_SHOP_API_URL" => Some("http://localhost:3000/shop-api".to_string()),
            _ => None,
        })
        .unwrap();
        let content =
            ContentStore::load(&PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("content")).unwrap();
        let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();

        let entries = sitemap_entries(&config, &content, today);

        assert_eq!(entries[0].loc, "https://everandalways.com/");
        assert_eq!(entries[0].changefreq, ChangeFrequency::Daily);
        assert_eq!(entries[0].priority, "1.0");
        assert_eq!(entries[1].loc, "https://everandalways.com/blog");

        let collections = content.seo_collections().count();
        let prices = content.price_pages().count();
        let posts = content.posts().count();
        assert_eq!(entries.len(), 2 + collections + prices + posts);

        let first_price = &entries[2 + collections];
        assert!(first_price.loc.contains("/price/"));
        assert_eq!(first_price.priority, "0.8");

        let last = entries.last().unwrap();
        assert!(last.loc.contains("/blog/"));
        assert_eq!(last.changefreq, ChangeFrequency::Monthly);
        assert_ne!(last.lastmod, today);
    }
}
