//! Page metadata: title, description, canonical URL and OpenGraph fields.

use std::sync::LazyLock;

use regex::Regex;

use crate::seo::BRAND_NAME;

/// Maximum meta description length in characters.
pub const DESCRIPTION_LIMIT: usize = 160;

/// Head metadata for a rendered page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMeta {
    /// Full `<title>`, already branded.
    pub title: String,
    pub description: String,
    /// Absolute canonical URL.
    pub canonical: Option<String>,
    pub keywords: Vec<String>,
    /// OpenGraph type, `website` unless set.
    pub og_type: &'static str,
    pub og_image: Option<String>,
    pub noindex: bool,
}

impl PageMeta {
    /// Metadata with a branded title.
    #[must_use]
    pub fn new(title: &str, description: impl Into<String>) -> Self {
        Self {
            title: branded_title(title),
            description: description.into(),
            canonical: None,
            keywords: Vec::new(),
            og_type: "website",
            og_image: None,
            noindex: false,
        }
    }

    #[must_use]
    pub fn canonical(mut self, url: impl Into<String>) -> Self {
        self.canonical = Some(url.into());
        self
    }

    #[must_use]
    pub fn keywords(mut self, keywords: &[String]) -> Self {
        self.keywords = keywords.to_vec();
        self
    }

    #[must_use]
    pub const fn og_type(mut self, og_type: &'static str) -> Self {
        self.og_type = og_type;
        self
    }

    #[must_use]
    pub fn og_image(mut self, url: Option<String>) -> Self {
        self.og_image = url;
        self
    }

    /// Mark the page as not indexable (account and auth pages).
    #[must_use]
    pub const fn noindex(mut self) -> Self {
        self.noindex = true;
        self
    }

    /// Keywords joined for the `keywords` meta tag.
    #[must_use]
    pub fn keywords_content(&self) -> String {
        self.keywords.join(", ")
    }
}

/// Append ` | Ever and Always` unless the title already names the brand.
#[must_use]
pub fn branded_title(title: &str) -> String {
    if title.is_empty() {
        BRAND_NAME.to_string()
    } else if title.contains(BRAND_NAME) {
        title.to_string()
    } else {
        format!("{title} | {BRAND_NAME}")
    }
}

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("Invalid regex"));
static SPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("Invalid regex"));

/// Plain-text description of at most `limit` characters.
///
/// Tags are stripped and whitespace collapsed. Longer text is cut at the
/// last word boundary that leaves room for a trailing `...`.
#[must_use]
pub fn truncate_description(text: &str, limit: usize) -> String {
    let stripped = TAG_RE.replace_all(text, " ");
    let collapsed = SPACE_RE.replace_all(stripped.trim(), " ");

    if collapsed.chars().count() <= limit {
        return collapsed.into_owned();
    }

    let budget = limit.saturating_sub(3);
    let cut = collapsed
        .char_indices()
        .nth(budget)
        .map_or(collapsed.len(), |(i, _)| i);
    let head = collapsed.get(..cut).unwrap_or(&collapsed);
    let head = head.rfind(' ').map_or(head, |space| head.get(..space).unwrap_or(head));

    format!("{}...", head.trim_end_matches([',', '.', ';', ':']))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_is_branded_once() {
        assert_eq!(branded_title("Engagement Rings"), "Engagement Rings | Ever and Always");
        assert_eq!(
            branded_title("Engagement Rings | Ever and Always"),
            "Engagement Rings | Ever and Always"
        );
        assert_eq!(branded_title(""), "Ever and Always");
    }

    #[test]
    fn test_short_description_untouched() {
        assert_eq!(truncate_description("<p>A  ring\nfor you</p>", 160), "A ring for you");
    }

    #[test]
    fn test_long_description_cut_on_word() {
        let text = "Brilliant diamonds set in recycled platinum. ".repeat(10);
        let out = truncate_description(&text, 60);
        assert!(out.chars().count() <= 60);
        assert!(out.ends_with("..."));
        assert!(!out.contains("  "));
        let body = out.trim_end_matches("...");
        assert!(text.starts_with(body));
        assert!(text[body.len()..].starts_with([' ', '.']));
    }

    #[test]
    fn test_builder() {
        let meta = PageMeta::new("About Us", "Our story")
            .canonical("https://everandalways.com/about-us")
            .keywords(&["diamonds".to_string(), "rings".to_string()])
            .og_type("article");
        assert_eq!(meta.title, "About Us | Ever and Always");
        assert_eq!(meta.keywords_content(), "diamonds, rings");
        assert_eq!(meta.og_type, "article");
        assert!(!meta.noindex);
    }
}
