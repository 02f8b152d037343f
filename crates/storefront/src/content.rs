//! Markdown content: static pages, blog posts and SEO landing registries.
//!
//! Everything under the content directory is loaded once at startup, front
//! matter parsed with `gray_matter` and bodies rendered with `comrak`:
//!
//! ```text
//! content/
//!   pages/{slug}.md              about-us, custom, consultation
//!   blog/YYYY-MM-DD-{slug}.md    posts, newest first
//!   collections/{slug}.md        SEO collection landings, by `position`
//!   price/{slug}.md              price-tier landings, by `position`
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, LazyLock};

use chrono::NaiveDate;
use comrak::{Options, markdown_to_html};
use gray_matter::{Matter, ParsedEntity, engine::YAML};
use regex::Regex;
use serde::Deserialize;
use serde::de::DeserializeOwned;

/// Metadata for static pages.
#[derive(Debug, Clone, Deserialize)]
pub struct PageMeta {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Metadata for blog posts.
#[derive(Debug, Clone, Deserialize)]
pub struct PostMeta {
    pub title: String,
    pub description: String,
    pub meta_description: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub published_at: NaiveDate,
    pub author: String,
    pub category: String,
    #[serde(default)]
    pub related_posts: Vec<String>,
    #[serde(default)]
    pub featured_image: Option<String>,
}

/// A breadcrumb declared in front matter.
#[derive(Debug, Clone, Deserialize)]
pub struct CrumbMeta {
    pub name: String,
    pub href: String,
}

/// Metadata for SEO collection landings.
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionMeta {
    pub title: String,
    pub description: String,
    pub meta_description: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub h1: String,
    #[serde(default)]
    pub h2: Vec<String>,
    #[serde(default)]
    pub position: u32,
    #[serde(default)]
    pub breadcrumbs: Vec<CrumbMeta>,
    #[serde(default)]
    pub related_collections: Vec<String>,
}

/// Metadata for price-tier landings.
#[derive(Debug, Clone, Deserialize)]
pub struct PriceMeta {
    pub title: String,
    pub description: String,
    pub meta_description: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub h1: String,
    /// Upper bound in dollars; `0` means no bound.
    #[serde(default)]
    pub max_price: f64,
    #[serde(default)]
    pub position: u32,
    #[serde(default)]
    pub breadcrumbs: Vec<CrumbMeta>,
}

/// A rendered page.
#[derive(Debug, Clone)]
pub struct Page {
    pub slug: String,
    pub meta: PageMeta,
    pub content_html: String,
}

/// A rendered blog post.
#[derive(Debug, Clone)]
pub struct Post {
    pub slug: String,
    pub meta: PostMeta,
    pub content_html: String,
    pub reading_time_minutes: u32,
    /// URL segment for the category listing.
    pub category_slug: String,
}

/// An SEO collection landing.
#[derive(Debug, Clone)]
pub struct SeoCollection {
    pub slug: String,
    pub meta: CollectionMeta,
    pub content_html: String,
}

/// A price-tier landing.
#[derive(Debug, Clone)]
pub struct PricePage {
    pub slug: String,
    pub meta: PriceMeta,
    pub content_html: String,
}

impl PricePage {
    /// Upper price bound, `None` when the page has no cap.
    #[must_use]
    pub fn max_price(&self) -> Option<f64> {
        (self.meta.max_price > 0.0).then_some(self.meta.max_price)
    }
}

/// A link to another landing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LandingLink {
    pub name: String,
    pub url: String,
}

/// Content store that holds all loaded content in memory.
#[derive(Debug, Clone)]
pub struct ContentStore {
    pages: Arc<HashMap<String, Page>>,
    posts: Arc<Vec<Post>>,
    collections: Arc<Vec<SeoCollection>>,
    price_pages: Arc<Vec<PricePage>>,
}

impl ContentStore {
    /// Load all content from the filesystem.
    ///
    /// Missing subdirectories load as empty. Files with broken front matter
    /// are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if a content directory exists but cannot be read.
    pub fn load(content_dir: &Path) -> Result<Self, ContentError> {
        let pages: HashMap<String, Page> = load_entries::<PageMeta>(&content_dir.join("pages"))?
            .into_iter()
            .map(|entry| {
                let page = Page {
                    slug: entry.stem,
                    meta: entry.meta,
                    content_html: render_markdown(&entry.body),
                };
                (page.slug.clone(), page)
            })
            .collect();

        let mut posts: Vec<Post> = load_entries::<PostMeta>(&content_dir.join("blog"))?
            .into_iter()
            .map(|entry| Post {
                slug: strip_date_prefix(&entry.stem).to_string(),
                category_slug: category_slug(&entry.meta.category),
                content_html: render_markdown(&entry.body),
                reading_time_minutes: reading_time(&entry.body),
                meta: entry.meta,
            })
            .collect();
        posts.sort_by(|a, b| b.meta.published_at.cmp(&a.meta.published_at));

        let mut collections: Vec<SeoCollection> =
            load_entries::<CollectionMeta>(&content_dir.join("collections"))?
                .into_iter()
                .map(|entry| SeoCollection {
                    slug: entry.stem,
                    meta: entry.meta,
                    content_html: render_markdown(&entry.body),
                })
                .collect();
        collections.sort_by(|a, b| {
            a.meta
                .position
                .cmp(&b.meta.position)
                .then_with(|| a.slug.cmp(&b.slug))
        });

        let mut price_pages: Vec<PricePage> = load_entries::<PriceMeta>(&content_dir.join("price"))?
            .into_iter()
            .map(|entry| PricePage {
                slug: entry.stem,
                meta: entry.meta,
                content_html: render_markdown(&entry.body),
            })
            .collect();
        price_pages.sort_by(|a, b| {
            a.meta
                .position
                .cmp(&b.meta.position)
                .then_with(|| a.slug.cmp(&b.slug))
        });

        tracing::info!(
            pages = pages.len(),
            posts = posts.len(),
            collections = collections.len(),
            price_pages = price_pages.len(),
            "Content loaded"
        );

        Ok(Self {
            pages: Arc::new(pages),
            posts: Arc::new(posts),
            collections: Arc::new(collections),
            price_pages: Arc::new(price_pages),
        })
    }

    /// Get a page by slug.
    #[must_use]
    pub fn get_page(&self, slug: &str) -> Option<&Page> {
        self.pages.get(slug)
    }

    /// Get a blog post by slug.
    #[must_use]
    pub fn get_post(&self, slug: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.slug == slug)
    }

    /// All posts, newest first.
    pub fn posts(&self) -> impl Iterator<Item = &Post> {
        self.posts.iter()
    }

    /// Posts in a category, newest first.
    pub fn posts_by_category<'a>(&'a self, category_slug: &'a str) -> impl Iterator<Item = &'a Post> {
        self.posts
            .iter()
            .filter(move |p| p.category_slug == category_slug)
    }

    /// Display name for a category slug, when any post uses it.
    #[must_use]
    pub fn category_name(&self, category_slug: &str) -> Option<&str> {
        self.posts
            .iter()
            .find(|p| p.category_slug == category_slug)
            .map(|p| p.meta.category.as_str())
    }

    /// Distinct categories as `(slug, name)`, alphabetical by name.
    #[must_use]
    pub fn categories(&self) -> Vec<(&str, &str)> {
        let mut categories: Vec<(&str, &str)> = self
            .posts
            .iter()
            .map(|p| (p.category_slug.as_str(), p.meta.category.as_str()))
            .collect();
        categories.sort_by(|a, b| a.1.cmp(b.1));
        categories.dedup();
        categories
    }

    /// The posts a post links to as related, skipping unknown slugs.
    #[must_use]
    pub fn related_posts(&self, post: &Post) -> Vec<&Post> {
        post.meta
            .related_posts
            .iter()
            .filter_map(|slug| self.get_post(slug))
            .collect()
    }

    /// SEO collection landings in registry order.
    pub fn seo_collections(&self) -> impl Iterator<Item = &SeoCollection> {
        self.collections.iter()
    }

    /// Get an SEO collection landing by slug.
    #[must_use]
    pub fn get_seo_collection(&self, slug: &str) -> Option<&SeoCollection> {
        self.collections.iter().find(|c| c.slug == slug)
    }

    /// Price-tier landings in registry order.
    pub fn price_pages(&self) -> impl Iterator<Item = &PricePage> {
        self.price_pages.iter()
    }

    /// Get a price-tier landing by slug.
    #[must_use]
    pub fn get_price_page(&self, slug: &str) -> Option<&PricePage> {
        self.price_pages.iter().find(|p| p.slug == slug)
    }

    /// Resolve related landing slugs against both registries.
    #[must_use]
    pub fn landing_links(&self, slugs: &[String]) -> Vec<LandingLink> {
        slugs
            .iter()
            .filter_map(|slug| {
                if let Some(collection) = self.get_seo_collection(slug) {
                    Some(LandingLink {
                        name: collection.meta.h1.clone(),
                        url: format!("/collections/{slug}"),
                    })
                } else if let Some(page) = self.get_price_page(slug) {
                    Some(LandingLink {
                        name: page.meta.h1.clone(),
                        url: format!("/price/{slug}"),
                    })
                } else {
                    tracing::debug!(slug, "Related landing not in any registry");
                    None
                }
            })
            .collect()
    }
}

struct RawEntry<M> {
    stem: String,
    meta: M,
    body: String,
}

/// Load every `*.md` file in `dir`.
fn load_entries<M: DeserializeOwned>(dir: &Path) -> Result<Vec<RawEntry<M>>, ContentError> {
    let mut entries = Vec::new();

    if !dir.exists() {
        tracing::warn!("Content directory does not exist: {:?}", dir);
        return Ok(entries);
    }

    let listing = std::fs::read_dir(dir).map_err(|e| ContentError::Io(e.to_string()))?;

    for entry in listing.flatten() {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "md") {
            match load_entry(&path) {
                Ok(loaded) => entries.push(loaded),
                Err(e) => tracing::error!("Failed to load content {:?}: {}", path, e),
            }
        }
    }

    Ok(entries)
}

fn load_entry<M: DeserializeOwned>(path: &Path) -> Result<RawEntry<M>, ContentError> {
    let content = std::fs::read_to_string(path).map_err(|e| ContentError::Io(e.to_string()))?;

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(|| ContentError::Parse("Invalid filename".to_string()))?
        .to_string();

    let matter = Matter::<YAML>::new();
    let parsed: ParsedEntity<M> = matter
        .parse(&content)
        .map_err(|e| ContentError::Parse(format!("Failed to parse frontmatter: {e}")))?;
    let meta = parsed
        .data
        .ok_or_else(|| ContentError::Parse("Missing frontmatter".to_string()))?;

    Ok(RawEntry {
        stem,
        meta,
        body: parsed.content,
    })
}

/// `2024-01-15-my-post` -> `my-post`.
fn strip_date_prefix(stem: &str) -> &str {
    let dated = stem
        .get(..10)
        .is_some_and(|date| NaiveDate::parse_from_str(date, "%Y-%m-%d").is_ok());
    match stem.get(10..11) {
        Some("-") if dated => stem.get(11..).unwrap_or(stem),
        _ => stem,
    }
}

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid regex"));

/// Category slug: lowercase, whitespace runs to `-`.
#[must_use]
pub fn category_slug(category: &str) -> String {
    WHITESPACE_RE
        .replace_all(category.trim(), "-")
        .to_lowercase()
}

/// Estimated reading time at 200 words per minute, at least one minute.
fn reading_time(body: &str) -> u32 {
    let words = u32::try_from(body.split_whitespace().count()).unwrap_or(u32::MAX);
    words.div_ceil(200).max(1)
}

/// Render markdown to HTML with GitHub Flavored Markdown support.
///
/// Raw HTML passes through; blog bodies are authored as HTML.
fn render_markdown(content: &str) -> String {
    let mut options = Options::default();

    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.extension.header_ids = Some(String::new());

    options.render.r#unsafe = true;

    markdown_to_html(content, &options)
}

/// Content loading errors.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn store() -> ContentStore {
        let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("content");
        ContentStore::load(&dir).unwrap()
    }

    #[test]
    fn test_strip_date_prefix() {
        assert_eq!(strip_date_prefix("2024-01-15-lab-grown"), "lab-grown");
        assert_eq!(strip_date_prefix("lab-grown-vs-natural"), "lab-grown-vs-natural");
        assert_eq!(strip_date_prefix("short"), "short");
    }

    #[test]
    fn test_category_slug() {
        assert_eq!(category_slug("Buying Guides"), "buying-guides");
        assert_eq!(category_slug("  Diamond   Education "), "diamond-education");
    }

    #[test]
    fn test_reading_time() {
        assert_eq!(reading_time(""), 1);
        assert_eq!(reading_time(&"word ".repeat(401)), 3);
    }

    #[test]
    fn test_render_markdown_passes_html() {
        let html = render_markdown("<h2>Intro</h2>\n\n**bold**");
        assert!(html.contains("<h2>Intro</h2>"));
        assert!(html.contains("<strong>bold</strong>"));
    }

    #[test]
    fn test_shipped_content_loads() {
        let store = store();
        assert!(store.get_page("about-us").is_some());
        assert!(store.get_seo_collection("engagement-rings").is_some());

        let under_500 = store.get_price_page("diamond-rings-under-500").unwrap();
        assert_eq!(under_500.max_price(), Some(500.0));

        let dates: Vec<_> = store.posts().map(|p| p.meta.published_at).collect();
        let mut sorted = dates.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(dates, sorted);
    }

    #[test]
    fn test_registries_follow_position() {
        let store = store();
        let positions: Vec<_> = store.seo_collections().map(|c| c.meta.position).collect();
        assert!(positions.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_related_posts_resolve_by_slug() {
        let store = store();
        let post = store.get_post("how-to-buy-diamond-rings-online").unwrap();
        let related: Vec<_> = store.related_posts(post).iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(
            related,
            ["lab-grown-vs-natural-diamonds", "diamond-cut-color-clarity-guide"]
        );
    }

    #[test]
    fn test_landing_links_span_registries() {
        let store = store();
        let links = store.landing_links(&[
            "proposal-rings".to_string(),
            "diamond-rings-under-2000".to_string(),
            "no-such-page".to_string(),
        ]);
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].url, "/collections/proposal-rings");
        assert_eq!(links[1].url, "/price/diamond-rings-under-2000");
    }
}
