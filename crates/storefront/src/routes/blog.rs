//! Blog route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use tracing::instrument;

use crate::content::Post;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{CspNonce, Shopper};
use crate::routes::layout::Layout;
use crate::seo::schema::{OrganizationDetails, OrganizationSchema};
use crate::seo::{Breadcrumbs, Crumb, PageMeta};
use crate::state::AppState;

/// A post in a listing.
#[derive(Clone)]
pub struct PostCard {
    pub url: String,
    pub title: String,
    pub description: String,
    pub published: String,
    pub author: String,
    pub category: String,
    pub category_url: String,
    pub reading_time_minutes: u32,
    pub featured_image: Option<String>,
}

impl From<&Post> for PostCard {
    fn from(post: &Post) -> Self {
        Self {
            url: format!("/blog/{}", post.slug),
            title: post.meta.title.clone(),
            description: post.meta.description.clone(),
            published: post.meta.published_at.format("%B %-d, %Y").to_string(),
            author: post.meta.author.clone(),
            category: post.meta.category.clone(),
            category_url: category_url(&post.category_slug),
            reading_time_minutes: post.reading_time_minutes,
            featured_image: post.meta.featured_image.clone(),
        }
    }
}

fn category_url(category_slug: &str) -> String {
    format!("/blog/category/{category_slug}")
}

/// Blog index and category listing template.
#[derive(Template, WebTemplate)]
#[template(path = "blog/index.html")]
pub struct BlogIndexTemplate {
    pub layout: Layout,
    pub heading: String,
    pub posts: Vec<PostCard>,
    /// `(name, url)` of every category.
    pub categories: Vec<Crumb>,
    pub breadcrumbs: Vec<Crumb>,
}

/// Blog post template.
#[derive(Template, WebTemplate)]
#[template(path = "blog/post.html")]
pub struct BlogPostTemplate {
    pub layout: Layout,
    pub post: PostCard,
    pub content_html: String,
    pub breadcrumbs: Vec<Crumb>,
    pub related: Vec<PostCard>,
}

fn category_links(state: &AppState) -> Vec<Crumb> {
    state
        .content()
        .categories()
        .into_iter()
        .map(|(slug, name)| Crumb::new(name, category_url(slug)))
        .collect()
}

/// All posts, newest first.
#[instrument(skip(state, ctx, nonce))]
pub async fn index(
    State(state): State<AppState>,
    Shopper(ctx): Shopper,
    CspNonce(nonce): CspNonce,
) -> Result<BlogIndexTemplate> {
    let meta = PageMeta::new(
        "Jewelry Blog",
        "Guides to buying diamonds, engagement rings and fine jewelry, plus the latest trends.",
    )
    .canonical(state.config().absolute_url("/blog"));
    let mut layout = Layout::load(&state, &ctx, nonce, meta, "/blog").await;

    let breadcrumbs = Breadcrumbs::default().then("Blog", "/blog");
    layout.push_jsonld(&breadcrumbs.schema(state.config()));

    Ok(BlogIndexTemplate {
        layout,
        heading: "Jewelry Blog".to_string(),
        posts: state.content().posts().map(PostCard::from).collect(),
        categories: category_links(&state),
        breadcrumbs: breadcrumbs.visible(),
    })
}

/// Posts in one category, newest first.
#[instrument(skip(state, ctx, nonce))]
pub async fn category(
    State(state): State<AppState>,
    Shopper(ctx): Shopper,
    CspNonce(nonce): CspNonce,
    Path(category): Path<String>,
) -> Result<BlogIndexTemplate> {
    let content = state.content();
    let name = content
        .category_name(&category)
        .ok_or_else(|| AppError::NotFound(format!("blog category {category}")))?
        .to_string();

    let path = category_url(&category);
    let meta = PageMeta::new(
        &format!("{name} | Jewelry Blog"),
        format!("{name} articles from the Ever and Always jewelry blog."),
    )
    .canonical(state.config().absolute_url(&path));
    let mut layout = Layout::load(&state, &ctx, nonce, meta, &path).await;

    let breadcrumbs = Breadcrumbs::default()
        .then("Blog", "/blog")
        .then(name.clone(), path);
    layout.push_jsonld(&breadcrumbs.schema(state.config()));

    Ok(BlogIndexTemplate {
        layout,
        heading: name,
        posts: content.posts_by_category(&category).map(PostCard::from).collect(),
        categories: category_links(&state),
        breadcrumbs: breadcrumbs.visible(),
    })
}

/// A single post.
///
/// # Errors
///
/// Returns 404 if no post has this slug.
#[instrument(skip(state, ctx, nonce))]
pub async fn show(
    State(state): State<AppState>,
    Shopper(ctx): Shopper,
    CspNonce(nonce): CspNonce,
    Path(slug): Path<String>,
) -> Result<BlogPostTemplate> {
    let content = state.content();
    let post = content
        .get_post(&slug)
        .ok_or_else(|| AppError::NotFound(format!("blog post {slug}")))?;
    let config = state.config();

    let path = format!("/blog/{slug}");
    let meta = PageMeta::new(&post.meta.title, post.meta.meta_description.clone())
        .canonical(config.absolute_url(&path))
        .keywords(&post.meta.keywords)
        .og_type("article")
        .og_image(post.meta.featured_image.clone());
    let mut layout = Layout::load(&state, &ctx, nonce, meta, &path).await;

    let breadcrumbs = Breadcrumbs::default()
        .then("Blog", "/blog")
        .then(post.meta.category.clone(), category_url(&post.category_slug))
        .then(post.meta.title.clone(), path);
    layout.push_jsonld(&OrganizationSchema::new(OrganizationDetails {
        url: Some(config.site_url.clone()),
        ..OrganizationDetails::default()
    }));
    layout.push_jsonld(&breadcrumbs.schema(config));

    Ok(BlogPostTemplate {
        layout,
        post: PostCard::from(post),
        content_html: post.content_html.clone(),
        breadcrumbs: breadcrumbs.visible(),
        related: content
            .related_posts(post)
            .into_iter()
            .map(PostCard::from)
            .collect(),
    })
}
