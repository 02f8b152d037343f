//! Static content page route handlers.
//!
//! Serves the markdown pages under `content/pages`.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{CspNonce, Shopper};
use crate::routes::layout::Layout;
use crate::seo::{Breadcrumbs, Crumb, DESCRIPTION_LIMIT, PageMeta, truncate_description};
use crate::state::AppState;
use crate::vendure::RequestContext;

/// Content page template.
#[derive(Template, WebTemplate)]
#[template(path = "page.html")]
pub struct ContentPageTemplate {
    pub layout: Layout,
    pub title: String,
    pub content_html: String,
    pub breadcrumbs: Vec<Crumb>,
}

/// Render a content page by slug.
async fn serve_content_page(
    state: &AppState,
    ctx: &RequestContext,
    nonce: String,
    slug: &str,
) -> Result<ContentPageTemplate> {
    let page = state
        .content()
        .get_page(slug)
        .ok_or_else(|| AppError::NotFound(format!("page {slug}")))?;

    let path = format!("/{slug}");
    let description = page.meta.description.clone().unwrap_or_else(|| {
        truncate_description(&page.content_html, DESCRIPTION_LIMIT)
    });
    let meta = PageMeta::new(&page.meta.title, description)
        .canonical(state.config().absolute_url(&path));
    let mut layout = Layout::load(state, ctx, nonce, meta, &path).await;

    let breadcrumbs = Breadcrumbs::default().then(page.meta.title.clone(), path);
    layout.push_jsonld(&breadcrumbs.schema(state.config()));

    Ok(ContentPageTemplate {
        layout,
        title: page.meta.title.clone(),
        content_html: page.content_html.clone(),
        breadcrumbs: breadcrumbs.visible(),
    })
}

/// Display the About Us page.
///
/// # Errors
///
/// Returns 404 if the page doesn't exist.
#[instrument(skip(state, ctx, nonce))]
pub async fn about_us(
    State(state): State<AppState>,
    Shopper(ctx): Shopper,
    CspNonce(nonce): CspNonce,
) -> Result<ContentPageTemplate> {
    serve_content_page(&state, &ctx, nonce, "about-us").await
}

/// Display the custom jewelry page.
///
/// # Errors
///
/// Returns 404 if the page doesn't exist.
#[instrument(skip(state, ctx, nonce))]
pub async fn custom(
    State(state): State<AppState>,
    Shopper(ctx): Shopper,
    CspNonce(nonce): CspNonce,
) -> Result<ContentPageTemplate> {
    serve_content_page(&state, &ctx, nonce, "custom").await
}

/// Display the consultation page.
///
/// # Errors
///
/// Returns 404 if the page doesn't exist.
#[instrument(skip(state, ctx, nonce))]
pub async fn consultation(
    State(state): State<AppState>,
    Shopper(ctx): Shopper,
    CspNonce(nonce): CspNonce,
) -> Result<ContentPageTemplate> {
    serve_content_page(&state, &ctx, nonce, "consultation").await
}
