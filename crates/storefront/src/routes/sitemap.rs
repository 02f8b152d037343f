//! Sitemap and robots.txt.

use askama::Template;
use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Response},
};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::seo::sitemap::{SitemapEntry, sitemap_entries};
use crate::state::AppState;

#[derive(Template)]
#[template(path = "sitemap.xml")]
pub struct SitemapTemplate {
    pub entries: Vec<SitemapEntry>,
}

/// XML sitemap of every indexable page.
#[instrument(skip(state))]
pub async fn sitemap(State(state): State<AppState>) -> Result<Response> {
    let today = chrono::Utc::now().date_naive();
    let body = SitemapTemplate {
        entries: sitemap_entries(state.config(), state.content(), today),
    }
    .render()
    .map_err(|e| AppError::Internal(format!("sitemap render failed: {e}")))?;

    Ok(([(header::CONTENT_TYPE, "application/xml; charset=utf-8")], body).into_response())
}

/// Allow everything and point crawlers at the sitemap.
pub async fn robots(State(state): State<AppState>) -> Response {
    let body = format!(
        "User-agent: *\nAllow: /\n\nSitemap: {}\n",
        state.config().absolute_url("/sitemap.xml")
    );
    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body).into_response()
}
