//! Price-tier landing pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, RawQuery, State};
use tracing::instrument;

use crate::catalog::{PriceBounds, SearchOptions, SearchParams};
use crate::content::PricePage;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{CspNonce, Shopper};
use crate::routes::collections::listed_products;
use crate::routes::layout::Layout;
use crate::routes::listing::{GridMode, Listing};
use crate::seo::schema::CollectionPageSchema;
use crate::seo::{Breadcrumbs, Crumb, PageMeta};
use crate::state::AppState;

/// Price landing template.
#[derive(Template, WebTemplate)]
#[template(path = "price.html")]
pub struct PriceTemplate {
    pub layout: Layout,
    pub page: PricePage,
    pub breadcrumbs: Vec<Crumb>,
    pub listing: Listing,
}

/// Display a price-tier landing: the fetched page of results filtered to the
/// tier's maximum price.
#[instrument(skip(state, ctx, nonce, query))]
pub async fn show(
    State(state): State<AppState>,
    Shopper(ctx): Shopper,
    CspNonce(nonce): CspNonce,
    Path(slug): Path<String>,
    RawQuery(query): RawQuery,
) -> Result<PriceTemplate> {
    let config = state.config();
    let params = SearchParams::from_query(query.as_deref().unwrap_or_default());
    let path = format!("/price/{slug}");

    let page = state
        .content()
        .get_price_page(&slug)
        .ok_or_else(|| AppError::NotFound(format!("price page {slug}")))?
        .clone();

    let bounds = page.max_price().map_or_else(PriceBounds::default, PriceBounds::up_to);
    let listing = Listing::fetch(
        &state,
        &ctx,
        &path,
        &params,
        &SearchOptions::default(),
        GridMode::Filtered(bounds),
    )
    .await?;

    let meta = PageMeta::new(&page.meta.title, page.meta.meta_description.clone())
        .canonical(config.absolute_url(&path))
        .keywords(&page.meta.keywords);

    let trail = Breadcrumbs::from_front_matter(&page.meta.breadcrumbs);

    let mut layout = Layout::load(&state, &ctx, nonce, meta, &params.to_url(&path)).await;
    layout.push_jsonld(&CollectionPageSchema::new(
        &page.meta.h1,
        Some(page.meta.description.as_str()),
        &config.absolute_url(&path),
        None,
        &listed_products(config, &listing),
    ));
    layout.push_jsonld(&trail.schema(config));

    Ok(PriceTemplate {
        layout,
        breadcrumbs: trail.visible(),
        page,
        listing,
    })
}
