//! Collection pages: shop API collections and SEO collection landings.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, RawQuery, State};
use tracing::instrument;

use crate::catalog::{SearchOptions, SearchParams};
use crate::config::StorefrontConfig;
use crate::content::{LandingLink, SeoCollection};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::{CspNonce, Shopper};
use crate::routes::layout::Layout;
use crate::routes::listing::{GridMode, Listing};
use crate::routes::not_found_from;
use crate::seo::schema::{CollectionPageSchema, ListedProduct};
use crate::seo::{Breadcrumbs, Crumb, DESCRIPTION_LIMIT, PageMeta, truncate_description};
use crate::state::AppState;
use crate::vendure::types::normalize_asset_url;

/// Products for a `CollectionPage` item list, with absolute URLs.
pub fn listed_products(config: &StorefrontConfig, listing: &Listing) -> Vec<ListedProduct> {
    listing
        .grid
        .cards
        .iter()
        .map(|card| ListedProduct {
            name: card.name.clone(),
            url: config.absolute_url(&card.url),
        })
        .collect()
}

/// Shop API collection template.
#[derive(Template, WebTemplate)]
#[template(path = "collection.html")]
pub struct CollectionTemplate {
    pub layout: Layout,
    pub name: String,
    pub description_html: String,
    pub breadcrumbs: Vec<Crumb>,
    pub listing: Listing,
}

/// Display a shop API collection with its products.
#[instrument(skip(state, ctx, nonce, query))]
pub async fn show(
    State(state): State<AppState>,
    Shopper(ctx): Shopper,
    CspNonce(nonce): CspNonce,
    Path(slug): Path<String>,
    RawQuery(query): RawQuery,
) -> Result<CollectionTemplate> {
    let config = state.config();
    let params = SearchParams::from_query(query.as_deref().unwrap_or_default());
    let path = format!("/collection/{slug}");

    let collection = state
        .shop()
        .get_collection(&slug, &ctx)
        .await
        .map_err(not_found_from(format!("collection {slug}")))?;

    let listing = Listing::fetch(
        &state,
        &ctx,
        &path,
        &params,
        &SearchOptions::for_collection(&slug),
        GridMode::from_query(&params),
    )
    .await?;

    let description = truncate_description(&collection.description, DESCRIPTION_LIMIT);
    let image = collection
        .featured_asset
        .as_ref()
        .map(|a| normalize_asset_url(&a.preview));
    let meta = PageMeta::new(
        &collection.name,
        if description.is_empty() {
            format!("Shop {} at Ever and Always", collection.name)
        } else {
            description.clone()
        },
    )
    .canonical(config.absolute_url(&path))
    .og_image(image.clone());

    let trail = Breadcrumbs::default()
        .then("Jewelry", "/jewelry")
        .then(collection.name.clone(), path.clone());

    let mut layout = Layout::load(&state, &ctx, nonce, meta, &params.to_url(&path)).await;
    layout.push_jsonld(&CollectionPageSchema::new(
        &collection.name,
        Some(description.as_str()),
        &config.absolute_url(&path),
        image,
        &listed_products(config, &listing),
    ));
    layout.push_jsonld(&trail.schema(config));

    Ok(CollectionTemplate {
        layout,
        name: collection.name,
        description_html: collection.description,
        breadcrumbs: trail.visible(),
        listing,
    })
}

/// SEO collection landing template.
#[derive(Template, WebTemplate)]
#[template(path = "seo_collection.html")]
pub struct SeoCollectionTemplate {
    pub layout: Layout,
    pub collection: SeoCollection,
    pub breadcrumbs: Vec<Crumb>,
    pub related: Vec<LandingLink>,
    pub listing: Listing,
}

/// Display an SEO collection landing from the content registry.
#[instrument(skip(state, ctx, nonce, query))]
pub async fn landing(
    State(state): State<AppState>,
    Shopper(ctx): Shopper,
    CspNonce(nonce): CspNonce,
    Path(slug): Path<String>,
    RawQuery(query): RawQuery,
) -> Result<SeoCollectionTemplate> {
    let config = state.config();
    let content = state.content();
    let params = SearchParams::from_query(query.as_deref().unwrap_or_default());
    let path = format!("/collections/{slug}");

    let collection = content
        .get_seo_collection(&slug)
        .ok_or_else(|| AppError::NotFound(format!("collection {slug}")))?
        .clone();

    let listing = Listing::fetch(
        &state,
        &ctx,
        &path,
        &params,
        &SearchOptions::default(),
        GridMode::Plain,
    )
    .await?;

    let meta = PageMeta::new(&collection.meta.title, collection.meta.meta_description.clone())
        .canonical(config.absolute_url(&path))
        .keywords(&collection.meta.keywords);

    let trail = Breadcrumbs::from_front_matter(&collection.meta.breadcrumbs);

    let mut layout = Layout::load(&state, &ctx, nonce, meta, &params.to_url(&path)).await;
    layout.push_jsonld(&CollectionPageSchema::new(
        &collection.meta.h1,
        Some(collection.meta.description.as_str()),
        &config.absolute_url(&path),
        None,
        &listed_products(config, &listing),
    ));
    layout.push_jsonld(&trail.schema(config));

    Ok(SeoCollectionTemplate {
        layout,
        related: content.landing_links(&collection.meta.related_collections),
        breadcrumbs: trail.visible(),
        collection,
        listing,
    })
}
