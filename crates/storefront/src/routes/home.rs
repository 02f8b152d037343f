//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use crate::catalog::ProductCard;
use crate::catalog::facets::{FacetGroup, group_facet_values};
use crate::error::Result;
use crate::filters;
use crate::middleware::{CspNonce, Shopper};
use crate::routes::layout::Layout;
use crate::seo::PageMeta;
use crate::seo::schema::{OrganizationDetails, OrganizationSchema};
use crate::state::AppState;
use crate::vendure::{SearchInput, types::normalize_asset_url};

/// Number of featured products on the home page.
const FEATURED_COUNT: u32 = 8;

/// A collection tile.
#[derive(Clone)]
pub struct CollectionTile {
    pub name: String,
    pub url: String,
    pub image: Option<String>,
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub layout: Layout,
    pub collections: Vec<CollectionTile>,
    pub featured: Vec<ProductCard>,
    /// "Find your ring" facet form groups.
    pub facet_groups: Vec<FacetGroup>,
}

/// Display the home page.
#[instrument(skip(state, ctx, nonce))]
pub async fn home(
    State(state): State<AppState>,
    Shopper(ctx): Shopper,
    CspNonce(nonce): CspNonce,
) -> Result<HomeTemplate> {
    let config = state.config();
    let shop = state.shop();

    let featured_input = SearchInput {
        group_by_product: true,
        take: FEATURED_COUNT,
        ..SearchInput::default()
    };
    let facet_input = SearchInput {
        group_by_product: true,
        take: 0,
        ..SearchInput::default()
    };

    let (featured, facets, collections) = tokio::join!(
        shop.search(featured_input, &ctx),
        shop.search(facet_input, &ctx),
        shop.get_top_collections(&ctx),
    );
    let featured = featured?;

    let facet_groups = facets
        .map(|result| group_facet_values(&result.facet_values))
        .inspect_err(|e| tracing::warn!(error = %e, "Failed to load home facets"))
        .unwrap_or_default();
    let collections = collections
        .inspect_err(|e| tracing::warn!(error = %e, "Failed to load home collections"))
        .unwrap_or_default()
        .iter()
        .map(|c| CollectionTile {
            name: c.name.clone(),
            url: format!("/collection/{}", c.slug),
            image: c
                .featured_asset
                .as_ref()
                .map(|a| normalize_asset_url(&a.preview)),
        })
        .collect();

    let meta = PageMeta::new(
        "Ever and Always | Affordable Diamond Jewelry",
        "Shop engagement rings, wedding bands and fine diamond jewelry with transparent pricing and premium craftsmanship.",
    )
    .canonical(config.absolute_url("/"));

    let mut layout = Layout::load(&state, &ctx, nonce, meta, "/").await;
    layout.push_jsonld(&OrganizationSchema::new(OrganizationDetails {
        url: Some(config.site_url.clone()),
        ..OrganizationDetails::default()
    }));

    Ok(HomeTemplate {
        layout,
        collections,
        featured: featured.items.iter().map(ProductCard::from_item).collect(),
        facet_groups,
    })
}
