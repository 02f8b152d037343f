//! Product detail page.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, RawQuery, State};
use tracing::instrument;

use crate::catalog::variant::{OptionSelection, resolve_variant};
use crate::catalog::{ProductCard, SearchParams, VariantPicker};
use crate::error::Result;
use crate::filters;
use crate::middleware::{CspNonce, Shopper};
use crate::routes::layout::Layout;
use crate::routes::not_found_from;
use crate::seo::schema::{FaqPageSchema, PRODUCT_FAQS, Faq, ProductSchema};
use crate::seo::{Breadcrumbs, Crumb, DESCRIPTION_LIMIT, PageMeta, truncate_description};
use crate::state::AppState;
use crate::vendure::{Product, RequestContext, SearchInput};

/// Products fetched from the primary collection for "You may also like".
const RELATED_FETCH: u32 = 5;

/// Product detail template.
#[derive(Template, WebTemplate)]
#[template(path = "product.html")]
pub struct ProductTemplate {
    pub layout: Layout,
    pub name: String,
    pub description_html: String,
    pub images: Vec<String>,
    pub picker: VariantPicker,
    pub breadcrumbs: Vec<Crumb>,
    pub faqs: &'static [Faq],
    pub related: Vec<ProductCard>,
}

/// Display a product with its variant picker.
///
/// Option choices arrive as query parameters keyed by option group code.
#[instrument(skip(state, ctx, nonce, query))]
pub async fn show(
    State(state): State<AppState>,
    Shopper(ctx): Shopper,
    CspNonce(nonce): CspNonce,
    Path(slug): Path<String>,
    RawQuery(query): RawQuery,
) -> Result<ProductTemplate> {
    let config = state.config();
    let params = SearchParams::from_query(query.as_deref().unwrap_or_default());
    let path = format!("/product/{slug}");

    let product = state
        .shop()
        .get_product(&slug, &ctx)
        .await
        .map_err(not_found_from(format!("product {slug}")))?;

    let picker = VariantPicker::build(&product, &path, &params);
    let resolved = resolve_variant(&product, &OptionSelection::from_query(&product, &params));
    let images = product.image_urls();
    let related = related_products(&state, &ctx, &product).await;

    let description = truncate_description(&product.description, DESCRIPTION_LIMIT);
    let meta = PageMeta::new(
        &product.name,
        if description.is_empty() {
            format!("Shop {} at Ever and Always", product.name)
        } else {
            description
        },
    )
    .canonical(config.absolute_url(&path))
    .og_type("product")
    .og_image(images.first().cloned());

    let mut trail = Breadcrumbs::default().then("Jewelry", "/jewelry");
    if let Some(collection) = product.primary_collection() {
        trail = trail.then(collection.name.clone(), format!("/collection/{}", collection.slug));
    }
    let trail = trail.then(product.name.clone(), path.clone());

    let mut layout = Layout::load(&state, &ctx, nonce, meta, &params.to_url(&path)).await;
    layout.push_jsonld(&ProductSchema::new(&product, resolved, &config.absolute_url(&path)));
    layout.push_jsonld(&FaqPageSchema::new(&PRODUCT_FAQS));
    layout.push_jsonld(&trail.schema(config));

    Ok(ProductTemplate {
        layout,
        name: product.name.clone(),
        description_html: product.description.clone(),
        images,
        picker,
        breadcrumbs: trail.visible(),
        faqs: &PRODUCT_FAQS,
        related,
    })
}

/// Other products from the product's primary collection. Failures leave
/// the section empty.
async fn related_products(
    state: &AppState,
    ctx: &RequestContext,
    product: &Product,
) -> Vec<ProductCard> {
    let Some(collection) = product.primary_collection() else {
        return Vec::new();
    };

    let input = SearchInput {
        collection_slug: Some(collection.slug.clone()),
        group_by_product: true,
        take: RELATED_FETCH,
        ..SearchInput::default()
    };

    match state.shop().search(input, ctx).await {
        Ok(result) => result
            .items
            .iter()
            .filter(|item| item.product_id != product.id)
            .map(ProductCard::from_item)
            .collect(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load related products");
            Vec::new()
        }
    }
}
