//! Data every page shell needs: head metadata, header navigation, cart
//! badge and channel switchers.

use serde::Serialize;

use crate::seo::{PageMeta, to_script_json};
use crate::state::AppState;
use crate::vendure::{CollectionSummary, RequestContext};

/// A header menu entry.
#[derive(Debug, Clone)]
pub struct NavLink {
    pub name: String,
    pub url: String,
}

/// A `<select>` of channel preference values.
#[derive(Debug, Clone, Default)]
pub struct PreferenceChoice {
    pub current: String,
    pub options: Vec<String>,
}

impl PreferenceChoice {
    /// Only worth rendering when there is something to switch to.
    #[must_use]
    pub fn has_choice(&self) -> bool {
        self.options.len() > 1
    }
}

/// The page shell.
#[derive(Debug, Clone)]
pub struct Layout {
    pub nonce: String,
    pub meta: PageMeta,
    pub collections: Vec<NavLink>,
    pub signed_in: bool,
    pub cart_quantity: u32,
    pub currency: PreferenceChoice,
    pub language: PreferenceChoice,
    /// Current search term for the header box.
    pub search_term: String,
    /// Serialized JSON-LD documents, already escaped for `<script>`.
    pub jsonld: Vec<String>,
    /// Path the switchers return to.
    pub current_path: String,
}

impl Layout {
    /// Load the shell for the shopper in `ctx`.
    ///
    /// Header lookups run concurrently. Their failures are logged and the
    /// shell degrades (empty menu, empty cart) rather than failing the page.
    pub async fn load(
        state: &AppState,
        ctx: &RequestContext,
        nonce: String,
        meta: PageMeta,
        current_path: &str,
    ) -> Self {
        let shop = state.shop();
        let (collections, customer, order, channel) = tokio::join!(
            shop.get_top_collections(ctx),
            shop.get_active_customer(ctx),
            shop.get_active_order(ctx),
            shop.get_active_channel(ctx),
        );

        let collections = collections
            .inspect_err(|e| tracing::warn!(error = %e, "Failed to load menu collections"))
            .unwrap_or_default();
        let signed_in = customer
            .inspect_err(|e| tracing::warn!(error = %e, "Failed to load active customer"))
            .ok()
            .flatten()
            .is_some();
        let cart_quantity = order
            .inspect_err(|e| tracing::warn!(error = %e, "Failed to load active order"))
            .ok()
            .flatten()
            .map_or(0, |o| o.total_quantity);

        let (currency, language) = match channel {
            Ok(channel) => (
                PreferenceChoice {
                    current: ctx
                        .currency
                        .clone()
                        .unwrap_or_else(|| channel.default_currency_code.clone()),
                    options: channel.available_currency_codes,
                },
                PreferenceChoice {
                    current: ctx
                        .language
                        .clone()
                        .unwrap_or_else(|| channel.default_language_code.clone()),
                    options: channel.available_language_codes,
                },
            ),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load active channel");
                (PreferenceChoice::default(), PreferenceChoice::default())
            }
        };

        Self {
            nonce,
            meta,
            collections: nav_links(&collections),
            signed_in,
            cart_quantity,
            currency,
            language,
            search_term: String::new(),
            jsonld: Vec::new(),
            current_path: current_path.to_string(),
        }
    }

    /// Add a JSON-LD document to the head.
    pub fn push_jsonld<T: Serialize>(&mut self, document: &T) {
        self.jsonld.push(to_script_json(document));
    }

    /// Account link target.
    #[must_use]
    pub const fn account_url(&self) -> &'static str {
        if self.signed_in { "/account" } else { "/sign-in" }
    }
}

/// Menu links for top-level collections.
#[must_use]
pub fn nav_links(collections: &[CollectionSummary]) -> Vec<NavLink> {
    collections
        .iter()
        .map(|c| NavLink {
            name: c.name.clone(),
            url: format!("/collection/{}", c.slug),
        })
        .collect()
}
