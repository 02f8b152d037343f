//! Channel preference switchers (currency and language).

use axum::{
    Form,
    extract::State,
    http::header::SET_COOKIE,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::{CURRENCY_COOKIE, LANGUAGE_COOKIE, Shopper, preference_cookie};
use crate::state::AppState;
use crate::vendure::{Channel, RequestContext, TAG_COLLECTIONS, TAG_PRODUCTS};

#[derive(Debug, Deserialize)]
pub struct PreferenceForm {
    pub code: String,
    /// Page to return to.
    #[serde(default)]
    pub redirect: Option<String>,
}

/// Which channel preference a form sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Preference {
    Currency,
    Language,
}

impl Preference {
    const fn cookie(self) -> &'static str {
        match self {
            Self::Currency => CURRENCY_COOKIE,
            Self::Language => LANGUAGE_COOKIE,
        }
    }

    /// Codes the channel accepts. The default is always allowed.
    fn allows(self, channel: &Channel, code: &str) -> bool {
        let (default, available) = match self {
            Self::Currency => (
                &channel.default_currency_code,
                &channel.available_currency_codes,
            ),
            Self::Language => (
                &channel.default_language_code,
                &channel.available_language_codes,
            ),
        };
        default == code || available.iter().any(|c| c == code)
    }
}

/// Same-site path to go back to, `/` otherwise.
fn return_path(redirect: Option<&str>) -> &str {
    redirect
        .filter(|r| r.starts_with('/') && !r.starts_with("//") && !r.starts_with("/\\"))
        .unwrap_or("/")
}

async fn set_preference(
    state: &AppState,
    ctx: &RequestContext,
    preference: Preference,
    form: PreferenceForm,
) -> Result<Response> {
    let code = form.code.trim();
    let channel = state.shop().get_active_channel(ctx).await?;
    if !preference.allows(&channel, code) {
        return Err(AppError::BadRequest(format!("unsupported code {code}")));
    }

    state.shop().invalidate_tag(TAG_COLLECTIONS);
    state.shop().invalidate_tag(TAG_PRODUCTS);
    add_breadcrumb("settings", "Changed preference", Some(&[(preference.cookie(), code)]));

    let mut response = Redirect::to(return_path(form.redirect.as_deref())).into_response();
    if let Some(cookie) = preference_cookie(state.config(), preference.cookie(), code) {
        response.headers_mut().append(SET_COOKIE, cookie);
    }
    Ok(response)
}

/// Switch display currency.
#[instrument(skip(state, ctx, form))]
pub async fn currency(
    State(state): State<AppState>,
    Shopper(ctx): Shopper,
    Form(form): Form<PreferenceForm>,
) -> Result<Response> {
    set_preference(&state, &ctx, Preference::Currency, form).await
}

/// Switch content language.
#[instrument(skip(state, ctx, form))]
pub async fn language(
    State(state): State<AppState>,
    Shopper(ctx): Shopper,
    Form(form): Form<PreferenceForm>,
) -> Result<Response> {
    set_preference(&state, &ctx, Preference::Language, form).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel() -> Channel {
        Channel {
            id: "1".into(),
            code: "__default_channel__".into(),
            default_currency_code: "USD".into(),
            available_currency_codes: vec!["USD".into(), "EUR".into()],
            default_language_code: "en".into(),
            available_language_codes: vec![],
        }
    }

    #[test]
    fn test_allows_channel_codes() {
        let channel = channel();
        assert!(Preference::Currency.allows(&channel, "EUR"));
        assert!(!Preference::Currency.allows(&channel, "GBP"));
        assert!(Preference::Language.allows(&channel, "en"));
        assert!(!Preference::Language.allows(&channel, "de"));
    }

    #[test]
    fn test_return_path() {
        assert_eq!(return_path(Some("/search?q=ring")), "/search?q=ring");
        assert_eq!(return_path(Some("//evil.example")), "/");
        assert_eq!(return_path(None), "/");
    }
}
