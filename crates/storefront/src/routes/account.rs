//! Account route handlers.
//!
//! Every page here needs a signed-in customer. A missing customer, or a
//! failed lookup, sends the shopper to `/sign-in` instead of an error page.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use ever_and_always_core::Email;
use serde::Deserialize;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb, set_sentry_user};
use crate::filters;
use crate::middleware::{CspNonce, Shopper};
use crate::routes::auth::new_password_error;
use crate::routes::layout::Layout;
use crate::seo::PageMeta;
use crate::state::AppState;
use crate::vendure::{Customer, RequestContext, UpdateCustomerInput};

const PROFILE_PATH: &str = "/account/profile";

/// Outcome banner shown above the forms.
#[derive(Debug, Clone)]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Success(m) | Self::Error(m) => m,
        }
    }
}

/// Profile page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/profile.html")]
pub struct ProfileTemplate {
    pub layout: Layout,
    pub customer: Customer,
    pub notice: Option<Notice>,
}

/// `/account` has no page of its own.
pub async fn index() -> Redirect {
    Redirect::to(PROFILE_PATH)
}

async fn load_customer(state: &AppState, ctx: &RequestContext) -> Option<Customer> {
    match state.shop().get_active_customer(ctx).await {
        Ok(customer) => customer,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load active customer");
            None
        }
    }
}

async fn render(
    state: &AppState,
    ctx: &RequestContext,
    nonce: String,
    customer: Customer,
    notice: Option<Notice>,
) -> ProfileTemplate {
    let meta = PageMeta::new("My Account", "Manage your Ever and Always account.")
        .canonical(state.config().absolute_url(PROFILE_PATH))
        .noindex();
    let layout = Layout::load(state, ctx, nonce, meta, PROFILE_PATH).await;

    ProfileTemplate {
        layout,
        customer,
        notice,
    }
}

fn sign_in_redirect() -> Response {
    Redirect::to(&format!("/sign-in?redirectTo={}", urlencoding::encode(PROFILE_PATH))).into_response()
}

/// Display the profile page.
#[instrument(skip(state, ctx, nonce))]
pub async fn profile(
    State(state): State<AppState>,
    Shopper(ctx): Shopper,
    CspNonce(nonce): CspNonce,
) -> Result<Response> {
    let Some(customer) = load_customer(&state, &ctx).await else {
        return Ok(sign_in_redirect());
    };
    set_sentry_user(&customer.id, Some(&customer.email_address));

    Ok(render(&state, &ctx, nonce, customer, None).await.into_response())
}

#[derive(Debug, Deserialize)]
pub struct ProfileForm {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone_number: Option<String>,
}

/// Update name and phone number.
#[instrument(skip(state, ctx, nonce, form))]
pub async fn update_profile(
    State(state): State<AppState>,
    Shopper(ctx): Shopper,
    CspNonce(nonce): CspNonce,
    Form(form): Form<ProfileForm>,
) -> Result<Response> {
    let Some(customer) = load_customer(&state, &ctx).await else {
        return Ok(sign_in_redirect());
    };

    let input = UpdateCustomerInput {
        first_name: form.first_name.trim().to_string(),
        last_name: form.last_name.trim().to_string(),
        phone_number: form
            .phone_number
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty()),
    };

    let (customer, notice) = match state.shop().update_customer(input, &ctx).await {
        Ok(updated) => {
            add_breadcrumb("account", "Updated profile", None);
            (updated, Notice::Success("Your profile has been updated.".to_string()))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Profile update failed");
            (
                customer,
                Notice::Error(e.user_message("Could not update your profile. Please try again.")),
            )
        }
    };

    Ok(render(&state, &ctx, nonce, customer, Some(notice))
        .await
        .into_response())
}

#[derive(Debug, Deserialize)]
pub struct EmailForm {
    pub new_email: String,
    pub password: String,
}

/// Start an email change; the new address must confirm it.
#[instrument(skip(state, ctx, nonce, form))]
pub async fn update_email(
    State(state): State<AppState>,
    Shopper(ctx): Shopper,
    CspNonce(nonce): CspNonce,
    Form(form): Form<EmailForm>,
) -> Result<Response> {
    let Some(customer) = load_customer(&state, &ctx).await else {
        return Ok(sign_in_redirect());
    };

    let notice = match Email::parse(&form.new_email) {
        Err(_) => Notice::Error(Email::INVALID_MESSAGE.to_string()),
        Ok(_) if form.password.is_empty() => {
            Notice::Error(crate::routes::auth::PASSWORD_REQUIRED.to_string())
        }
        Ok(email) => match state
            .shop()
            .request_update_customer_email_address(&form.password, email.as_str(), &ctx)
            .await
        {
            Ok(()) => {
                add_breadcrumb("account", "Requested email change", None);
                Notice::Success(format!(
                    "We sent a confirmation link to {email}. Your address changes once you follow it."
                ))
            }
            Err(e) => {
                tracing::warn!(error = %e, "Email change request failed");
                Notice::Error(e.user_message("Could not change your email address. Please try again."))
            }
        },
    };

    Ok(render(&state, &ctx, nonce, customer, Some(notice))
        .await
        .into_response())
}

#[derive(Debug, Deserialize)]
pub struct PasswordForm {
    pub current_password: String,
    pub new_password: String,
    pub password_confirm: String,
}

/// Change the password.
#[instrument(skip(state, ctx, nonce, form))]
pub async fn update_password(
    State(state): State<AppState>,
    Shopper(ctx): Shopper,
    CspNonce(nonce): CspNonce,
    Form(form): Form<PasswordForm>,
) -> Result<Response> {
    let Some(customer) = load_customer(&state, &ctx).await else {
        return Ok(sign_in_redirect());
    };

    let notice = if form.current_password.is_empty() {
        Notice::Error(crate::routes::auth::PASSWORD_REQUIRED.to_string())
    } else if let Some(message) = new_password_error(&form.new_password, &form.password_confirm) {
        Notice::Error(message.to_string())
    } else {
        match state
            .shop()
            .update_customer_password(&form.current_password, &form.new_password, &ctx)
            .await
        {
            Ok(()) => {
                add_breadcrumb("account", "Changed password", None);
                Notice::Success("Your password has been changed.".to_string())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Password change failed");
                Notice::Error(e.user_message("Could not change your password. Please try again."))
            }
        }
    };

    Ok(render(&state, &ctx, nonce, customer, Some(notice))
        .await
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice() {
        let ok = Notice::Success("Saved".into());
        assert!(!ok.is_error());
        assert_eq!(ok.message(), "Saved");
        assert!(Notice::Error("Nope".into()).is_error());
    }

    #[test]
    fn test_sign_in_redirect_returns_to_profile() {
        let response = sign_in_redirect();
        let location = response.headers().get("location").and_then(|v| v.to_str().ok());
        assert_eq!(location, Some("/sign-in?redirectTo=%2Faccount%2Fprofile"));
    }
}
