//! Authentication route handlers.
//!
//! Sign-in, registration, verification and password reset all go through
//! the shop API's customer mutations. A successful sign-in stores the issued
//! session token in the auth cookie.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::header::SET_COOKIE,
    response::{IntoResponse, Redirect, Response},
};
use ever_and_always_core::Email;
use serde::Deserialize;
use tracing::instrument;

use crate::error::{Result, add_breadcrumb, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::{CspNonce, Shopper, clear_session_cookie, with_session};
use crate::routes::layout::Layout;
use crate::seo::PageMeta;
use crate::state::AppState;
use crate::vendure::{CurrentUser, RegisterCustomerInput, RequestContext};

pub const PASSWORD_REQUIRED: &str = "Password is required";
pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 8 characters";
pub const PASSWORDS_DIFFER: &str = "Passwords do not match";
pub const MIN_PASSWORD_LENGTH: usize = 8;

const SIGN_IN_FAILED: &str = "Sign in failed. Please check your details and try again.";
const REGISTER_FAILED: &str = "Failed to create account. Please try again.";
const VERIFY_FAILED: &str = "This verification link is invalid or has expired.";
const RESET_FAILED: &str = "This reset link is invalid or has expired.";

/// Where a successful sign-in lands without `redirectTo`.
const DEFAULT_REDIRECT: &str = "/account";

// =============================================================================
// Validation
// =============================================================================

/// Check a new password and its confirmation.
///
/// Returns the message to show, or `None` when the pair is acceptable.
#[must_use]
pub fn new_password_error(password: &str, confirm: &str) -> Option<&'static str> {
    if password.is_empty() {
        Some(PASSWORD_REQUIRED)
    } else if password.chars().count() < MIN_PASSWORD_LENGTH {
        Some(PASSWORD_TOO_SHORT)
    } else if password != confirm {
        Some(PASSWORDS_DIFFER)
    } else {
        None
    }
}

/// Message for an `error` code the OAuth callback put on `/sign-in`.
#[must_use]
pub fn oauth_error_message(code: &str) -> &'static str {
    match code {
        "oauth-failed" => "Google authentication failed. Please try again.",
        "registration-failed" => "Failed to create account. Please try again.",
        "server-error" => "An error occurred. Please try again later.",
        _ => "An error occurred during authentication.",
    }
}

/// Only same-site relative paths are followed after sign-in.
#[must_use]
pub fn safe_redirect(target: Option<&str>) -> String {
    target
        .filter(|t| t.starts_with('/') && !t.starts_with("//") && !t.starts_with("/\\"))
        .unwrap_or(DEFAULT_REDIRECT)
        .to_string()
}

fn signed_in(state: &AppState, user: &CurrentUser, token: Option<&str>, target: &str) -> Response {
    set_sentry_user(&user.id, Some(&user.identifier));
    add_breadcrumb("auth", "Signed in", None);
    with_session(state.config(), token, Redirect::to(target))
}

async fn auth_layout(
    state: &AppState,
    ctx: &RequestContext,
    nonce: String,
    title: &str,
    description: &str,
    path: &str,
) -> Layout {
    let meta = PageMeta::new(title, description)
        .canonical(state.config().absolute_url(path))
        .noindex();
    Layout::load(state, ctx, nonce, meta, path).await
}

// =============================================================================
// Sign in
// =============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct SignInQuery {
    #[serde(rename = "redirectTo")]
    pub redirect_to: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
    #[serde(default, rename = "redirectTo")]
    pub redirect_to: Option<String>,
    #[serde(default)]
    pub remember_me: Option<String>,
}

#[derive(Template, WebTemplate)]
#[template(path = "auth/sign_in.html")]
pub struct SignInTemplate {
    pub layout: Layout,
    pub email: String,
    pub redirect_to: String,
    pub error: Option<String>,
}

/// Display the sign-in form.
#[instrument(skip(state, ctx, nonce))]
pub async fn sign_in_page(
    State(state): State<AppState>,
    Shopper(ctx): Shopper,
    CspNonce(nonce): CspNonce,
    Query(query): Query<SignInQuery>,
) -> Result<SignInTemplate> {
    let layout = auth_layout(
        &state,
        &ctx,
        nonce,
        "Sign In",
        "Sign in to your Ever and Always account.",
        "/sign-in",
    )
    .await;

    Ok(SignInTemplate {
        layout,
        email: String::new(),
        redirect_to: safe_redirect(query.redirect_to.as_deref()),
        error: query
            .error
            .as_deref()
            .filter(|e| !e.is_empty())
            .map(|e| oauth_error_message(e).to_string()),
    })
}

/// Handle sign-in form submission.
#[instrument(skip(state, ctx, nonce, form))]
pub async fn sign_in(
    State(state): State<AppState>,
    Shopper(ctx): Shopper,
    CspNonce(nonce): CspNonce,
    Form(form): Form<SignInForm>,
) -> Result<Response> {
    let redirect_to = safe_redirect(form.redirect_to.as_deref());

    let error = match Email::parse(&form.email) {
        Err(_) => Some(Email::INVALID_MESSAGE.to_string()),
        Ok(_) if form.password.is_empty() => Some(PASSWORD_REQUIRED.to_string()),
        Ok(email) => {
            let remember_me = form.remember_me.is_some();
            match state
                .shop()
                .login(email.as_str(), &form.password, remember_me, &ctx)
                .await
            {
                Ok(result) => {
                    tracing::info!(user_id = %result.value.id, "Customer signed in");
                    return Ok(signed_in(
                        &state,
                        &result.value,
                        result.auth_token.as_deref(),
                        &redirect_to,
                    ));
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Sign in failed");
                    Some(e.user_message(SIGN_IN_FAILED))
                }
            }
        }
    };

    let layout = auth_layout(
        &state,
        &ctx,
        nonce,
        "Sign In",
        "Sign in to your Ever and Always account.",
        "/sign-in",
    )
    .await;

    Ok(SignInTemplate {
        layout,
        email: form.email,
        redirect_to,
        error,
    }
    .into_response())
}

/// Hand off to the shop's Google OAuth flow.
pub async fn google(State(state): State<AppState>) -> Redirect {
    Redirect::to(&state.config().vendure.google_sign_in_url())
}

// =============================================================================
// Registration
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub layout: Layout,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub error: Option<String>,
    /// Show the "check your inbox" state instead of the form.
    pub registered: bool,
}

impl RegisterForm {
    fn validate(&self) -> std::result::Result<Email, &'static str> {
        let email = Email::parse(&self.email).map_err(|_| Email::INVALID_MESSAGE)?;
        match new_password_error(&self.password, &self.password_confirm) {
            Some(message) => Err(message),
            None => Ok(email),
        }
    }
}

async fn register_layout(state: &AppState, ctx: &RequestContext, nonce: String) -> Layout {
    auth_layout(
        state,
        ctx,
        nonce,
        "Create Account",
        "Create an Ever and Always account to track orders and save your details.",
        "/register",
    )
    .await
}

/// Display the registration form.
#[instrument(skip(state, ctx, nonce))]
pub async fn register_page(
    State(state): State<AppState>,
    Shopper(ctx): Shopper,
    CspNonce(nonce): CspNonce,
) -> Result<RegisterTemplate> {
    Ok(RegisterTemplate {
        layout: register_layout(&state, &ctx, nonce).await,
        first_name: String::new(),
        last_name: String::new(),
        email: String::new(),
        error: None,
        registered: false,
    })
}

/// Handle registration form submission.
#[instrument(skip(state, ctx, nonce, form))]
pub async fn register(
    State(state): State<AppState>,
    Shopper(ctx): Shopper,
    CspNonce(nonce): CspNonce,
    Form(form): Form<RegisterForm>,
) -> Result<RegisterTemplate> {
    let outcome = match form.validate() {
        Err(message) => Err(message.to_string()),
        Ok(email) => {
            let input = RegisterCustomerInput {
                email_address: email.into_inner(),
                first_name: form.first_name.trim().to_string(),
                last_name: form.last_name.trim().to_string(),
                password: form.password.clone(),
            };
            state
                .shop()
                .register_customer_account(input, &ctx)
                .await
                .map_err(|e| {
                    tracing::warn!(error = %e, "Registration failed");
                    e.user_message(REGISTER_FAILED)
                })
        }
    };

    if outcome.is_ok() {
        add_breadcrumb("auth", "Registered", None);
    }

    Ok(RegisterTemplate {
        layout: register_layout(&state, &ctx, nonce).await,
        first_name: form.first_name,
        last_name: form.last_name,
        email: form.email,
        registered: outcome.is_ok(),
        error: outcome.err(),
    })
}

// =============================================================================
// Verification
// =============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct TokenQuery {
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Template, WebTemplate)]
#[template(path = "auth/verify.html")]
pub struct VerifyTemplate {
    pub layout: Layout,
    pub error: String,
}

/// Verify a new account from the emailed link, then sign the customer in.
#[instrument(skip(state, ctx, nonce, query))]
pub async fn verify(
    State(state): State<AppState>,
    Shopper(ctx): Shopper,
    CspNonce(nonce): CspNonce,
    Query(query): Query<TokenQuery>,
) -> Result<Response> {
    let error = match query.token.as_deref().filter(|t| !t.is_empty()) {
        None => VERIFY_FAILED.to_string(),
        Some(token) => match state.shop().verify_customer_account(token, None, &ctx).await {
            Ok(result) => {
                tracing::info!(user_id = %result.value.id, "Customer verified");
                return Ok(signed_in(
                    &state,
                    &result.value,
                    result.auth_token.as_deref(),
                    DEFAULT_REDIRECT,
                ));
            }
            Err(e) => {
                tracing::warn!(error = %e, "Account verification failed");
                e.user_message(VERIFY_FAILED)
            }
        },
    };

    let layout = auth_layout(
        &state,
        &ctx,
        nonce,
        "Verify Account",
        "Verify your Ever and Always account.",
        "/verify",
    )
    .await;

    Ok(VerifyTemplate { layout, error }.into_response())
}

// =============================================================================
// Password reset
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordForm {
    pub email: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "auth/forgot_password.html")]
pub struct ForgotPasswordTemplate {
    pub layout: Layout,
    pub email: String,
    pub error: Option<String>,
    pub sent: bool,
}

async fn forgot_layout(state: &AppState, ctx: &RequestContext, nonce: String) -> Layout {
    auth_layout(
        state,
        ctx,
        nonce,
        "Forgot Password",
        "Reset the password for your Ever and Always account.",
        "/forgot-password",
    )
    .await
}

/// Display the forgot-password form.
#[instrument(skip(state, ctx, nonce))]
pub async fn forgot_password_page(
    State(state): State<AppState>,
    Shopper(ctx): Shopper,
    CspNonce(nonce): CspNonce,
) -> Result<ForgotPasswordTemplate> {
    Ok(ForgotPasswordTemplate {
        layout: forgot_layout(&state, &ctx, nonce).await,
        email: String::new(),
        error: None,
        sent: false,
    })
}

/// Request a reset email.
///
/// Any address the API accepts gets the same confirmation, so the page does
/// not reveal which addresses have accounts.
#[instrument(skip(state, ctx, nonce, form))]
pub async fn forgot_password(
    State(state): State<AppState>,
    Shopper(ctx): Shopper,
    CspNonce(nonce): CspNonce,
    Form(form): Form<ForgotPasswordForm>,
) -> Result<ForgotPasswordTemplate> {
    let error = match Email::parse(&form.email) {
        Err(_) => Some(Email::INVALID_MESSAGE.to_string()),
        Ok(email) => state
            .shop()
            .request_password_reset(email.as_str(), &ctx)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "Password reset request failed");
                e.user_message("Could not send the reset email. Please try again.")
            })
            .err(),
    };

    Ok(ForgotPasswordTemplate {
        layout: forgot_layout(&state, &ctx, nonce).await,
        sent: error.is_none(),
        email: form.email,
        error,
    })
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordForm {
    #[serde(default)]
    pub token: String,
    pub password: String,
    pub password_confirm: String,
}

#[derive(Template, WebTemplate)]
#[template(path = "auth/reset_password.html")]
pub struct ResetPasswordTemplate {
    pub layout: Layout,
    pub token: String,
    pub error: Option<String>,
}

async fn reset_layout(state: &AppState, ctx: &RequestContext, nonce: String) -> Layout {
    auth_layout(
        state,
        ctx,
        nonce,
        "Reset Password",
        "Choose a new password for your Ever and Always account.",
        "/reset-password",
    )
    .await
}

/// Display the reset form for the emailed token.
#[instrument(skip(state, ctx, nonce, query))]
pub async fn reset_password_page(
    State(state): State<AppState>,
    Shopper(ctx): Shopper,
    CspNonce(nonce): CspNonce,
    Query(query): Query<TokenQuery>,
) -> Result<ResetPasswordTemplate> {
    let token = query.token.unwrap_or_default();
    let error = token.is_empty().then(|| RESET_FAILED.to_string());

    Ok(ResetPasswordTemplate {
        layout: reset_layout(&state, &ctx, nonce).await,
        token,
        error,
    })
}

/// Set the new password and sign the customer in.
#[instrument(skip(state, ctx, nonce, form))]
pub async fn reset_password(
    State(state): State<AppState>,
    Shopper(ctx): Shopper,
    CspNonce(nonce): CspNonce,
    Form(form): Form<ResetPasswordForm>,
) -> Result<Response> {
    let error = if form.token.is_empty() {
        RESET_FAILED.to_string()
    } else if let Some(message) = new_password_error(&form.password, &form.password_confirm) {
        message.to_string()
    } else {
        match state
            .shop()
            .reset_password(&form.token, &form.password, &ctx)
            .await
        {
            Ok(result) => {
                tracing::info!(user_id = %result.value.id, "Password reset");
                return Ok(signed_in(
                    &state,
                    &result.value,
                    result.auth_token.as_deref(),
                    DEFAULT_REDIRECT,
                ));
            }
            Err(e) => {
                tracing::warn!(error = %e, "Password reset failed");
                e.user_message(RESET_FAILED)
            }
        }
    };

    Ok(ResetPasswordTemplate {
        layout: reset_layout(&state, &ctx, nonce).await,
        token: form.token,
        error: Some(error),
    }
    .into_response())
}

// =============================================================================
// Sign out
// =============================================================================

/// End the session and forget the token.
#[instrument(skip(state, ctx))]
pub async fn sign_out(State(state): State<AppState>, Shopper(ctx): Shopper) -> Response {
    if ctx.has_session()
        && let Err(e) = state.shop().logout(&ctx).await
    {
        tracing::warn!(error = %e, "Logout mutation failed");
    }

    clear_sentry_user();
    add_breadcrumb("auth", "Signed out", None);

    let mut response = Redirect::to("/").into_response();
    if let Some(cookie) = clear_session_cookie(state.config()) {
        response.headers_mut().append(SET_COOKIE, cookie);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_password_error() {
        assert_eq!(new_password_error("", ""), Some(PASSWORD_REQUIRED));
        assert_eq!(new_password_error("short", "short"), Some(PASSWORD_TOO_SHORT));
        assert_eq!(
            new_password_error("long enough", "long enougH"),
            Some(PASSWORDS_DIFFER)
        );
        assert_eq!(new_password_error("long enough", "long enough"), None);
    }

    #[test]
    fn test_oauth_error_message() {
        assert_eq!(
            oauth_error_message("oauth-failed"),
            "Google authentication failed. Please try again."
        );
        assert_eq!(
            oauth_error_message("registration-failed"),
            "Failed to create account. Please try again."
        );
        assert_eq!(
            oauth_error_message("server-error"),
            "An error occurred. Please try again later."
        );
        assert_eq!(
            oauth_error_message("anything"),
            "An error occurred during authentication."
        );
    }

    #[test]
    fn test_safe_redirect() {
        assert_eq!(safe_redirect(None), "/account");
        assert_eq!(safe_redirect(Some("/cart")), "/cart");
        assert_eq!(safe_redirect(Some("//evil.example")), "/account");
        assert_eq!(safe_redirect(Some("/\\evil.example")), "/account");
        assert_eq!(safe_redirect(Some("https://evil.example")), "/account");
    }

    #[test]
    fn test_register_form_validation() {
        let form = RegisterForm {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: "not-an-email".into(),
            password: "correct horse".into(),
            password_confirm: "correct horse".into(),
        };
        assert_eq!(form.validate().err(), Some(Email::INVALID_MESSAGE));

        let form = RegisterForm {
            email: "ada@example.com".into(),
            ..form
        };
        assert_eq!(form.validate().map(Email::into_inner), Ok("ada@example.com".to_string()));
    }
}
