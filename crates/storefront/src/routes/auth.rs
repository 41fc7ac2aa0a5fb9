//! Authentication route handlers.
//!
//! Login and signup verify against the account directory, then sign the
//! visitor in by dispatching the matching action. Failures re-render the
//! form with a message.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use pulsepack_core::{Action, Page};

use super::home::render_page;
use super::layout::Layout;
use crate::error::{AppError, Result, clear_sentry_user, set_sentry_user};
use crate::models::session;
use crate::services::accounts::{AccountError, NewAccount};
use crate::state::AppState;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Signup form data.
#[derive(Deserialize)]
pub struct SignupForm {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

// =============================================================================
// Templates
// =============================================================================

/// Login view template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/login.html")]
pub struct LoginTemplate {
    pub layout: Layout,
    pub error: Option<String>,
}

/// Signup view template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/signup.html")]
pub struct SignupTemplate {
    pub layout: Layout,
    pub error: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Verify credentials and sign the visitor in.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    match state.accounts().login(&form.email, &form.password).await {
        Ok(account) => {
            set_sentry_user(&account.uid, Some(account.email.as_str()));
            session::dispatch(&session, Action::Login(account.profile_input())).await?;
            tracing::info!(uid = %account.uid, "visitor signed in");
            Ok(Redirect::to("/").into_response())
        }
        Err(err) => form_error(&state, &session, Page::Login, err).await,
    }
}

/// Register an account and sign the visitor in.
#[instrument(skip_all)]
pub async fn signup(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<SignupForm>,
) -> Result<Response> {
    let new = NewAccount {
        email: &form.email,
        password: &form.password,
        first_name: &form.first_name,
        last_name: &form.last_name,
    };

    match state.accounts().signup(new).await {
        Ok(account) => {
            set_sentry_user(&account.uid, Some(account.email.as_str()));
            session::dispatch(&session, Action::Signup(account.profile_input())).await?;
            Ok(Redirect::to("/").into_response())
        }
        Err(err) => form_error(&state, &session, Page::Signup, err).await,
    }
}

/// Sign out. The visitor stays on the current page.
#[instrument(skip_all)]
pub async fn logout(session: Session) -> Result<Redirect> {
    clear_sentry_user();
    session::clear_pending_payment(&session).await?;
    session::dispatch(&session, Action::Logout).await?;
    Ok(Redirect::to("/"))
}

/// Re-render the login or signup view with the error's public message.
async fn form_error(
    state: &AppState,
    session: &Session,
    page: Page,
    err: AccountError,
) -> Result<Response> {
    let err = AppError::from(err);
    let status = err.status();
    if status.is_server_error() {
        return Err(err);
    }

    tracing::info!(page = %page, error = %err, "auth form rejected");
    let store = session::dispatch(session, Action::Navigate(page)).await?;
    let view = render_page(state, &store, None, Some(err.public_message()));
    Ok((status, view).into_response())
}
