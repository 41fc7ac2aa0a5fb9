//! Authentication extractors.
//!
//! Sign-in state is part of the visitor's [`StoreState`]; these extractors
//! read it from the session.

use axum::{
    extract::{FromRequestParts, OriginalUri},
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use pulsepack_core::{Action, Page, UserProfile};

use crate::models::session;

/// Extractor that requires a signed-in visitor.
///
/// HTML requests from signed-out visitors are sent to the login view;
/// `/api/` requests get 401.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(RequireSignIn(profile): RequireSignIn) -> impl IntoResponse {
///     format!("Hello, {}!", profile.name)
/// }
/// ```
pub struct RequireSignIn(pub UserProfile);

/// Error returned when sign-in is required but the visitor is signed out.
pub enum AuthRejection {
    /// Show the login view.
    RedirectToLogin,
    /// Unauthorized response (for API requests).
    Unauthorized,
    /// The session store failed.
    Session,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/").into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
            Self::Session => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireSignIn
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let visitor = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or(AuthRejection::Unauthorized)?;

        let store = session::load_store(&visitor)
            .await
            .map_err(|_| AuthRejection::Session)?;

        if let Some(profile) = store.session.profile() {
            return Ok(Self(profile.clone()));
        }

        // Nested routers strip their prefix from `parts.uri`.
        let path = parts
            .extensions
            .get::<OriginalUri>()
            .map_or_else(|| parts.uri.path(), |original| original.0.path());
        if path.starts_with("/api/") {
            return Err(AuthRejection::Unauthorized);
        }

        session::dispatch(&visitor, Action::Navigate(Page::Login))
            .await
            .map_err(|_| AuthRejection::Session)?;
        Err(AuthRejection::RedirectToLogin)
    }
}
