//! One request at a time per visitor.
//!
//! Handlers load the visitor's state, change it, and the session layer writes
//! the record back after the handler returns. Two overlapping requests on the
//! same cookie would both start from the old state and the later write would
//! drop the earlier change. Requests carrying a session cookie therefore take
//! a per-cookie lock that wraps the session layer, so it is held until the
//! store write finishes.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::COOKIE},
    middleware::Next,
    response::Response,
};
use moka::future::Cache;
use tokio::sync::Mutex;

use super::session::SESSION_COOKIE_NAME;
use crate::state::AppState;

/// A visitor's lock is dropped after this long without requests.
const LOCK_IDLE: Duration = Duration::from_secs(10 * 60);

/// Mutex per session cookie value.
#[derive(Clone)]
pub struct SessionLocks {
    locks: Cache<String, Arc<Mutex<()>>>,
}

impl SessionLocks {
    #[must_use]
    pub fn new() -> Self {
        Self {
            locks: Cache::builder().time_to_idle(LOCK_IDLE).build(),
        }
    }

    /// The lock for `session_id`, created on first use.
    pub async fn lock_for(&self, session_id: &str) -> Arc<Mutex<()>> {
        self.locks
            .get_with(session_id.to_string(), async { Arc::new(Mutex::new(())) })
            .await
    }
}

impl Default for SessionLocks {
    fn default() -> Self {
        Self::new()
    }
}

/// Value of the session cookie, if the request carries one.
fn session_cookie(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .find_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            (name == SESSION_COOKIE_NAME && !value.is_empty()).then_some(value)
        })
}

/// Serialize requests that share a session cookie.
///
/// Requests without a cookie get a fresh session and need no lock. Static
/// assets never touch the session.
pub async fn session_lock_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if request.uri().path().starts_with("/static/") {
        return next.run(request).await;
    }
    let Some(session_id) = session_cookie(request.headers()).map(str::to_owned) else {
        return next.run(request).await;
    };

    let lock = state.session_locks().lock_for(&session_id).await;
    let _guard = lock.lock().await;
    next.run(request).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_session_cookie_found_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; pp_session=abc123; lang=en"),
        );
        assert_eq!(session_cookie(&headers), Some("abc123"));
    }

    #[test]
    fn test_session_cookie_missing_or_empty() {
        let mut headers = HeaderMap::new();
        assert_eq!(session_cookie(&headers), None);

        headers.insert(COOKIE, HeaderValue::from_static("pp_session=; theme=dark"));
        assert_eq!(session_cookie(&headers), None);
    }

    #[tokio::test]
    async fn test_same_session_shares_one_lock() {
        let locks = SessionLocks::new();
        let first = locks.lock_for("abc").await;
        let again = locks.lock_for("abc").await;
        let other = locks.lock_for("xyz").await;

        assert!(Arc::ptr_eq(&first, &again));
        assert!(!Arc::ptr_eq(&first, &other));

        let _held = first.lock().await;
        assert!(again.try_lock().is_err());
        assert!(other.try_lock().is_ok());
    }
}
