//! Security headers middleware.
//!
//! Everything is denied unless a storefront feature needs it: audio previews
//! need `media-src` and `autoplay`, and hosted checkout needs the Cashfree
//! browser SDK.

use axum::{
    extract::Request,
    http::{
        HeaderName, HeaderValue,
        header::{
            CACHE_CONTROL, CONTENT_SECURITY_POLICY, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS,
            X_FRAME_OPTIONS,
        },
    },
    middleware::Next,
    response::Response,
};

/// Content Security Policy for every page.
pub const CONTENT_SECURITY_POLICY_VALUE: &str = "default-src 'none'; \
     script-src 'self' https://sdk.cashfree.com; \
     style-src 'self'; \
     font-src 'self'; \
     img-src 'self' data:; \
     media-src 'self' https:; \
     connect-src 'self' https://*.cashfree.com; \
     frame-src https://*.cashfree.com; \
     object-src 'none'; \
     base-uri 'self'; \
     form-action 'self' https://*.cashfree.com; \
     frame-ancestors 'none'";

/// Permissions Policy: only autoplay (for previews) and payment (for checkout).
const PERMISSIONS_POLICY_VALUE: &str = "accelerometer=(), \
     autoplay=(self), \
     camera=(), \
     display-capture=(), \
     geolocation=(), \
     gyroscope=(), \
     magnetometer=(), \
     microphone=(), \
     payment=(self \"https://sdk.cashfree.com\"), \
     usb=(), \
     xr-spatial-tracking=()";

/// Add security headers to all responses.
pub async fn security_headers_middleware(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(
        REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    headers.insert(
        CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(CONTENT_SECURITY_POLICY_VALUE),
    );
    headers.insert(
        HeaderName::from_static("permissions-policy"),
        HeaderValue::from_static(PERMISSIONS_POLICY_VALUE),
    );

    // Pages embed the visitor's cart and session.
    if !headers.contains_key(CACHE_CONTROL) {
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store, max-age=0"));
    }

    // No COEP: the gateway SDK is served without CORP headers.
    headers.insert(
        HeaderName::from_static("cross-origin-opener-policy"),
        HeaderValue::from_static("same-origin-allow-popups"),
    );

    response
}
