//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Active page view
//! POST /navigate               - Select a page
//! GET  /health                 - Liveness
//! GET  /health/ready           - Readiness
//!
//! # Products
//! GET  /products/{id}          - Product detail with previews
//! POST /previews/play          - Toggle a preview clip
//! POST /previews/pause         - Stop the playing clip
//! POST /previews/ended         - Playing clip finished
//!
//! # Cart
//! POST /cart/add               - Add one unit of a product
//! POST /cart/update            - Overwrite a line quantity
//! POST /cart/remove            - Remove a line
//! POST /cart/checkout          - Go to payment
//! POST /cart/continue          - Back to the home grid
//!
//! # Auth (rate limited)
//! POST /auth/login             - Sign in
//! POST /auth/signup            - Register and sign in
//! POST /auth/logout            - Sign out
//!
//! # Payment
//! POST /payment/start          - Create a gateway order (requires sign-in)
//! POST /payment/cancel         - Back to the cart
//! GET  /payment/status         - Gateway return URL
//!
//! # JSON API (rate limited)
//! POST /api/signup             - Register an account
//! POST /api/login              - Verify credentials
//! GET  /api/user/{uid}         - Account lookup
//! POST /api/create_order       - Create a gateway order
//! GET  /api/payment/status     - Echo the returned order id
//! GET  /api/health             - API liveness
//! ```

pub mod api;
pub mod auth;
pub mod cart;
pub mod health;
pub mod home;
pub mod layout;
pub mod payment;
pub mod previews;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::{api_rate_limiter, auth_rate_limiter};
use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/signup", post(auth::signup))
        .route("/logout", post(auth::logout))
        .layer(auth_rate_limiter())
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/checkout", post(cart::checkout))
        .route("/continue", post(cart::continue_shopping))
}

/// Create the payment routes router.
pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/start", post(payment::start))
        .route("/cancel", post(payment::cancel))
        .route("/status", get(payment::status))
}

/// Create the preview routes router.
pub fn preview_routes() -> Router<AppState> {
    Router::new()
        .route("/play", post(previews::play))
        .route("/pause", post(previews::pause))
        .route("/ended", post(previews::ended))
}

/// Create the JSON API router.
pub fn api_routes() -> Router<AppState> {
    let credentials = Router::new()
        .route("/signup", post(api::accounts::signup))
        .route("/login", post(api::accounts::login))
        .layer(auth_rate_limiter());

    Router::new()
        .merge(credentials)
        .route("/user/{uid}", get(api::accounts::user))
        .route("/create_order", post(api::orders::create_order))
        .route("/payment/status", get(api::payment_status))
        .route("/health", get(api::health))
        .layer(api_rate_limiter())
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/navigate", post(home::navigate))
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route("/products/{id}", get(products::show))
        .nest("/previews", preview_routes())
        .nest("/cart", cart_routes())
        .nest("/auth", auth_routes())
        .nest("/payment", payment_routes())
        .nest("/api", api_routes())
}
