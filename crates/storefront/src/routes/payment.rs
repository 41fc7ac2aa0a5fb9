//! Payment route handlers.
//!
//! `POST /payment/start` opens a gateway order for the cart total and the
//! payment view hands its session id to the gateway's browser SDK. The
//! gateway sends the visitor back to `GET /payment/status?order_id=...`,
//! which completes the payment and rewrites the location to `/`.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{OriginalUri, State},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use tracing::instrument;

use pulsepack_core::{Action, Page};

use super::home::render_page;
use super::layout::Layout;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::RequireSignIn;
use crate::models::{PendingPayment, session};
use crate::services::payments::{Customer, start_checkout};
use crate::state::AppState;

/// Payment view template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/payment.html")]
pub struct PaymentTemplate {
    pub layout: Layout,
    pub total: String,
    pub item_count: u64,
    pub signed_in: bool,
    pub payments_enabled: bool,
    /// Cashfree SDK mode.
    pub mode: &'static str,
    /// Gateway order ready to pay.
    pub pending: Option<PendingPayment>,
    pub error: Option<String>,
}

/// Create a gateway order for the cart total.
#[instrument(skip_all, fields(uid = %profile.uid))]
pub async fn start(
    State(state): State<AppState>,
    session: Session,
    RequireSignIn(profile): RequireSignIn,
) -> Result<Response> {
    let store = session::load_store(&session).await?;
    let amount = store.checkout_total(state.catalog().currency());
    let customer = Customer {
        id: profile.uid,
        email: profile.email.clone(),
    };

    match start_checkout(state.payments(), customer, amount).await {
        Ok(order) => {
            add_breadcrumb("payment", "order created", &[("order_id", order.order_id.as_str())]);
            session::set_pending_payment(
                &session,
                &PendingPayment {
                    order_id: order.order_id,
                    payment_session_id: order.payment_session_id,
                    amount,
                },
            )
            .await?;
            session::dispatch(&session, Action::Navigate(Page::Payment)).await?;
            Ok(Redirect::to("/").into_response())
        }
        Err(err) => {
            let err = AppError::from(err);
            err.report();
            let store = session::dispatch(&session, Action::Navigate(Page::Payment)).await?;
            let view = render_page(&state, &store, None, Some(err.public_message()));
            Ok((err.status(), view).into_response())
        }
    }
}

/// The visitor backed out of payment; the cart is kept.
#[instrument(skip_all)]
pub async fn cancel(session: Session) -> Result<Redirect> {
    session::clear_pending_payment(&session).await?;
    session::dispatch(&session, Action::PaymentCancelled).await?;
    Ok(Redirect::to("/"))
}

/// Gateway return URL.
///
/// Completes the payment and selects the thank-you view. The order id is
/// recorded when the gateway passed one. The location is then replaced with
/// `/` so a reload cannot complete it again.
///
/// Reads the full request URI since the nested router strips `/payment`.
#[instrument(skip_all, fields(query = uri.query().unwrap_or_default()))]
pub async fn status(session: Session, OriginalUri(uri): OriginalUri) -> Result<Redirect> {
    let store = session::load_store(&session).await?;
    let startup = store.startup(uri.path(), uri.query());

    let Some(target) = startup.rewrite_to else {
        return Ok(Redirect::to("/"));
    };

    let order_id = startup
        .state
        .order
        .as_ref()
        .and_then(|order| order.order_id.as_ref())
        .map(ToString::to_string)
        .unwrap_or_default();
    tracing::info!(order_id = %order_id, "payment completed");
    add_breadcrumb("payment", "payment completed", &[("order_id", &order_id)]);

    session::clear_pending_payment(&session).await?;
    session::save_store(&session, &startup.state).await?;
    Ok(Redirect::to(target))
}
