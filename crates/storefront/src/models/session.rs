//! Session-related types.
//!
//! Each visitor's [`StoreState`] lives in their session and is read, updated
//! through [`StoreState::dispatch`], and written back within one request.

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use pulsepack_core::{Action, OrderRef, Price, StoreState};

use crate::error::add_breadcrumb;

/// Gateway order opened for the current cart, awaiting the visitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingPayment {
    pub order_id: OrderRef,
    pub payment_session_id: String,
    /// Cart total the order was opened for.
    pub amount: Price,
}

impl PendingPayment {
    /// Whether the order still charges exactly `total`.
    #[must_use]
    pub fn covers(&self, total: Price) -> bool {
        self.amount == total
    }
}

/// Session keys for storefront data.
pub mod keys {
    /// Key for the visitor's storefront state.
    pub const STORE_STATE: &str = "store_state";

    /// Key for the gateway order awaiting payment.
    pub const PENDING_PAYMENT: &str = "pending_payment";
}

/// Read the visitor's state, or a fresh one.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn load_store(session: &Session) -> Result<StoreState, tower_sessions::session::Error> {
    Ok(session
        .get::<StoreState>(keys::STORE_STATE)
        .await?
        .unwrap_or_default())
}

/// Write the visitor's state back.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn save_store(
    session: &Session,
    store: &StoreState,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::STORE_STATE, store).await
}

/// Load the state, apply `action`, and save the result.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn dispatch(
    session: &Session,
    action: Action,
) -> Result<StoreState, tower_sessions::session::Error> {
    let kind = action.kind();
    let store = load_store(session).await?.dispatch(action);

    tracing::info!(action = kind, page = %store.page, items = store.item_count(), "dispatch");
    add_breadcrumb("store", kind, &[("page", store.page.slug())]);

    save_store(session, &store).await?;
    Ok(store)
}

/// The gateway order awaiting payment, if it still matches the cart.
///
/// An order opened for a different total than `cart_total` is forgotten, so
/// the visitor starts a fresh one instead of paying a stale amount.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn pending_payment(
    session: &Session,
    cart_total: Price,
) -> Result<Option<PendingPayment>, tower_sessions::session::Error> {
    match session.get::<PendingPayment>(keys::PENDING_PAYMENT).await? {
        Some(pending) if pending.covers(cart_total) => Ok(Some(pending)),
        Some(stale) => {
            tracing::info!(order_id = %stale.order_id, "cart changed, dropping gateway order");
            clear_pending_payment(session).await?;
            Ok(None)
        }
        None => Ok(None),
    }
}

/// Remember the gateway order for the payment page.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn set_pending_payment(
    session: &Session,
    pending: &PendingPayment,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(keys::PENDING_PAYMENT, pending).await
}

/// Forget the gateway order.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn clear_pending_payment(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<PendingPayment>(keys::PENDING_PAYMENT)
        .await?;
    Ok(())
}
