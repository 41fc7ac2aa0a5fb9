//! Replay recorded actions through the storefront state container.
//!
//! Steps mirror the storefront's actions, except `add_to_cart` names a
//! product id that is resolved against a catalog file:
//!
//! ```json
//! [
//!   {"type": "add_to_cart", "payload": 2},
//!   {"type": "update_quantity", "payload": {"line": {"position": 0}, "quantity": 3}},
//!   {"type": "checkout"}
//! ]
//! ```

use std::path::Path;

use pulsepack_core::{
    Action, Catalog, LineRef, OrderDetails, Page, ProductId, ProfileInput, StoreState,
};
use serde::Deserialize;

use super::catalog::{self, CatalogFileError};

/// Errors from a replay run.
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error(transparent)]
    Catalog(#[from] CatalogFileError),

    #[error("failed to read steps: {0}")]
    Read(#[from] std::io::Error),

    #[error("invalid steps file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("step {step}: product {product} is not in the catalog")]
    UnknownProduct { step: usize, product: ProductId },
}

/// One recorded visitor action.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Step {
    Navigate(Page),
    AddToCart(ProductId),
    UpdateQuantity { line: LineRef, quantity: i64 },
    RemoveItem(LineRef),
    Checkout,
    ContinueShopping,
    Login(ProfileInput),
    Signup(ProfileInput),
    Logout,
    PaymentSucceeded(OrderDetails),
    PaymentCancelled,
    PreviewPlay(String),
    PreviewPause,
    PreviewEnded,
}

impl Step {
    fn into_action(self, catalog: &Catalog, step: usize) -> Result<Action, ReplayError> {
        Ok(match self {
            Self::Navigate(page) => Action::Navigate(page),
            Self::AddToCart(product) => Action::AddToCart(
                catalog
                    .get(product)
                    .cloned()
                    .ok_or(ReplayError::UnknownProduct { step, product })?,
            ),
            Self::UpdateQuantity { line, quantity } => Action::UpdateQuantity { line, quantity },
            Self::RemoveItem(line) => Action::RemoveItem(line),
            Self::Checkout => Action::Checkout,
            Self::ContinueShopping => Action::ContinueShopping,
            Self::Login(input) => Action::Login(input),
            Self::Signup(input) => Action::Signup(input),
            Self::Logout => Action::Logout,
            Self::PaymentSucceeded(details) => Action::PaymentSucceeded(details),
            Self::PaymentCancelled => Action::PaymentCancelled,
            Self::PreviewPlay(url) => Action::PreviewPlay(url),
            Self::PreviewPause => Action::PreviewPause,
            Self::PreviewEnded => Action::PreviewEnded,
        })
    }
}

/// Resolve steps and fold them over a fresh state, after the startup check
/// for `arrive` when given.
///
/// # Errors
///
/// Returns `ReplayError::UnknownProduct` for the first step that names a
/// product missing from `catalog`.
pub fn replay(
    catalog: &Catalog,
    steps: Vec<Step>,
    arrive: Option<&str>,
) -> Result<StoreState, ReplayError> {
    let mut state = StoreState::new();
    if let Some(location) = arrive {
        let (path, query) = location
            .split_once('?')
            .map_or((location, None), |(path, query)| (path, Some(query)));
        let startup = state.startup(path, query);
        if let Some(target) = startup.rewrite_to {
            tracing::info!("startup check completed a payment, location rewritten to {target}");
        }
        state = startup.state;
    }

    let actions = steps
        .into_iter()
        .enumerate()
        .map(|(index, step)| step.into_action(catalog, index + 1))
        .collect::<Result<Vec<_>, _>>()?;

    for action in actions {
        tracing::debug!(action = action.kind(), "dispatch");
        state = state.dispatch(action);
    }
    Ok(state)
}

/// Replay a steps file and log the resulting state.
///
/// # Errors
///
/// Returns an error if either file is unreadable or invalid, or a step names
/// an unknown product.
pub async fn run(steps: &Path, catalog: &Path, arrive: Option<&str>) -> Result<(), ReplayError> {
    let catalog = catalog::load(catalog).await?;
    let json = tokio::fs::read_to_string(steps).await?;
    let steps: Vec<Step> = serde_json::from_str(&json)?;
    let count = steps.len();

    let state = replay(&catalog, steps, arrive)?;

    tracing::info!("replayed {count} step(s)");
    tracing::info!("page: {}", state.page.slug());
    match state.session.profile() {
        Some(profile) => tracing::info!("signed in as {} <{}>", profile.name, profile.email),
        None => tracing::info!("signed out"),
    }
    for line in state.cart.lines() {
        tracing::info!(
            "  line {} {} x{} = {}",
            line.id,
            line.product.title,
            line.quantity,
            line.line_total()
        );
    }
    tracing::info!(
        "cart: {} item(s), total {}",
        state.item_count(),
        state.checkout_total(catalog.currency())
    );
    if let Some(order) = &state.order {
        tracing::info!(
            "last order: {}",
            order.order_id.as_ref().map_or("(no order id)", |id| id.as_str())
        );
    }
    if let Some(url) = state.preview.playing() {
        tracing::info!("playing preview: {url}");
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"{
        "currency": "USD",
        "products": [
            {"id": 1, "title": "Tape Hiss", "category": "Lo-Fi", "price": 10},
            {"id": 2, "title": "Sub Pressure", "category": "Drill", "price": 25}
        ]
    }"#;

    fn steps(json: &str) -> Vec<Step> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_replay_cart_session() {
        let catalog = Catalog::from_json(CATALOG).unwrap();
        let state = replay(
            &catalog,
            steps(
                r#"[
                    {"type": "add_to_cart", "payload": 1},
                    {"type": "add_to_cart", "payload": 2},
                    {"type": "add_to_cart", "payload": 1},
                    {"type": "update_quantity", "payload": {"line": {"position": 1}, "quantity": 0}},
                    {"type": "navigate", "payload": "cart"}
                ]"#,
            ),
            None,
        )
        .unwrap();

        assert_eq!(state.page, Page::Cart);
        assert_eq!(state.cart.len(), 1);
        assert_eq!(state.item_count(), 2);
    }

    #[test]
    fn test_replay_unknown_product() {
        let catalog = Catalog::from_json(CATALOG).unwrap();
        let err = replay(
            &catalog,
            steps(r#"[{"type": "checkout"}, {"type": "add_to_cart", "payload": 9}]"#),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, ReplayError::UnknownProduct { step: 2, .. }));
    }

    #[test]
    fn test_replay_arrival_on_payment_return() {
        let catalog = Catalog::from_json(CATALOG).unwrap();
        let state = replay(
            &catalog,
            Vec::new(),
            Some("/payment/status?order_id=order_abc"),
        )
        .unwrap();

        assert_eq!(state.page, Page::ThankYou);
        assert_eq!(
            state.order.unwrap().order_id.unwrap().as_str(),
            "order_abc"
        );
    }
}
