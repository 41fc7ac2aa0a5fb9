//! Payment gateway integration.
//!
//! The storefront never handles card data. Checkout creates an order with the
//! hosted gateway, hands the returned payment session id to the browser, and
//! learns about success only through the gateway's return URL
//! (`/payment/status?order_id=...`).

mod cashfree;

pub use cashfree::CashfreeClient;

use async_trait::async_trait;
use thiserror::Error;

use pulsepack_core::{AccountId, Email, OrderRef, Price};

/// Errors that can occur when creating a gateway order.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// No gateway is configured.
    #[error("payment gateway is not configured")]
    Disabled,

    /// The amount is zero or negative.
    #[error("invalid order amount: {0}")]
    InvalidAmount(String),

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Gateway returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Gateway accepted the order but returned no payment session id.
    #[error("gateway response has no payment_session_id")]
    MissingSessionId,

    /// Client setup or response parsing failed.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Customer the order is created for.
#[derive(Debug, Clone)]
pub struct Customer {
    pub id: AccountId,
    pub email: Email,
}

/// A request to open a hosted-checkout order.
#[derive(Debug, Clone)]
pub struct OrderRequest {
    pub order_id: OrderRef,
    pub amount: Price,
    pub customer: Customer,
}

/// An order accepted by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayOrder {
    pub order_id: OrderRef,
    /// Token the browser SDK uses to open the hosted checkout.
    pub payment_session_id: String,
}

/// A hosted payment gateway.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create an order and return its payment session.
    async fn create_order(&self, request: &OrderRequest) -> Result<GatewayOrder, PaymentError>;
}

/// Open a gateway order for `customer` over `amount`.
///
/// # Errors
///
/// Returns `PaymentError::Disabled` without a gateway,
/// `PaymentError::InvalidAmount` for a non-positive amount, and whatever the
/// gateway returns otherwise.
pub async fn start_checkout(
    gateway: Option<&dyn PaymentGateway>,
    customer: Customer,
    amount: Price,
) -> Result<GatewayOrder, PaymentError> {
    let gateway = gateway.ok_or(PaymentError::Disabled)?;
    if !amount.is_positive() {
        return Err(PaymentError::InvalidAmount(amount.to_string()));
    }

    let request = OrderRequest {
        order_id: OrderRef::generate(),
        amount,
        customer,
    };

    tracing::info!(
        order_id = %request.order_id,
        amount = %request.amount,
        customer = %request.customer.id,
        "creating gateway order"
    );
    gateway.create_order(&request).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use pulsepack_core::CurrencyCode;
    use rust_decimal::Decimal;

    use super::*;

    #[derive(Default)]
    struct RecordingGateway {
        seen: Mutex<Vec<OrderRequest>>,
    }

    #[async_trait]
    impl PaymentGateway for RecordingGateway {
        async fn create_order(
            &self,
            request: &OrderRequest,
        ) -> Result<GatewayOrder, PaymentError> {
            self.seen.lock().unwrap().push(request.clone());
            Ok(GatewayOrder {
                order_id: request.order_id.clone(),
                payment_session_id: "session_test".to_string(),
            })
        }
    }

    fn customer() -> Customer {
        Customer {
            id: AccountId::generate(),
            email: Email::parse("ravi@loops.in").unwrap(),
        }
    }

    #[tokio::test]
    async fn test_start_checkout_generates_order_id() {
        let gateway = RecordingGateway::default();
        let amount = Price::new(Decimal::new(4999, 2), CurrencyCode::INR);

        let order = start_checkout(Some(&gateway), customer(), amount)
            .await
            .unwrap();

        assert!(order.order_id.as_str().starts_with(OrderRef::PREFIX));
        assert_eq!(order.payment_session_id, "session_test");
        let seen = gateway.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen.first().unwrap().amount, amount);
    }

    #[tokio::test]
    async fn test_start_checkout_rejects_zero_amount() {
        let gateway = RecordingGateway::default();
        let err = start_checkout(Some(&gateway), customer(), Price::zero(CurrencyCode::USD))
            .await
            .unwrap_err();
        assert!(matches!(err, PaymentError::InvalidAmount(_)));
        assert!(gateway.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_start_checkout_without_gateway() {
        let amount = Price::new(Decimal::ONE, CurrencyCode::USD);
        let err = start_checkout(None, customer(), amount).await.unwrap_err();
        assert!(matches!(err, PaymentError::Disabled));
    }
}
