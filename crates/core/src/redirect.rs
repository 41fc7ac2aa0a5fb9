//! Payment gateway return-URL handling.
//!
//! After checkout the gateway sends the visitor back to
//! `/payment/status?order_id=<id>`. That URL is handled exactly once: the
//! caller runs the success flow and then replaces the location with `/` so a
//! refresh does not complete the payment again.

use url::form_urlencoded;

use crate::order::{OrderDetails, OrderRef};

/// Path the gateway returns to.
pub const PAYMENT_RETURN_PATH: &str = "/payment/status";

/// Query parameter carrying the order identifier.
pub const ORDER_ID_PARAM: &str = "order_id";

/// Location the visible URL is rewritten to after a handled return.
pub const ROOT_PATH: &str = "/";

/// A recognized gateway return.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentReturn {
    pub details: OrderDetails,
}

impl PaymentReturn {
    /// Inspect a request path and raw query string.
    ///
    /// Returns `None` when the path is not the payment return path. A missing
    /// or empty `order_id` yields details without an order id.
    #[must_use]
    pub fn detect(path: &str, query: Option<&str>) -> Option<Self> {
        if path != PAYMENT_RETURN_PATH {
            return None;
        }

        let order_id = query
            .map(|q| q.strip_prefix('?').unwrap_or(q))
            .and_then(|q| {
                form_urlencoded::parse(q.as_bytes())
                    .find(|(key, _)| key == ORDER_ID_PARAM)
                    .map(|(_, value)| value.into_owned())
            })
            .filter(|value| !value.is_empty())
            .map(OrderRef::new);

        Some(Self {
            details: OrderDetails { order_id },
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_order_id() {
        let ret = PaymentReturn::detect("/payment/status", Some("order_id=abc123")).unwrap();
        assert_eq!(ret.details.order_id, Some(OrderRef::new("abc123")));
    }

    #[test]
    fn test_leading_question_mark_and_other_params() {
        let ret =
            PaymentReturn::detect("/payment/status", Some("?cf=1&order_id=order_9%2Bx")).unwrap();
        assert_eq!(ret.details.order_id, Some(OrderRef::new("order_9+x")));
    }

    #[test]
    fn test_missing_parameter_is_absent_not_error() {
        let ret = PaymentReturn::detect("/payment/status", None).unwrap();
        assert_eq!(ret.details.order_id, None);

        let ret = PaymentReturn::detect("/payment/status", Some("order_id=")).unwrap();
        assert_eq!(ret.details.order_id, None);
    }

    #[test]
    fn test_other_paths_are_ignored() {
        assert!(PaymentReturn::detect("/", Some("order_id=abc")).is_none());
        assert!(PaymentReturn::detect("/payment/status/", None).is_none());
    }
}
