//! Order confirmation data passed from the payment step to the thank-you page.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Order identifier issued when a gateway order is created.
///
/// Opaque to the storefront; it only round-trips through the gateway's
/// return URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderRef(String);

impl OrderRef {
    /// Prefix of every identifier generated by [`OrderRef::generate`].
    pub const PREFIX: &'static str = "order_";

    /// Wrap an identifier received from outside.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// A fresh `order_<32 hex digits>` identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(format!("{}{}", Self::PREFIX, uuid::Uuid::new_v4().simple()))
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Details shown on the confirmation screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDetails {
    /// Absent when the gateway returned without an `order_id` parameter.
    pub order_id: Option<OrderRef>,
}

impl OrderDetails {
    /// Details for a known order id.
    #[must_use]
    pub const fn for_order(order_id: OrderRef) -> Self {
        Self {
            order_id: Some(order_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_have_prefix_and_hex_body() {
        let id = OrderRef::generate();
        let body = id.as_str().strip_prefix(OrderRef::PREFIX);
        assert!(body.is_some_and(|hex| hex.len() == 32
            && hex.chars().all(|c| c.is_ascii_hexdigit())));
        assert_ne!(id, OrderRef::generate());
    }
}
