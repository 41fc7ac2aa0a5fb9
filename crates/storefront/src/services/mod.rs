//! Business logic services for storefront.
//!
//! - `accounts` - In-memory account directory (signup, login, lookup)
//! - `payments` - Hosted payment gateway (Cashfree)

pub mod accounts;
pub mod payments;
