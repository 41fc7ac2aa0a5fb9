//! Value types shared by the state model.
//!
//! Type-safe wrappers for identifiers, prices and email addresses.

pub mod email;
pub mod id;
pub mod price;

pub use email::{Email, EmailError};
pub use id::{AccountId, LineId, ProductId};
pub use price::{CurrencyCode, Price};
