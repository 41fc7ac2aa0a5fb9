//! PulsePack Core - storefront state model.
//!
//! This crate holds everything about a visitor's storefront state that does
//! not touch the network:
//!
//! - [`catalog`] - Product reference data and catalog validation
//! - [`cart`] - Cart lines addressed by stable ids
//! - [`session`] - Signed-in / signed-out status and profiles
//! - [`page`] - Top-level page selection
//! - [`order`] - Confirmation details
//! - [`preview`] - Which audio preview is flagged as playing
//! - [`redirect`] - Payment gateway return-URL detection
//! - [`store`] - The state container and its single `dispatch` path
//! - [`types`] - Newtype IDs, prices and email addresses
//!
//! # Architecture
//!
//! No I/O, no HTTP, no async. The storefront binary loads a visitor's
//! [`StoreState`] from the session, dispatches one [`Action`], and writes the
//! result back.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod order;
pub mod page;
pub mod preview;
pub mod redirect;
pub mod session;
pub mod store;
pub mod types;

pub use cart::{Cart, CartLine, LineRef, QuantityChange};
pub use catalog::{Catalog, CatalogError, CategoryGroup, PreviewClip, Product};
pub use order::{OrderDetails, OrderRef};
pub use page::Page;
pub use preview::PreviewPlayer;
pub use redirect::PaymentReturn;
pub use session::{ProfileInput, Session, UserProfile};
pub use store::{Action, Startup, StoreState};
pub use types::*;
