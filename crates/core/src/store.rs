//! Application-state container.
//!
//! All visitor state lives in one [`StoreState`] value and changes only through
//! [`StoreState::dispatch`], which takes the state by value, applies one
//! [`Action`], and returns the next state. Nothing else mutates it, so every
//! transition can be logged and replayed.

use serde::{Deserialize, Serialize};

use crate::cart::{Cart, LineRef};
use crate::catalog::Product;
use crate::order::OrderDetails;
use crate::page::Page;
use crate::preview::PreviewPlayer;
use crate::redirect::{PaymentReturn, ROOT_PATH};
use crate::session::{ProfileInput, Session, UserProfile};
use crate::types::{CurrencyCode, Price};

/// Everything a visitor can do to the storefront state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum Action {
    /// Select a page. No transition rules apply.
    Navigate(Page),
    /// Add one unit of a product.
    AddToCart(Product),
    /// Overwrite a line quantity; zero or less removes the line.
    UpdateQuantity { line: LineRef, quantity: i64 },
    /// Drop a line.
    RemoveItem(LineRef),
    /// Go to the payment page. The cart may be empty.
    Checkout,
    /// Back to the home grid from the cart.
    ContinueShopping,
    Login(ProfileInput),
    Signup(ProfileInput),
    /// Clear the session; the current page stays.
    Logout,
    PaymentSucceeded(OrderDetails),
    PaymentCancelled,
    PreviewPlay(String),
    PreviewPause,
    PreviewEnded,
}

impl Action {
    /// Short name for logs.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Navigate(_) => "navigate",
            Self::AddToCart(_) => "add_to_cart",
            Self::UpdateQuantity { .. } => "update_quantity",
            Self::RemoveItem(_) => "remove_item",
            Self::Checkout => "checkout",
            Self::ContinueShopping => "continue_shopping",
            Self::Login(_) => "login",
            Self::Signup(_) => "signup",
            Self::Logout => "logout",
            Self::PaymentSucceeded(_) => "payment_succeeded",
            Self::PaymentCancelled => "payment_cancelled",
            Self::PreviewPlay(_) => "preview_play",
            Self::PreviewPause => "preview_pause",
            Self::PreviewEnded => "preview_ended",
        }
    }
}

/// Result of running the one-shot startup check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Startup {
    pub state: StoreState,
    /// Where the visible location must be replaced to, if anywhere.
    pub rewrite_to: Option<&'static str>,
}

/// A visitor's complete storefront state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreState {
    pub page: Page,
    pub cart: Cart,
    pub session: Session,
    /// Set by the last successful payment.
    pub order: Option<OrderDetails>,
    pub preview: PreviewPlayer,
}

impl StoreState {
    /// Fresh state: home page, empty cart, signed out.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one action and return the next state.
    #[must_use]
    pub fn dispatch(mut self, action: Action) -> Self {
        match action {
            Action::Navigate(page) => self.page = page,
            Action::AddToCart(product) => {
                self.cart.add(product);
            }
            Action::UpdateQuantity { line, quantity } => {
                self.cart.set_quantity(line, quantity);
            }
            Action::RemoveItem(line) => {
                self.cart.remove(line);
            }
            Action::Checkout => self.page = Page::Payment,
            Action::ContinueShopping => self.page = Page::Home,
            Action::Login(input) | Action::Signup(input) => {
                self.session = Session::SignedIn {
                    profile: UserProfile::from(input),
                };
                self.page = Page::Home;
            }
            Action::Logout => self.session = Session::SignedOut,
            Action::PaymentSucceeded(details) => {
                self.order = Some(details);
                self.cart.clear();
                self.page = Page::ThankYou;
            }
            Action::PaymentCancelled => self.page = Page::Cart,
            Action::PreviewPlay(url) => self.preview.play(&url),
            Action::PreviewPause => self.preview.pause(),
            Action::PreviewEnded => self.preview.ended(),
        }
        self
    }

    /// Apply a sequence of actions in order.
    #[must_use]
    pub fn dispatch_all(self, actions: impl IntoIterator<Item = Action>) -> Self {
        actions.into_iter().fold(self, Self::dispatch)
    }

    /// Run the startup check against the location the visitor arrived at.
    ///
    /// On the payment return path this completes the payment and asks for the
    /// location to be rewritten to `/`; anywhere else the state is unchanged.
    #[must_use]
    pub fn startup(self, path: &str, query: Option<&str>) -> Startup {
        match PaymentReturn::detect(path, query) {
            Some(ret) => Startup {
                state: self.dispatch(Action::PaymentSucceeded(ret.details)),
                rewrite_to: Some(ROOT_PATH),
            },
            None => Startup {
                state: self,
                rewrite_to: None,
            },
        }
    }

    /// Total units in the cart (navigation badge).
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.cart.item_count()
    }

    /// Amount due at checkout.
    #[must_use]
    pub fn checkout_total(&self, currency: CurrencyCode) -> Price {
        self.cart.total(currency)
    }
}
