//! Cart route handlers.
//!
//! Every cart change is one dispatched action on the visitor's state followed
//! by a redirect back to a page, so a refresh never repeats a change.

use askama::Template;
use askama_web::WebTemplate;
use axum::{Form, extract::State, response::Redirect};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use pulsepack_core::{Action, CartLine, CurrencyCode, LineId, LineRef, ProductId, StoreState};

use super::layout::Layout;
use crate::error::{AppError, Result};
use crate::models::session;
use crate::state::AppState;

/// Cart line display data for templates.
#[derive(Clone)]
pub struct LineView {
    pub id: LineId,
    pub position: usize,
    pub product_id: ProductId,
    pub title: String,
    pub category: String,
    pub unit_price: String,
    pub quantity: u32,
    pub line_total: String,
    /// Quantity submitted by the "-" button; zero removes the line.
    pub decrement: i64,
    pub increment: i64,
}

impl LineView {
    fn new(position: usize, line: &CartLine) -> Self {
        let quantity = i64::from(line.quantity);
        Self {
            id: line.id,
            position,
            product_id: line.product.id,
            title: line.product.title.clone(),
            category: line.product.category.clone(),
            unit_price: line.product.price.to_string(),
            quantity: line.quantity,
            line_total: line.line_total().to_string(),
            decrement: quantity - 1,
            increment: quantity + 1,
        }
    }
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/cart.html")]
pub struct CartTemplate {
    pub layout: Layout,
    pub lines: Vec<LineView>,
    pub item_count: u64,
    pub total: String,
}

impl CartTemplate {
    /// Cart view for the visitor's state.
    #[must_use]
    pub fn new(layout: Layout, store: &StoreState, currency: CurrencyCode) -> Self {
        Self {
            layout,
            lines: store
                .cart
                .lines()
                .iter()
                .enumerate()
                .map(|(position, line)| LineView::new(position, line))
                .collect(),
            item_count: store.item_count(),
            total: store.checkout_total(currency).to_string(),
        }
    }
}

// =============================================================================
// Form Types
// =============================================================================

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: ProductId,
    /// Local path to return to; defaults to the root.
    pub next: Option<String>,
}

/// Remove line form data: a stable line id, or a row position.
#[derive(Debug, Deserialize)]
pub struct LineForm {
    pub line_id: Option<LineId>,
    pub position: Option<usize>,
}

/// Update quantity form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub line_id: Option<LineId>,
    pub position: Option<usize>,
    pub quantity: i64,
}

/// Resolve a submitted line address, preferring the stable id.
fn line_ref(line_id: Option<LineId>, position: Option<usize>) -> Result<LineRef> {
    match (line_id, position) {
        (Some(id), _) => Ok(LineRef::Id(id)),
        (None, Some(position)) => Ok(LineRef::Position(position)),
        (None, None) => Err(AppError::BadRequest(
            "line_id or position is required".to_string(),
        )),
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Add one unit of a product.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Redirect> {
    let product = state
        .catalog()
        .get(form.product_id)
        .ok_or_else(|| AppError::NotFound(format!("product {}", form.product_id)))?
        .clone();

    session::dispatch(&session, Action::AddToCart(product)).await?;
    Ok(Redirect::to(local_path(form.next.as_deref())))
}

/// Overwrite a line quantity; zero or less removes the line.
#[instrument(skip(session))]
pub async fn update(session: Session, Form(form): Form<UpdateCartForm>) -> Result<Redirect> {
    let line = line_ref(form.line_id, form.position)?;
    session::dispatch(
        &session,
        Action::UpdateQuantity {
            line,
            quantity: form.quantity,
        },
    )
    .await?;
    Ok(Redirect::to("/"))
}

/// Remove a line.
#[instrument(skip(session))]
pub async fn remove(session: Session, Form(form): Form<LineForm>) -> Result<Redirect> {
    let line = line_ref(form.line_id, form.position)?;
    session::dispatch(&session, Action::RemoveItem(line)).await?;
    Ok(Redirect::to("/"))
}

/// Go to the payment view. An empty cart is allowed through.
#[instrument(skip(session))]
pub async fn checkout(session: Session) -> Result<Redirect> {
    // A previous gateway order was for a different total.
    session::clear_pending_payment(&session).await?;
    session::dispatch(&session, Action::Checkout).await?;
    Ok(Redirect::to("/"))
}

/// Back to the home grid.
#[instrument(skip(session))]
pub async fn continue_shopping(session: Session) -> Result<Redirect> {
    session::dispatch(&session, Action::ContinueShopping).await?;
    Ok(Redirect::to("/"))
}

/// Accept only same-site absolute paths as redirect targets.
///
/// Browsers read a backslash as `/` and drop tabs and newlines from URLs, so either
/// could turn `/x` into a scheme-relative `//host`.
fn local_path(next: Option<&str>) -> &str {
    match next {
        Some(path)
            if path.starts_with('/')
                && !path.starts_with("//")
                && !path.chars().any(|c| c == '\\' || c.is_control()) =>
        {
            path
        }
        _ => "/",
    }
}
