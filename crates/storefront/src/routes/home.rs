//! The storefront root: renders whichever view the visitor's current page
//! selects, and the navigation action that changes it.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use pulsepack_core::{Action, Page, Product, ProductId, StoreState};

use super::layout::Layout;
use super::{auth, cart, payment};
use crate::error::Result;
use crate::models::{PendingPayment, session};
use crate::state::AppState;

// =============================================================================
// View Types
// =============================================================================

/// Product card on the home grid and the all-packs page.
#[derive(Clone)]
pub struct ProductCard {
    pub id: ProductId,
    pub title: String,
    pub category: String,
    pub price: String,
    pub description: String,
    pub sample_count: u32,
    pub preview_count: usize,
}

impl From<&Product> for ProductCard {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            title: product.title.clone(),
            category: product.category.clone(),
            price: product.price.to_string(),
            description: product.description.clone(),
            sample_count: product.sample_count,
            preview_count: product.previews.len(),
        }
    }
}

/// A category heading with its products.
#[derive(Clone)]
pub struct CategoryView {
    pub name: String,
    pub products: Vec<ProductCard>,
}

// =============================================================================
// Templates
// =============================================================================

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/home.html")]
pub struct HomeTemplate {
    pub layout: Layout,
    pub featured: Vec<ProductCard>,
}

/// All-packs page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/all_packs.html")]
pub struct AllPacksTemplate {
    pub layout: Layout,
    pub categories: Vec<CategoryView>,
}

/// Order confirmation template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/thank_you.html")]
pub struct ThankYouTemplate {
    pub layout: Layout,
    pub order_id: Option<String>,
}

// =============================================================================
// View Switch
// =============================================================================

/// Render the view for the visitor's current page.
///
/// `error` is shown on the login, signup and payment views.
pub fn render_page(
    state: &AppState,
    store: &StoreState,
    pending: Option<PendingPayment>,
    error: Option<String>,
) -> Response {
    let layout = Layout::for_store(store);
    let catalog = state.catalog();

    match store.page {
        Page::Home => HomeTemplate {
            layout,
            featured: catalog.featured().into_iter().map(ProductCard::from).collect(),
        }
        .into_response(),
        Page::AllPacks => AllPacksTemplate {
            layout,
            categories: catalog
                .by_category()
                .into_iter()
                .map(|group| CategoryView {
                    name: group.name.to_string(),
                    products: group.products.into_iter().map(ProductCard::from).collect(),
                })
                .collect(),
        }
        .into_response(),
        Page::Login => auth::LoginTemplate { layout, error }.into_response(),
        Page::Signup => auth::SignupTemplate { layout, error }.into_response(),
        Page::Cart => cart::CartTemplate::new(layout, store, catalog.currency()).into_response(),
        Page::Payment => payment::PaymentTemplate {
            layout,
            total: store.checkout_total(catalog.currency()).to_string(),
            item_count: store.item_count(),
            signed_in: store.session.is_signed_in(),
            payments_enabled: state.payments_enabled(),
            mode: state.payment_mode(),
            pending,
            error,
        }
        .into_response(),
        Page::ThankYou => ThankYouTemplate {
            layout,
            order_id: store
                .order
                .as_ref()
                .and_then(|order| order.order_id.as_ref())
                .map(ToString::to_string),
        }
        .into_response(),
    }
}

/// Display the active view.
#[instrument(skip(state, session))]
pub async fn home(State(state): State<AppState>, session: Session) -> Result<Response> {
    let store = session::load_store(&session).await?;
    let total = store.checkout_total(state.catalog().currency());
    let pending = session::pending_payment(&session, total).await?;
    Ok(render_page(&state, &store, pending, None))
}

// =============================================================================
// Navigation
// =============================================================================

/// Navigation form data.
#[derive(Debug, Deserialize)]
pub struct NavigateForm {
    pub page: String,
}

/// Select a page. Unknown slugs select home.
#[instrument(skip(session))]
pub async fn navigate(session: Session, Form(form): Form<NavigateForm>) -> Result<Redirect> {
    session::dispatch(&session, Action::Navigate(Page::from_slug(&form.page))).await?;
    Ok(Redirect::to("/"))
}
