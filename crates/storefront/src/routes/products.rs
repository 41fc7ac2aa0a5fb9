//! Product detail route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, State};
use tower_sessions::Session;
use tracing::instrument;

use pulsepack_core::{Page, Product, ProductId, StoreState};

use super::layout::Layout;
use crate::error::{AppError, Result};
use crate::models::session;
use crate::state::AppState;

/// One preview clip with its play state.
#[derive(Clone)]
pub struct ClipView {
    pub name: String,
    pub duration: String,
    pub url: String,
    pub playing: bool,
}

/// Product detail display data.
#[derive(Clone)]
pub struct ProductView {
    pub id: ProductId,
    pub title: String,
    pub category: String,
    pub price: String,
    pub long_description: String,
    pub sample_count: u32,
    pub bpm: String,
    pub key: String,
    pub file_size: String,
    pub features: Vec<String>,
    pub clips: Vec<ClipView>,
    /// Units of this product already in the cart.
    pub in_cart: u32,
}

impl ProductView {
    fn new(product: &Product, store: &StoreState) -> Self {
        Self {
            id: product.id,
            title: product.title.clone(),
            category: product.category.clone(),
            price: product.price.to_string(),
            long_description: product.long_description.clone(),
            sample_count: product.sample_count,
            bpm: product.bpm.clone(),
            key: product.key.clone(),
            file_size: product.file_size.clone(),
            features: product.features.clone(),
            clips: product
                .previews
                .iter()
                .map(|clip| ClipView {
                    name: clip.name.clone(),
                    duration: clip.duration.clone(),
                    url: clip.url.clone(),
                    playing: store.preview.is_playing(&clip.url),
                })
                .collect(),
            in_cart: store
                .cart
                .line_for(product.id)
                .map_or(0, |line| line.quantity),
        }
    }

    /// The clip currently flagged as playing.
    #[must_use]
    pub fn playing_clip(&self) -> Option<&ClipView> {
        self.clips.iter().find(|clip| clip.playing)
    }
}

/// Product detail template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductTemplate {
    pub layout: Layout,
    pub product: ProductView,
}

/// Display a product with its preview clips.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<ProductId>,
) -> Result<ProductTemplate> {
    let product = state
        .catalog()
        .get(id)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;
    let store = session::load_store(&session).await?;

    Ok(ProductTemplate {
        // Product pages sit under the catalog in the nav.
        layout: Layout::for_page(&store, Page::AllPacks),
        product: ProductView::new(product, &store),
    })
}
