//! Audio preview toggles on the product detail view.
//!
//! At most one preview is flagged as playing per visitor. Playing the flagged
//! clip again stops it.

use axum::{Form, extract::State, response::Redirect};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use pulsepack_core::{Action, ProductId};

use crate::error::{AppError, Result};
use crate::models::session;
use crate::state::AppState;

/// Play toggle form data.
#[derive(Debug, Deserialize)]
pub struct PlayForm {
    pub product_id: ProductId,
    pub url: String,
}

/// Pause or ended form data.
#[derive(Debug, Deserialize)]
pub struct StopForm {
    pub product_id: ProductId,
}

/// Toggle a clip.
#[instrument(skip(state, session))]
pub async fn play(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<PlayForm>,
) -> Result<Redirect> {
    let product = state
        .catalog()
        .get(form.product_id)
        .ok_or_else(|| AppError::NotFound(format!("product {}", form.product_id)))?;
    if !product.has_preview(&form.url) {
        return Err(AppError::BadRequest(format!(
            "{} is not a preview of product {}",
            form.url, form.product_id
        )));
    }

    session::dispatch(&session, Action::PreviewPlay(form.url)).await?;
    Ok(back_to(form.product_id))
}

/// Stop the playing clip.
#[instrument(skip(session))]
pub async fn pause(session: Session, Form(form): Form<StopForm>) -> Result<Redirect> {
    session::dispatch(&session, Action::PreviewPause).await?;
    Ok(back_to(form.product_id))
}

/// The playing clip reached its end.
#[instrument(skip(session))]
pub async fn ended(session: Session, Form(form): Form<StopForm>) -> Result<Redirect> {
    session::dispatch(&session, Action::PreviewEnded).await?;
    Ok(back_to(form.product_id))
}

fn back_to(product_id: ProductId) -> Redirect {
    Redirect::to(&format!("/products/{product_id}"))
}
