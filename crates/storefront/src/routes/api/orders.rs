//! Order creation endpoint.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use pulsepack_core::{AccountId, Price};

use super::accounts::json_body;
use crate::error::{ApiError, AppError};
use crate::services::accounts::AccountError;
use crate::services::payments::{Customer, start_checkout};
use crate::state::AppState;

/// Order request body.
#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub uid: Option<String>,
    /// Amount in the store currency.
    pub amount: Option<Decimal>,
}

/// Order response body.
#[derive(Debug, Serialize)]
pub struct CreateOrderResponse {
    pub success: bool,
    pub payment_session_id: String,
}

/// `POST /api/create_order`
#[instrument(skip_all)]
pub async fn create_order(
    State(state): State<AppState>,
    payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<Json<CreateOrderResponse>, ApiError> {
    let body = json_body(payload)?;
    let (Some(uid), Some(amount)) = (body.uid.filter(|uid| !uid.is_empty()), body.amount) else {
        return Err(AppError::BadRequest("User ID and amount are required".to_string()).into());
    };

    let uid = uid
        .parse::<AccountId>()
        .map_err(|_| AccountError::NotFound)?;
    let account = state.accounts().get(uid).await?;

    let order = start_checkout(
        state.payments(),
        Customer {
            id: account.uid,
            email: account.email,
        },
        Price::new(amount, state.catalog().currency()),
    )
    .await?;

    Ok(Json(CreateOrderResponse {
        success: true,
        payment_session_id: order.payment_session_id,
    }))
}
