//! JSON API.
//!
//! Stateless endpoints for account management and order creation. They never
//! touch the visitor's session; errors render as `{"error": "..."}`.

pub mod accounts;
pub mod orders;

use axum::{Json, extract::Query};
use serde::{Deserialize, Serialize};

/// Health check body.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
}

/// API liveness check.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        message: "Backend is running",
    })
}

/// Payment status query.
#[derive(Debug, Deserialize)]
pub struct PaymentStatusQuery {
    pub order_id: Option<String>,
}

/// Payment status body.
#[derive(Debug, Serialize)]
pub struct PaymentStatusResponse {
    pub message: &'static str,
    pub order_id: Option<String>,
}

/// Echo the order id the gateway returned with.
pub async fn payment_status(Query(query): Query<PaymentStatusQuery>) -> Json<PaymentStatusResponse> {
    Json(PaymentStatusResponse {
        message: "Payment status check page",
        order_id: query.order_id,
    })
}
