//! Account endpoints: signup, login and lookup.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use pulsepack_core::{AccountId, Email};

use crate::error::{ApiError, AppError};
use crate::services::accounts::{Account, AccountError, NewAccount};
use crate::state::AppState;

/// Signup request body.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Login request body.
#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Public account fields returned after signup and login.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub uid: AccountId,
    pub email: Email,
    pub first_name: String,
    pub last_name: String,
}

impl From<Account> for UserSummary {
    fn from(account: Account) -> Self {
        Self {
            uid: account.uid,
            email: account.email,
            first_name: account.first_name,
            last_name: account.last_name,
        }
    }
}

/// Signup and login response body.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub success: bool,
    pub message: &'static str,
    pub user: UserSummary,
}

/// Account lookup response body.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub success: bool,
    pub user: Account,
}

/// Turn a JSON extractor rejection into a `{"error"}` response.
pub(super) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()).into())
}

/// `POST /api/signup`
#[instrument(skip_all)]
pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let body = json_body(payload)?;
    let account = state
        .accounts()
        .signup(NewAccount {
            email: body.email.as_deref().unwrap_or_default(),
            password: body.password.as_deref().unwrap_or_default(),
            first_name: body.first_name.as_deref().unwrap_or_default(),
            last_name: body.last_name.as_deref().unwrap_or_default(),
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            success: true,
            message: "User created successfully",
            user: account.into(),
        }),
    ))
}

/// `POST /api/login`
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
    let body = json_body(payload)?;
    let (Some(email), Some(password)) = (body.email, body.password) else {
        return Err(AppError::BadRequest("Email and password are required".to_string()).into());
    };

    let account = state.accounts().login(&email, &password).await?;
    tracing::info!(uid = %account.uid, "api login");

    Ok(Json(AuthResponse {
        success: true,
        message: "Login successful",
        user: account.into(),
    }))
}

/// `GET /api/user/{uid}`
#[instrument(skip(state))]
pub async fn user(
    State(state): State<AppState>,
    Path(uid): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let uid = uid
        .parse::<AccountId>()
        .map_err(|_| AccountError::NotFound)?;
    let account = state.accounts().get(uid).await?;

    Ok(Json(UserResponse {
        success: true,
        user: account,
    }))
}
