//! Account directory error types.

use thiserror::Error;

/// Errors that can occur during signup, login or account lookup.
#[derive(Debug, Error)]
pub enum AccountError {
    /// A required signup or login field is blank.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] pulsepack_core::EmailError),

    /// Wrong password or unknown email.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// No account with the requested id.
    #[error("account not found")]
    NotFound,

    /// Email is already registered.
    #[error("account already exists")]
    AlreadyExists,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
