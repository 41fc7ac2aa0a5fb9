//! Account directory.
//!
//! Registers accounts with email and password and verifies logins. Accounts
//! live in memory only and disappear on restart. Passwords are stored as
//! Argon2id hashes.

mod error;

pub use error::AccountError;

use std::collections::HashMap;
use std::sync::LazyLock;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

use pulsepack_core::{AccountId, Email, ProfileInput};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Hash checked when the email is unknown, so a miss costs a full Argon2
/// verification like a hit does.
static UNKNOWN_ACCOUNT_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("no account has this password").ok());

/// A registered account, without its password hash.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub uid: AccountId,
    pub email: Email,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
    pub last_login: DateTime<Utc>,
}

impl Account {
    /// Profile data to sign this account into the storefront.
    #[must_use]
    pub fn profile_input(&self) -> ProfileInput {
        ProfileInput {
            uid: self.uid,
            email: self.email.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            display_name: None,
        }
    }
}

/// Signup request fields, as submitted.
#[derive(Debug, Clone, Copy)]
pub struct NewAccount<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
}

struct StoredAccount {
    account: Account,
    password_hash: String,
}

#[derive(Default)]
struct Directory {
    accounts: HashMap<AccountId, StoredAccount>,
    by_email: HashMap<Email, AccountId>,
}

/// In-memory account registry shared by all requests.
#[derive(Default)]
pub struct AccountDirectory {
    inner: RwLock<Directory>,
}

impl AccountDirectory {
    /// An empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::MissingField` if any field is blank,
    /// `AccountError::InvalidEmail` if the email format is invalid,
    /// `AccountError::WeakPassword` if the password is too short, and
    /// `AccountError::AlreadyExists` if the email is already registered.
    pub async fn signup(&self, new: NewAccount<'_>) -> Result<Account, AccountError> {
        let email = require("email", new.email)?;
        let password = require("password", new.password)?;
        let first_name = require("firstName", new.first_name)?.trim().to_string();
        let last_name = require("lastName", new.last_name)?.trim().to_string();

        let email = Email::parse(email)?;
        validate_password(password)?;

        // Hash outside the lock.
        let password = password.to_string();
        let password_hash = off_runtime(move || hash_password(&password)).await?;

        let mut directory = self.inner.write().await;
        if directory.by_email.contains_key(&email) {
            return Err(AccountError::AlreadyExists);
        }

        let now = Utc::now();
        let account = Account {
            uid: AccountId::generate(),
            email: email.clone(),
            first_name,
            last_name,
            created_at: now,
            last_login: now,
        };

        directory.by_email.insert(email, account.uid);
        directory.accounts.insert(
            account.uid,
            StoredAccount {
                account: account.clone(),
                password_hash,
            },
        );

        tracing::info!(uid = %account.uid, "account created");
        Ok(account)
    }

    /// Verify a login and record its time.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::MissingField` for blank input and
    /// `AccountError::InvalidCredentials` for an unknown email or a wrong
    /// password.
    pub async fn login(&self, email: &str, password: &str) -> Result<Account, AccountError> {
        let email = require("email", email)?;
        let password = require("password", password)?;
        let email = Email::parse(email).map_err(|_| AccountError::InvalidCredentials)?;

        let stored_hash = {
            let directory = self.inner.read().await;
            directory
                .by_email
                .get(&email)
                .and_then(|uid| directory.accounts.get(uid))
                .map(|stored| stored.password_hash.clone())
        };

        let known = stored_hash.is_some();
        let password = password.to_string();
        off_runtime(move || {
            let hash = stored_hash
                .or_else(|| UNKNOWN_ACCOUNT_HASH.clone())
                .ok_or(AccountError::PasswordHash)?;
            verify_password(&password, &hash)
        })
        .await?;
        if !known {
            return Err(AccountError::InvalidCredentials);
        }

        let mut directory = self.inner.write().await;
        let uid = *directory
            .by_email
            .get(&email)
            .ok_or(AccountError::InvalidCredentials)?;
        let stored = directory
            .accounts
            .get_mut(&uid)
            .ok_or(AccountError::InvalidCredentials)?;
        stored.account.last_login = Utc::now();
        Ok(stored.account.clone())
    }

    /// Look up an account by id.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::NotFound` for an unknown id.
    pub async fn get(&self, uid: AccountId) -> Result<Account, AccountError> {
        self.inner
            .read()
            .await
            .accounts
            .get(&uid)
            .map(|stored| stored.account.clone())
            .ok_or(AccountError::NotFound)
    }

    /// Number of registered accounts.
    pub async fn len(&self) -> usize {
        self.inner.read().await.accounts.len()
    }

    /// Whether no account is registered.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.accounts.is_empty()
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn require<'a>(field: &'static str, value: &'a str) -> Result<&'a str, AccountError> {
    if value.trim().is_empty() {
        Err(AccountError::MissingField(field))
    } else {
        Ok(value)
    }
}

fn validate_password(password: &str) -> Result<(), AccountError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AccountError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Run Argon2 work on the blocking pool.
async fn off_runtime<T, F>(work: F) -> Result<T, AccountError>
where
    F: FnOnce() -> Result<T, AccountError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|_| AccountError::PasswordHash)?
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AccountError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AccountError::PasswordHash)
}

/// Verify a password against a stored hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AccountError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AccountError::PasswordHash)?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AccountError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const NEW: NewAccount<'static> = NewAccount {
        email: "nia@beats.io",
        password: "808-and-snare",
        first_name: "Nia",
        last_name: "Brooks",
    };

    #[tokio::test]
    async fn test_signup_then_login() {
        let directory = AccountDirectory::new();
        let created = directory.signup(NEW).await.unwrap();
        assert_eq!(created.first_name, "Nia");
        assert_eq!(directory.len().await, 1);

        let logged_in = directory.login("nia@BEATS.io", "808-and-snare").await.unwrap();
        assert_eq!(logged_in.uid, created.uid);
        assert!(logged_in.last_login >= created.last_login);
    }

    #[tokio::test]
    async fn test_unknown_email_still_verifies_a_hash() {
        let hash = UNKNOWN_ACCOUNT_HASH.as_deref().unwrap();
        assert!(PasswordHash::new(hash).is_ok());
        assert!(matches!(
            verify_password("808-and-snare", hash),
            Err(AccountError::InvalidCredentials)
        ));

        let directory = AccountDirectory::new();
        directory.signup(NEW).await.unwrap();
        let err = directory
            .login("ghost@beats.io", "no account has this password")
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let directory = AccountDirectory::new();
        directory.signup(NEW).await.unwrap();
        let err = directory.signup(NEW).await.unwrap_err();
        assert!(matches!(err, AccountError::AlreadyExists));
    }

    #[tokio::test]
    async fn test_missing_fields_are_reported() {
        let directory = AccountDirectory::new();
        let err = directory
            .signup(NewAccount {
                last_name: " ",
                ..NEW
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::MissingField("lastName")));
        assert!(directory.is_empty().await);
    }

    #[tokio::test]
    async fn test_weak_password_and_bad_email() {
        let directory = AccountDirectory::new();
        let err = directory
            .signup(NewAccount {
                password: "short",
                ..NEW
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::WeakPassword(_)));

        let err = directory
            .signup(NewAccount {
                email: "not-an-email",
                ..NEW
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::InvalidEmail(_)));
    }

    #[tokio::test]
    async fn test_wrong_password_and_unknown_email() {
        let directory = AccountDirectory::new();
        directory.signup(NEW).await.unwrap();

        let err = directory.login("nia@beats.io", "wrong-pass").await.unwrap_err();
        assert!(matches!(err, AccountError::InvalidCredentials));

        let err = directory.login("ghost@beats.io", "808-and-snare").await.unwrap_err();
        assert!(matches!(err, AccountError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_get_by_uid() {
        let directory = AccountDirectory::new();
        let created = directory.signup(NEW).await.unwrap();
        assert_eq!(directory.get(created.uid).await.unwrap().email, created.email);

        let err = directory.get(AccountId::generate()).await.unwrap_err();
        assert!(matches!(err, AccountError::NotFound));
    }

    #[test]
    fn test_profile_input_has_no_display_name() {
        let now = Utc::now();
        let account = Account {
            uid: AccountId::generate(),
            email: Email::parse("nia@beats.io").unwrap(),
            first_name: "Nia".to_string(),
            last_name: "Brooks".to_string(),
            created_at: now,
            last_login: now,
        };
        let input = account.profile_input();
        assert!(input.display_name.is_none());
        assert_eq!(input.uid, account.uid);
    }
}
