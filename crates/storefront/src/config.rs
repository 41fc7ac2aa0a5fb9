//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `PULSEPACK_HOST` - Bind address (default: 127.0.0.1)
//! - `PULSEPACK_PORT` - Listen port (default: 3000)
//! - `PULSEPACK_BASE_URL` - Public URL of the storefront (default: <http://localhost:3000>)
//! - `PULSEPACK_CATALOG_PATH` - Catalog JSON file (default: built-in catalog)
//! - `CASHFREE_APP_ID` - Payment gateway client id
//! - `CASHFREE_SECRET_KEY` - Payment gateway client secret (required with the app id)
//! - `CASHFREE_API_URL` - Gateway base URL (default: <https://sandbox.cashfree.com/pg>)
//! - `CASHFREE_API_VERSION` - Gateway API version header (default: 2023-08-01)
//! - `CASHFREE_CUSTOMER_PHONE` - Phone number sent with orders (default: 9999999999)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate, 0.0-1.0 (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate, 0.0-1.0 (default: 0.0)
//!
//! Without `CASHFREE_APP_ID` the storefront runs with payments disabled.

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "put-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL, used for the gateway return URL and cookie security
    pub base_url: Url,
    /// Catalog file; `None` uses the built-in catalog
    pub catalog_path: Option<PathBuf>,
    /// Payment gateway credentials; `None` disables checkout
    pub payments: Option<PaymentConfig>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
    /// Fraction of errors sent to Sentry
    pub sentry_sample_rate: f32,
    /// Fraction of transactions traced
    pub sentry_traces_sample_rate: f32,
}

/// Payment gateway (Cashfree) configuration.
///
/// Implements `Debug` manually to redact the secret key.
#[derive(Clone)]
pub struct PaymentConfig {
    /// Client id sent as `x-client-id`
    pub app_id: String,
    /// Client secret sent as `x-client-secret`
    pub secret_key: SecretString,
    /// Base URL, `/orders` is appended
    pub api_url: Url,
    /// Value of the `x-api-version` header
    pub api_version: String,
    /// Phone number sent as customer contact
    pub customer_phone: String,
}

impl std::fmt::Debug for PaymentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentConfig")
            .field("app_id", &self.app_id)
            .field("secret_key", &"[REDACTED]")
            .field("api_url", &self.api_url.as_str())
            .field("api_version", &self.api_version)
            .field("customer_phone", &self.customer_phone)
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is invalid or the gateway secret
    /// fails validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`StorefrontConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let host = env.parsed("PULSEPACK_HOST", "127.0.0.1")?;
        let port = env.parsed("PULSEPACK_PORT", "3000")?;
        let base_url = env.url("PULSEPACK_BASE_URL", "http://localhost:3000")?;
        let catalog_path = env.optional("PULSEPACK_CATALOG_PATH").map(PathBuf::from);
        let payments = PaymentConfig::from_env(&env)?;

        Ok(Self {
            host,
            port,
            base_url,
            catalog_path,
            payments,
            sentry_dsn: env.optional("SENTRY_DSN"),
            sentry_environment: env.optional("SENTRY_ENVIRONMENT"),
            sentry_sample_rate: env.rate("SENTRY_SAMPLE_RATE", "1.0")?,
            sentry_traces_sample_rate: env.rate("SENTRY_TRACES_SAMPLE_RATE", "0.0")?,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.scheme() == "https"
    }

    /// Return URL handed to the gateway. `{order_id}` is substituted by the
    /// gateway itself.
    #[must_use]
    pub fn payment_return_url(&self) -> String {
        let base = self.base_url.as_str().trim_end_matches('/');
        format!(
            "{base}{}?{}={{order_id}}",
            pulsepack_core::redirect::PAYMENT_RETURN_PATH,
            pulsepack_core::redirect::ORDER_ID_PARAM
        )
    }
}

impl PaymentConfig {
    fn from_env<F>(env: &Env<F>) -> Result<Option<Self>, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let Some(app_id) = env.optional("CASHFREE_APP_ID") else {
            return Ok(None);
        };

        Ok(Some(Self {
            app_id,
            secret_key: env.validated_secret("CASHFREE_SECRET_KEY")?,
            api_url: env.url("CASHFREE_API_URL", "https://sandbox.cashfree.com/pg")?,
            api_version: env.or_default("CASHFREE_API_VERSION", "2023-08-01"),
            customer_phone: env.or_default("CASHFREE_CUSTOMER_PHONE", "9999999999"),
        }))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable lookup with typed accessors.
struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Get an optional variable; blank values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key).filter(|value| !value.trim().is_empty())
    }

    /// Get a required variable.
    fn required(&self, key: &str) -> Result<String, ConfigError> {
        self.optional(key)
            .ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }

    /// Parse a variable (or its default) with `FromStr`.
    fn parsed<T>(&self, key: &str, default: &str) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: std::fmt::Display,
    {
        self.or_default(key, default)
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    }

    /// Parse an absolute http(s) URL.
    fn url(&self, key: &str, default: &str) -> Result<Url, ConfigError> {
        let url: Url = self.parsed(key, default)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }
        Ok(url)
    }

    /// Parse a sampling rate in `0.0..=1.0`.
    fn rate(&self, key: &str, default: &str) -> Result<f32, ConfigError> {
        let rate: f32 = self.parsed(key, default)?;
        if !(0.0..=1.0).contains(&rate) {
            return Err(ConfigError::InvalidEnvVar(
                key.to_string(),
                format!("{rate} is outside 0.0..=1.0"),
            ));
        }
        Ok(rate)
    }

    /// Load and validate a secret.
    fn validated_secret(&self, key: &str) -> Result<SecretString, ConfigError> {
        let value = self.required(key)?;
        validate_secret_strength(&value, key)?;
        Ok(SecretString::from(value))
    }
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    if let Some(pattern) = PLACEHOLDER_PATTERNS.iter().find(|p| lower.contains(**p)) {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!("appears to be a placeholder (contains '{pattern}')"),
        ));
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1})"
            ),
        ));
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const GOOD_SECRET: &str = "cfsk_ma_test_8f2a91c4e7b3d05a_Qz7Lm2Vx";

    fn config_from(pairs: &[(&str, &str)]) -> Result<StorefrontConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        StorefrontConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.socket_addr().to_string(), "127.0.0.1:3000");
        assert_eq!(config.base_url.as_str(), "http://localhost:3000/");
        assert!(config.catalog_path.is_none());
        assert!(config.payments.is_none());
        assert!(!config.is_secure());
        assert!((config.sentry_sample_rate - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_invalid_port() {
        let err = config_from(&[("PULSEPACK_PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "PULSEPACK_PORT"));
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        let err = config_from(&[("PULSEPACK_BASE_URL", "ftp://files.local")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_sample_rate_bounds() {
        assert!(config_from(&[("SENTRY_SAMPLE_RATE", "1.5")]).is_err());
        let config = config_from(&[("SENTRY_TRACES_SAMPLE_RATE", "0.25")]).unwrap();
        assert!((config.sentry_traces_sample_rate - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn test_payment_return_url() {
        let config = config_from(&[("PULSEPACK_BASE_URL", "https://shop.pulsepack.io/")]).unwrap();
        assert!(config.is_secure());
        assert_eq!(
            config.payment_return_url(),
            "https://shop.pulsepack.io/payment/status?order_id={order_id}"
        );
    }

    #[test]
    fn test_payments_require_secret() {
        let err = config_from(&[("CASHFREE_APP_ID", "TEST1074")]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(key) if key == "CASHFREE_SECRET_KEY"));
    }

    #[test]
    fn test_payments_enabled() {
        let config = config_from(&[
            ("CASHFREE_APP_ID", "TEST1074"),
            ("CASHFREE_SECRET_KEY", GOOD_SECRET),
        ])
        .unwrap();
        let payments = config.payments.unwrap();
        assert_eq!(payments.api_version, "2023-08-01");
        assert_eq!(payments.api_url.as_str(), "https://sandbox.cashfree.com/pg");
        assert_eq!(payments.customer_phone, "9999999999");
    }

    #[test]
    fn test_payment_config_debug_redacts_secret() {
        let config = config_from(&[
            ("CASHFREE_APP_ID", "TEST1074"),
            ("CASHFREE_SECRET_KEY", GOOD_SECRET),
        ])
        .unwrap();
        let debug_output = format!("{:?}", config.payments.unwrap());
        assert!(debug_output.contains("TEST1074"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains(GOOD_SECRET));
    }

    #[test]
    fn test_shannon_entropy() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
        assert!((shannon_entropy("aaaa") - 0.0).abs() < f64::EPSILON);
        assert!((shannon_entropy("ab") - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_secret_strength() {
        assert!(validate_secret_strength("your-secret-key", "K").is_err());
        assert!(validate_secret_strength("changeme123", "K").is_err());
        assert!(validate_secret_strength(&"ab".repeat(20), "K").is_err());
        assert!(validate_secret_strength(GOOD_SECRET, "K").is_ok());
    }
}
