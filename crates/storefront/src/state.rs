//! Application state shared across handlers.

use std::sync::Arc;

use pulsepack_core::Catalog;

use crate::config::StorefrontConfig;
use crate::middleware::SessionLocks;
use crate::services::accounts::AccountDirectory;
use crate::services::payments::{CashfreeClient, PaymentError, PaymentGateway};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// catalog, the account directory and the payment gateway.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    accounts: AccountDirectory,
    payments: Option<Arc<dyn PaymentGateway>>,
    session_locks: SessionLocks,
}

impl AppState {
    /// Create a new application state.
    ///
    /// A Cashfree client is built when payment credentials are configured;
    /// otherwise checkout answers "payments unavailable".
    ///
    /// # Errors
    ///
    /// Returns an error if the Cashfree client cannot be built.
    pub fn new(config: StorefrontConfig, catalog: Catalog) -> Result<Self, PaymentError> {
        let payments = match &config.payments {
            Some(payment_config) => {
                let client = CashfreeClient::new(payment_config, config.payment_return_url())?;
                Some(Arc::new(client) as Arc<dyn PaymentGateway>)
            }
            None => {
                tracing::warn!("CASHFREE_APP_ID not set, payments disabled");
                None
            }
        };

        Ok(Self::with_gateway(config, catalog, payments))
    }

    /// Create state with an explicit gateway (or none).
    #[must_use]
    pub fn with_gateway(
        config: StorefrontConfig,
        catalog: Catalog,
        payments: Option<Arc<dyn PaymentGateway>>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                accounts: AccountDirectory::new(),
                payments,
                session_locks: SessionLocks::new(),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the account directory.
    #[must_use]
    pub fn accounts(&self) -> &AccountDirectory {
        &self.inner.accounts
    }

    /// The payment gateway, if configured.
    #[must_use]
    pub fn payments(&self) -> Option<&dyn PaymentGateway> {
        self.inner.payments.as_deref()
    }

    /// Per-session request locks.
    #[must_use]
    pub fn session_locks(&self) -> &SessionLocks {
        &self.inner.session_locks
    }

    /// Whether checkout can create orders.
    #[must_use]
    pub fn payments_enabled(&self) -> bool {
        self.inner.payments.is_some()
    }

    /// Cashfree SDK mode for the browser (`sandbox` or `production`).
    #[must_use]
    pub fn payment_mode(&self) -> &'static str {
        match &self.inner.config.payments {
            Some(payments) if !payments.api_url.as_str().contains("sandbox") => "production",
            _ => "sandbox",
        }
    }
}
