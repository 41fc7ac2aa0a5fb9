//! End-to-end test harness for the PulsePack storefront.
//!
//! Each [`TestServer`] runs the full storefront router on an ephemeral port
//! with the built-in catalog and a [`FakeGateway`] standing in for Cashfree,
//! so the tests need no network access and no configuration.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p pulsepack-integration-tests
//! ```

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use reqwest::Client;

use pulsepack_core::Price;
use pulsepack_storefront::{
    app,
    catalog::builtin_catalog,
    config::StorefrontConfig,
    services::payments::{GatewayOrder, OrderRequest, PaymentError, PaymentGateway},
    state::AppState,
};

/// Session id every fake order returns.
pub const FAKE_SESSION_ID: &str = "session_test_123";

/// Gateway double that accepts every order and remembers the amounts.
#[derive(Default)]
pub struct FakeGateway {
    amounts: Mutex<Vec<Price>>,
}

impl FakeGateway {
    /// Amounts of the orders created so far.
    #[must_use]
    pub fn amounts(&self) -> Vec<Price> {
        self.amounts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn create_order(&self, request: &OrderRequest) -> Result<GatewayOrder, PaymentError> {
        self.amounts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.amount);
        Ok(GatewayOrder {
            order_id: request.order_id.clone(),
            payment_session_id: FAKE_SESSION_ID.to_string(),
        })
    }
}

/// A running storefront plus a cookie-holding client pointed at it.
pub struct TestServer {
    pub base_url: String,
    pub client: Client,
    pub gateway: Arc<FakeGateway>,
}

impl TestServer {
    /// Start a storefront with payments enabled.
    ///
    /// # Panics
    ///
    /// Panics if the server cannot be started.
    pub async fn start() -> Self {
        Self::spawn(true).await
    }

    /// Start a storefront without a payment gateway.
    ///
    /// # Panics
    ///
    /// Panics if the server cannot be started.
    pub async fn start_without_payments() -> Self {
        Self::spawn(false).await
    }

    async fn spawn(payments: bool) -> Self {
        let config = StorefrontConfig::from_lookup(|_| None).expect("default config");
        let catalog = builtin_catalog().expect("built-in catalog");
        let gateway = Arc::new(FakeGateway::default());
        let state = AppState::with_gateway(
            config,
            catalog,
            payments.then(|| Arc::clone(&gateway) as Arc<dyn PaymentGateway>),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local address");
        // Peer addresses key the rate limiters.
        let service = app(state).into_make_service_with_connect_info::<SocketAddr>();
        tokio::spawn(async move {
            axum::serve(listener, service)
                .await
                .expect("storefront server");
        });

        Self {
            base_url: format!("http://{addr}"),
            client: Self::client(),
            gateway,
        }
    }

    /// A fresh visitor: its own cookie jar, redirects followed.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be built.
    #[must_use]
    pub fn client() -> Client {
        Client::builder()
            .cookie_store(true)
            .build()
            .expect("Failed to create HTTP client")
    }

    /// Absolute URL for `path`.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// GET `path` and return the status and body.
    ///
    /// # Panics
    ///
    /// Panics if the request fails.
    pub async fn get(&self, path: &str) -> (u16, String) {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("GET request");
        let status = resp.status().as_u16();
        (status, resp.text().await.expect("response body"))
    }

    /// POST a form to `path` (following the redirect) and return the final
    /// status and body.
    ///
    /// # Panics
    ///
    /// Panics if the request fails.
    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> (u16, String) {
        let resp = self
            .client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("POST request");
        let status = resp.status().as_u16();
        (status, resp.text().await.expect("response body"))
    }

    /// Register an account through the signup form; the visitor ends up
    /// signed in.
    pub async fn sign_up(&self, email: &str) -> (u16, String) {
        self.post_form(
            "/auth/signup",
            &[
                ("email", email),
                ("password", "correct-horse-battery"),
                ("first_name", "Ada"),
                ("last_name", "Okafor"),
            ],
        )
        .await
    }
}

/// Value of the cart badge in a rendered page.
#[must_use]
pub fn cart_count(html: &str) -> Option<u64> {
    let start = html.find("data-cart-count>")? + "data-cart-count>".len();
    let rest = html.get(start..)?;
    let end = rest.find('<')?;
    rest.get(..end)?.trim().parse().ok()
}
