//! Cashfree Payment Gateway client.
//!
//! Only the "create order" call is used. Cashfree answers with a
//! `payment_session_id` that the browser SDK turns into a hosted checkout,
//! and sends the visitor back to the configured return URL afterwards.

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use rust_decimal::Decimal;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use super::{GatewayOrder, OrderRequest, PaymentError, PaymentGateway};
use crate::config::PaymentConfig;

/// Cashfree API client.
#[derive(Clone)]
pub struct CashfreeClient {
    client: reqwest::Client,
    orders_url: String,
    return_url: String,
    customer_phone: String,
}

impl CashfreeClient {
    /// Create a new Cashfree client.
    ///
    /// `return_url` may contain the literal `{order_id}`, which Cashfree
    /// replaces with the order id when redirecting back.
    ///
    /// # Errors
    ///
    /// Returns error if a credential is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &PaymentConfig, return_url: String) -> Result<Self, PaymentError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-api-version",
            header_value("API version", &config.api_version)?,
        );
        headers.insert("x-client-id", header_value("client id", &config.app_id)?);
        let mut secret = header_value("client secret", config.secret_key.expose_secret())?;
        secret.set_sensitive(true);
        headers.insert("x-client-secret", secret);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            orders_url: format!("{}/orders", config.api_url.as_str().trim_end_matches('/')),
            return_url,
            customer_phone: config.customer_phone.clone(),
        })
    }

    fn body<'a>(&'a self, request: &'a OrderRequest) -> CreateOrderBody<'a> {
        CreateOrderBody {
            order_id: request.order_id.as_str(),
            order_amount: request.amount.amount,
            order_currency: request.amount.currency_code.code(),
            customer_details: CustomerDetails {
                customer_id: request.customer.id.to_string(),
                customer_email: request.customer.email.as_str(),
                customer_phone: &self.customer_phone,
            },
            order_meta: OrderMeta {
                return_url: &self.return_url,
            },
        }
    }
}

#[async_trait]
impl PaymentGateway for CashfreeClient {
    async fn create_order(&self, request: &OrderRequest) -> Result<GatewayOrder, PaymentError> {
        let response = self
            .client
            .post(&self.orders_url)
            .json(&self.body(request))
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            tracing::warn!(status = status.as_u16(), %message, "Cashfree rejected order");
            return Err(PaymentError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let created: CreateOrderResponse = response
            .json()
            .await
            .map_err(|e| PaymentError::Parse(e.to_string()))?;

        let payment_session_id = created
            .payment_session_id
            .filter(|id| !id.is_empty())
            .ok_or(PaymentError::MissingSessionId)?;

        Ok(GatewayOrder {
            order_id: request.order_id.clone(),
            payment_session_id,
        })
    }
}

fn header_value(what: &str, value: &str) -> Result<HeaderValue, PaymentError> {
    HeaderValue::from_str(value).map_err(|e| PaymentError::Parse(format!("Invalid {what}: {e}")))
}

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Serialize)]
struct CreateOrderBody<'a> {
    order_id: &'a str,
    #[serde(with = "rust_decimal::serde::float")]
    order_amount: Decimal,
    order_currency: &'a str,
    customer_details: CustomerDetails<'a>,
    order_meta: OrderMeta<'a>,
}

#[derive(Debug, Serialize)]
struct CustomerDetails<'a> {
    customer_id: String,
    customer_email: &'a str,
    customer_phone: &'a str,
}

#[derive(Debug, Serialize)]
struct OrderMeta<'a> {
    return_url: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreateOrderResponse {
    payment_session_id: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::{Json, Router, http::HeaderMap as AxumHeaders, http::StatusCode, routing::post};
    use pulsepack_core::{AccountId, CurrencyCode, Email, OrderRef, Price};
    use secrecy::SecretString;
    use serde_json::{Value, json};

    use super::*;
    use crate::services::payments::Customer;

    const SECRET: &str = "cfsk_ma_test_4b1e9d2c7a_Zp3Kq8Wm";

    fn config(api_url: &str) -> PaymentConfig {
        PaymentConfig {
            app_id: "TEST1074".to_string(),
            secret_key: SecretString::from(SECRET),
            api_url: api_url.parse().unwrap(),
            api_version: "2023-08-01".to_string(),
            customer_phone: "9999999999".to_string(),
        }
    }

    fn request() -> OrderRequest {
        OrderRequest {
            order_id: OrderRef::new("order_abc"),
            amount: Price::new(Decimal::new(5998, 2), CurrencyCode::INR),
            customer: Customer {
                id: AccountId::generate(),
                email: Email::parse("ravi@loops.in").unwrap(),
            },
        }
    }

    /// Serve `router` on an ephemeral port and return its base URL.
    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/pg")
    }

    #[test]
    fn test_body_shape() {
        let client = CashfreeClient::new(
            &config("https://sandbox.cashfree.com/pg"),
            "http://localhost:3000/payment/status?order_id={order_id}".to_string(),
        )
        .unwrap();
        let request = request();
        let body = serde_json::to_value(client.body(&request)).unwrap();

        assert_eq!(body["order_id"], "order_abc");
        assert_eq!(body["order_amount"], json!(59.98));
        assert_eq!(body["order_currency"], "INR");
        assert_eq!(body["customer_details"]["customer_phone"], "9999999999");
        assert_eq!(
            body["order_meta"]["return_url"],
            "http://localhost:3000/payment/status?order_id={order_id}"
        );
        assert_eq!(client.orders_url, "https://sandbox.cashfree.com/pg/orders");
    }

    #[tokio::test]
    async fn test_create_order_sends_credentials() {
        let router = Router::new().route(
            "/pg/orders",
            post(|headers: AxumHeaders, Json(body): Json<Value>| async move {
                assert_eq!(headers["x-client-id"], "TEST1074");
                assert_eq!(headers["x-client-secret"], SECRET);
                assert_eq!(headers["x-api-version"], "2023-08-01");
                Json(json!({
                    "order_id": body["order_id"],
                    "payment_session_id": "session_xyz"
                }))
            }),
        );
        let base = serve(router).await;
        let client = CashfreeClient::new(&config(&base), "http://r/".to_string()).unwrap();

        let order = client.create_order(&request()).await.unwrap();
        assert_eq!(order.payment_session_id, "session_xyz");
        assert_eq!(order.order_id, OrderRef::new("order_abc"));
    }

    #[tokio::test]
    async fn test_create_order_api_error() {
        let router = Router::new().route(
            "/pg/orders",
            post(|| async { (StatusCode::UNAUTHORIZED, "authentication failed") }),
        );
        let base = serve(router).await;
        let client = CashfreeClient::new(&config(&base), "http://r/".to_string()).unwrap();

        let err = client.create_order(&request()).await.unwrap_err();
        assert!(matches!(err, PaymentError::Api { status: 401, .. }));
    }

    #[tokio::test]
    async fn test_create_order_without_session_id() {
        let router = Router::new().route(
            "/pg/orders",
            post(|| async { Json(json!({ "order_status": "ACTIVE" })) }),
        );
        let base = serve(router).await;
        let client = CashfreeClient::new(&config(&base), "http://r/".to_string()).unwrap();

        let err = client.create_order(&request()).await.unwrap_err();
        assert!(matches!(err, PaymentError::MissingSessionId));
    }
}
