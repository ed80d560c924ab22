//! # Stripe Payment Intents
//!
//! Implementation of the Stripe PaymentIntents API. The browser confirms the
//! card payment with the returned client secret; the backend only creates
//! the intent.

use crate::config::StripeConfig;
use async_trait::async_trait;
use bistro_core::{
    Currency, IntentRequest, PaymentError, PaymentGateway, PaymentIntent, PaymentResult,
};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, info, instrument};

const PROVIDER: &str = "stripe";

/// Stripe PaymentIntents gateway
pub struct StripeIntentGateway {
    config: StripeConfig,
    client: Client,
}

impl StripeIntentGateway {
    /// Create a new gateway with a 30 second request timeout
    pub fn new(config: StripeConfig) -> PaymentResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| PaymentError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> PaymentResult<Self> {
        let config = StripeConfig::from_env()?;
        Self::new(config)
    }

    pub fn config(&self) -> &StripeConfig {
        &self.config
    }

    /// Form fields for `POST /v1/payment_intents`
    fn form_params(request: &IntentRequest) -> Vec<(String, String)> {
        let mut params = vec![
            ("amount".to_string(), request.amount.to_string()),
            ("currency".to_string(), request.currency.as_str().to_string()),
        ];
        for (i, method) in request.payment_method_types.iter().enumerate() {
            params.push((format!("payment_method_types[{}]", i), method.clone()));
        }
        params
    }
}

#[async_trait]
impl PaymentGateway for StripeIntentGateway {
    #[instrument(skip(self, request), fields(amount = request.amount, currency = %request.currency))]
    async fn create_intent(&self, request: &IntentRequest) -> PaymentResult<PaymentIntent> {
        if request.amount <= 0 {
            return Err(PaymentError::InvalidPrice {
                message: format!("amount must be positive, got {}", request.amount),
            });
        }

        let form_params = Self::form_params(request);
        debug!("Creating Stripe payment intent: {:?}", form_params);

        let url = format!("{}/v1/payment_intents", self.config.api_base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .form(&form_params)
            .send()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PaymentError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            error!("Stripe API error: status={}, body={}", status, body);

            if let Ok(error_response) = serde_json::from_str::<StripeErrorResponse>(&body) {
                return Err(PaymentError::ProviderError {
                    provider: PROVIDER.to_string(),
                    message: error_response.error.message,
                });
            }

            return Err(PaymentError::ProviderError {
                provider: PROVIDER.to_string(),
                message: format!("HTTP {}: {}", status, body),
            });
        }

        let intent: StripePaymentIntentResponse = serde_json::from_str(&body).map_err(|e| {
            PaymentError::Serialization(format!("Failed to parse Stripe response: {}", e))
        })?;

        info!(
            "Created Stripe payment intent: id={}, amount={}",
            intent.id, intent.amount
        );

        Ok(PaymentIntent {
            id: intent.id,
            client_secret: intent.client_secret,
            amount: intent.amount,
            currency: request.currency,
            status: intent.status.unwrap_or_default(),
        })
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

// =============================================================================
// Stripe API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripePaymentIntentResponse {
    id: String,
    client_secret: String,
    amount: i64,
    #[serde(default)]
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn gateway(server: &MockServer) -> StripeIntentGateway {
        let config = StripeConfig::new("sk_test_abc123").with_api_base_url(server.uri());
        StripeIntentGateway::new(config).unwrap()
    }

    #[test]
    fn test_form_params() {
        let params = StripeIntentGateway::form_params(&IntentRequest::card_usd(12.5));

        assert!(params.contains(&("amount".to_string(), "1250".to_string())));
        assert!(params.contains(&("currency".to_string(), "usd".to_string())));
        assert!(params.contains(&("payment_method_types[0]".to_string(), "card".to_string())));
    }

    #[tokio::test]
    async fn test_create_intent_returns_client_secret() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/payment_intents"))
            .and(header("Authorization", "Bearer sk_test_abc123"))
            .and(body_string_contains("amount=2000"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "pi_123",
                "client_secret": "pi_123_secret_456",
                "amount": 2000,
                "currency": "usd",
                "status": "requires_payment_method"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let intent = gateway(&server)
            .create_intent(&IntentRequest::card_usd(20.0))
            .await
            .unwrap();

        assert_eq!(intent.client_secret, "pi_123_secret_456");
        assert_eq!(intent.amount, 2000);
        assert_eq!(intent.currency, Currency::USD);
    }

    #[tokio::test]
    async fn test_provider_error_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/payment_intents"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": { "message": "Amount must be at least $0.50 usd" }
            })))
            .mount(&server)
            .await;

        let err = gateway(&server)
            .create_intent(&IntentRequest::card_usd(0.1))
            .await
            .unwrap_err();

        match err {
            PaymentError::ProviderError { provider, message } => {
                assert_eq!(provider, "stripe");
                assert!(message.contains("at least"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_positive_amount_never_reaches_stripe() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let request = IntentRequest {
            amount: 0,
            currency: Currency::USD,
            payment_method_types: vec!["card".into()],
        };
        let err = gateway(&server).create_intent(&request).await.unwrap_err();
        assert!(matches!(err, PaymentError::InvalidPrice { .. }));
    }
}
