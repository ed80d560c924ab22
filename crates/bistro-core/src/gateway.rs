//! # Payment Gateway Trait
//!
//! The backend never charges cards itself. It asks a gateway for a payment
//! intent and hands the intent's client secret to the browser, which
//! confirms the payment directly with the provider.
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │          PaymentGateway (trait)          │
//! │  ├── create_intent()                     │
//! │  └── provider_name()                     │
//! └──────────────────────────────────────────┘
//!                      ▲
//!          ┌───────────┴───────────┐
//!  ┌───────┴────────┐      ┌───────┴────────┐
//!  │ StripeIntent   │      │  test doubles  │
//!  │   Gateway      │      │                │
//!  └────────────────┘      └────────────────┘
//! ```

use crate::error::{PaymentError, PaymentResult};
use crate::payment::{IntentRequest, PaymentIntent};
use async_trait::async_trait;
use std::sync::Arc;

/// Core trait for payment provider implementations.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a payment intent for the given amount.
    ///
    /// # Returns
    /// A `PaymentIntent` whose `client_secret` is safe to send to the client.
    async fn create_intent(&self, request: &IntentRequest) -> PaymentResult<PaymentIntent>;

    /// Get the provider name (for logging).
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared gateway (dynamic dispatch)
pub type SharedGateway = Arc<dyn PaymentGateway>;

/// Reject prices that cannot become a positive charge.
pub fn validate_price(price: f64) -> PaymentResult<()> {
    if !price.is_finite() {
        return Err(PaymentError::InvalidPrice {
            message: format!("price must be a finite number, got {}", price),
        });
    }
    if price <= 0.0 {
        return Err(PaymentError::InvalidPrice {
            message: format!("price must be positive, got {}", price),
        });
    }
    Ok(())
}
