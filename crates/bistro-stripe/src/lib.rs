//! # bistro-stripe
//!
//! Stripe payment gateway for the Bistro Boss backend.
//!
//! **StripeIntentGateway** creates card-only PaymentIntents and returns the
//! client secret the storefront uses to confirm the payment.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bistro_stripe::StripeIntentGateway;
//! use bistro_core::{IntentRequest, PaymentGateway};
//!
//! // Create gateway from environment
//! let gateway = StripeIntentGateway::from_env()?;
//!
//! // $24.50 becomes 2450 cents
//! let intent = gateway.create_intent(&IntentRequest::card_usd(24.5)).await?;
//!
//! // Send intent.client_secret to the browser
//! ```

pub mod config;
pub mod intent;

// Re-exports
pub use config::StripeConfig;
pub use intent::StripeIntentGateway;
