//! # Error Types
//!
//! Typed errors for the two external collaborators: the document store and
//! the payment gateway. Store operations return `StoreResult<T>`, gateway
//! operations return `PaymentResult<T>`.

use thiserror::Error;

/// Errors raised by a [`Store`](crate::Store) implementation
#[derive(Debug, Error)]
pub enum StoreError {
    /// Identifier is not in the store's id format
    #[error("Invalid id: {0}")]
    InvalidId(String),

    /// Unique key violation (e.g. a second user with the same email)
    #[error("Duplicate key: {0}")]
    Duplicate(String),

    /// Connection, command or server-side failure
    #[error("Store backend error: {0}")]
    Backend(String),

    /// Document could not be converted to or from the stored shape
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl StoreError {
    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            StoreError::InvalidId(_) => 400,
            StoreError::Duplicate(_) => 409,
            StoreError::Backend(_) => 500,
            StoreError::Serialization(_) => 500,
        }
    }
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by a [`PaymentGateway`](crate::PaymentGateway)
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Price is not a finite positive amount
    #[error("Invalid price: {message}")]
    InvalidPrice { message: String },

    /// Payment provider API error
    #[error("Provider error [{provider}]: {message}")]
    ProviderError { provider: String, message: String },

    /// Network/HTTP error communicating with provider
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl PaymentError {
    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            PaymentError::Configuration(_) => 500,
            PaymentError::InvalidPrice { .. } => 400,
            PaymentError::ProviderError { .. } => 502,
            PaymentError::NetworkError(_) => 503,
            PaymentError::Serialization(_) => 500,
        }
    }
}

/// Result type alias for payment operations
pub type PaymentResult<T> = Result<T, PaymentError>;
