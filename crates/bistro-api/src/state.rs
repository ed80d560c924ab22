//! # Application State
//!
//! Shared state for the Axum application: configuration, the document store,
//! the payment gateway and the token keys.

use crate::auth::TokenKeys;
use bistro_core::{SharedGateway, SharedStore};
use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_TOKEN_TTL_SECONDS: i64 = 3600;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// HS256 signing secret
    pub token_secret: String,
    /// Access token lifetime
    pub token_ttl_seconds: i64,
    /// CORS origins; empty means any
    pub allowed_origins: Vec<String>,
}

impl AppConfig {
    /// Load from environment variables (and `.env` if present)
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load from any variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = match lookup("PORT") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value,
            })?,
            None => DEFAULT_PORT,
        };

        let token_secret = lookup("ACCESS_TOKEN_SECRET")
            .filter(|secret| !secret.is_empty())
            .ok_or(ConfigError::Missing("ACCESS_TOKEN_SECRET"))?;

        let token_ttl_seconds = match lookup("ACCESS_TOKEN_TTL_SECONDS") {
            Some(value) => match value.parse::<i64>() {
                Ok(ttl) if ttl > 0 => ttl,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "ACCESS_TOKEN_TTL_SECONDS",
                        value,
                    })
                }
            },
            None => DEFAULT_TOKEN_TTL_SECONDS,
        };

        let allowed_origins = lookup("ALLOWED_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            host,
            port,
            token_secret,
            token_ttl_seconds,
            allowed_origins,
        })
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse().map_err(|_| ConfigError::Invalid {
            name: "HOST",
            value: addr,
        })
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: SharedStore,
    pub gateway: SharedGateway,
    pub tokens: Arc<TokenKeys>,
}

impl AppState {
    pub fn new(config: AppConfig, store: SharedStore, gateway: SharedGateway) -> Self {
        let tokens = TokenKeys::new(&config.token_secret, config.token_ttl_seconds);
        Self {
            config: Arc::new(config),
            store,
            gateway,
            tokens: Arc::new(tokens),
        }
    }
}
