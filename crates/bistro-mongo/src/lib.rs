//! # bistro-mongo
//!
//! MongoDB-backed [`Store`](bistro_core::Store) for the Bistro Boss backend.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bistro_mongo::{MongoConfig, MongoStore};
//!
//! let config = MongoConfig::from_env()?;
//! let store = MongoStore::connect(&config).await?;
//!
//! let menu = store.list_menu().await?;
//! ```

pub mod config;
pub mod store;

// Re-exports
pub use config::{atlas_uri, MongoConfig, MongoConfigError};
pub use store::MongoStore;
