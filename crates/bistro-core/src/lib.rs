//! # bistro-core
//!
//! Core types and traits for the Bistro Boss restaurant backend.
//!
//! This crate provides:
//! - `MenuItem`, `Review`, `CartItem`, `User` and `PaymentRecord` documents
//! - `Store` trait for the document database, plus `MemoryStore`
//! - `PaymentGateway` trait for payment providers
//! - Registration, payment recording and dashboard statistics over a `Store`
//! - `StoreError` and `PaymentError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use bistro_core::{payment, MemoryStore, PaymentRecord};
//!
//! let store = MemoryStore::new();
//!
//! // Record a payment and clear the cart lines it paid for
//! let record = PaymentRecord::new("ana@bistro.io", 24.0).with_line(cart_id, menu_id);
//! let receipt = payment::record(&store, record).await?;
//! ```

pub mod cart;
pub mod error;
pub mod gateway;
pub mod memory;
pub mod menu;
pub mod outcome;
pub mod payment;
pub mod review;
pub mod stats;
pub mod store;
pub mod user;

// Re-exports for convenience
pub use cart::{CartItem, CartQuery};
pub use error::{PaymentError, PaymentResult, StoreError, StoreResult};
pub use gateway::{validate_price, PaymentGateway, SharedGateway};
pub use memory::MemoryStore;
pub use menu::{MenuItem, MenuUpdate};
pub use outcome::{DeleteOutcome, InsertOutcome, UpdateOutcome};
pub use payment::{
    ClientSecret, Currency, IntentPrice, IntentRequest, PaymentIntent, PaymentReceipt,
    PaymentRecord,
};
pub use review::Review;
pub use stats::{AdminStats, CategoryStats, CollectionCounts};
pub use store::{SharedStore, Store};
pub use user::{AdminStatus, User, UserCreation, ADMIN_ROLE, USER_EXISTS_MESSAGE};
