//! # Document Store Trait
//!
//! Every handler reaches the database through this trait. One implementation
//! talks to MongoDB (`bistro-mongo`); [`MemoryStore`](crate::MemoryStore)
//! keeps everything in process.
//!
//! Deleting or updating an id that does not exist is not an error: the
//! outcome simply reports zero matched/deleted documents.

use crate::cart::CartItem;
use crate::error::StoreResult;
use crate::menu::{MenuItem, MenuUpdate};
use crate::outcome::{DeleteOutcome, InsertOutcome, UpdateOutcome};
use crate::payment::PaymentRecord;
use crate::review::Review;
use crate::stats::{CategoryStats, CollectionCounts};
use crate::user::User;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait Store: Send + Sync {
    // Menu

    async fn list_menu(&self) -> StoreResult<Vec<MenuItem>>;

    async fn get_menu_item(&self, id: &str) -> StoreResult<Option<MenuItem>>;

    /// Insert verbatim; any `id` on the item is ignored.
    async fn insert_menu_item(&self, item: MenuItem) -> StoreResult<InsertOutcome>;

    async fn update_menu_item(&self, id: &str, update: &MenuUpdate) -> StoreResult<UpdateOutcome>;

    async fn delete_menu_item(&self, id: &str) -> StoreResult<DeleteOutcome>;

    // Reviews

    async fn list_reviews(&self) -> StoreResult<Vec<Review>>;

    // Carts

    /// Cart lines whose `email` equals `email`
    async fn list_cart(&self, email: &str) -> StoreResult<Vec<CartItem>>;

    async fn insert_cart_item(&self, item: CartItem) -> StoreResult<InsertOutcome>;

    async fn delete_cart_item(&self, id: &str) -> StoreResult<DeleteOutcome>;

    /// Delete every cart line whose id is in `ids`
    async fn delete_cart_items(&self, ids: &[String]) -> StoreResult<DeleteOutcome>;

    // Users

    async fn list_users(&self) -> StoreResult<Vec<User>>;

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn insert_user(&self, user: User) -> StoreResult<InsertOutcome>;

    async fn set_user_role(&self, id: &str, role: &str) -> StoreResult<UpdateOutcome>;

    async fn delete_user(&self, id: &str) -> StoreResult<DeleteOutcome>;

    // Payments

    async fn insert_payment(&self, payment: PaymentRecord) -> StoreResult<InsertOutcome>;

    async fn find_payment_by_transaction(
        &self,
        transaction_id: &str,
    ) -> StoreResult<Option<PaymentRecord>>;

    async fn list_payments(&self, email: &str) -> StoreResult<Vec<PaymentRecord>>;

    // Stats

    /// Approximate sizes of the users, menu and payments collections
    async fn estimated_counts(&self) -> StoreResult<CollectionCounts>;

    /// Sum of `price` over all payments, 0 when there are none
    async fn total_revenue(&self) -> StoreResult<f64>;

    /// Per-category quantity and revenue of purchased menu items
    async fn category_breakdown(&self) -> StoreResult<Vec<CategoryStats>>;

    // Health

    async fn ping(&self) -> StoreResult<()>;
}

/// Type alias for a shared store (dynamic dispatch)
pub type SharedStore = Arc<dyn Store>;
