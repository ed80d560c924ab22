//! # In-Memory Store
//!
//! A [`Store`] backed by vectors behind a single lock, used by the test
//! suites. Ids are random hex strings, so any id is well formed here.

use crate::cart::CartItem;
use crate::error::{StoreError, StoreResult};
use crate::menu::{MenuItem, MenuUpdate};
use crate::outcome::{DeleteOutcome, InsertOutcome, UpdateOutcome};
use crate::payment::PaymentRecord;
use crate::review::Review;
use crate::stats::{self, CategoryStats, CollectionCounts};
use crate::store::Store;
use crate::user::User;
use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Collections {
    menu: Vec<MenuItem>,
    reviews: Vec<Review>,
    carts: Vec<CartItem>,
    users: Vec<User>,
    payments: Vec<PaymentRecord>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()[..24].to_string()
}

fn remove_where<T>(items: &mut Vec<T>, pred: impl Fn(&T) -> bool) -> DeleteOutcome {
    let before = items.len();
    items.retain(|item| !pred(item));
    DeleteOutcome::new((before - items.len()) as u64)
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed reviews; the API itself never writes them.
    pub async fn add_review(&self, mut review: Review) -> String {
        let id = new_id();
        review.id = Some(id.clone());
        self.inner.write().await.reviews.push(review);
        id
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn list_menu(&self) -> StoreResult<Vec<MenuItem>> {
        Ok(self.inner.read().await.menu.clone())
    }

    async fn get_menu_item(&self, id: &str) -> StoreResult<Option<MenuItem>> {
        let guard = self.inner.read().await;
        Ok(guard
            .menu
            .iter()
            .find(|item| item.id.as_deref() == Some(id))
            .cloned())
    }

    async fn insert_menu_item(&self, mut item: MenuItem) -> StoreResult<InsertOutcome> {
        let id = new_id();
        item.id = Some(id.clone());
        self.inner.write().await.menu.push(item);
        Ok(InsertOutcome::inserted(id))
    }

    async fn update_menu_item(&self, id: &str, update: &MenuUpdate) -> StoreResult<UpdateOutcome> {
        let mut guard = self.inner.write().await;
        match guard
            .menu
            .iter_mut()
            .find(|item| item.id.as_deref() == Some(id))
        {
            Some(item) => {
                let modified = update.apply(item);
                Ok(UpdateOutcome::new(1, modified as u64))
            }
            None => Ok(UpdateOutcome::new(0, 0)),
        }
    }

    async fn delete_menu_item(&self, id: &str) -> StoreResult<DeleteOutcome> {
        let mut guard = self.inner.write().await;
        Ok(remove_where(&mut guard.menu, |item| {
            item.id.as_deref() == Some(id)
        }))
    }

    async fn list_reviews(&self) -> StoreResult<Vec<Review>> {
        Ok(self.inner.read().await.reviews.clone())
    }

    async fn list_cart(&self, email: &str) -> StoreResult<Vec<CartItem>> {
        let guard = self.inner.read().await;
        Ok(guard
            .carts
            .iter()
            .filter(|item| item.email == email)
            .cloned()
            .collect())
    }

    async fn insert_cart_item(&self, mut item: CartItem) -> StoreResult<InsertOutcome> {
        let id = new_id();
        item.id = Some(id.clone());
        self.inner.write().await.carts.push(item);
        Ok(InsertOutcome::inserted(id))
    }

    async fn delete_cart_item(&self, id: &str) -> StoreResult<DeleteOutcome> {
        let mut guard = self.inner.write().await;
        Ok(remove_where(&mut guard.carts, |item| {
            item.id.as_deref() == Some(id)
        }))
    }

    async fn delete_cart_items(&self, ids: &[String]) -> StoreResult<DeleteOutcome> {
        let mut guard = self.inner.write().await;
        Ok(remove_where(&mut guard.carts, |item| {
            item.id.as_ref().is_some_and(|id| ids.contains(id))
        }))
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        Ok(self.inner.read().await.users.clone())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let guard = self.inner.read().await;
        Ok(guard.users.iter().find(|user| user.email == email).cloned())
    }

    async fn insert_user(&self, mut user: User) -> StoreResult<InsertOutcome> {
        let mut guard = self.inner.write().await;
        if guard.users.iter().any(|existing| existing.email == user.email) {
            return Err(StoreError::Duplicate(format!("email {}", user.email)));
        }
        let id = new_id();
        user.id = Some(id.clone());
        guard.users.push(user);
        Ok(InsertOutcome::inserted(id))
    }

    async fn set_user_role(&self, id: &str, role: &str) -> StoreResult<UpdateOutcome> {
        let mut guard = self.inner.write().await;
        match guard
            .users
            .iter_mut()
            .find(|user| user.id.as_deref() == Some(id))
        {
            Some(user) => {
                let modified = user.role.as_deref() != Some(role);
                user.role = Some(role.to_string());
                Ok(UpdateOutcome::new(1, modified as u64))
            }
            None => Ok(UpdateOutcome::new(0, 0)),
        }
    }

    async fn delete_user(&self, id: &str) -> StoreResult<DeleteOutcome> {
        let mut guard = self.inner.write().await;
        Ok(remove_where(&mut guard.users, |user| {
            user.id.as_deref() == Some(id)
        }))
    }

    async fn insert_payment(&self, mut payment: PaymentRecord) -> StoreResult<InsertOutcome> {
        let id = new_id();
        payment.id = Some(id.clone());
        self.inner.write().await.payments.push(payment);
        Ok(InsertOutcome::inserted(id))
    }

    async fn find_payment_by_transaction(
        &self,
        transaction_id: &str,
    ) -> StoreResult<Option<PaymentRecord>> {
        let guard = self.inner.read().await;
        Ok(guard
            .payments
            .iter()
            .find(|payment| payment.transaction_id.as_deref() == Some(transaction_id))
            .cloned())
    }

    async fn list_payments(&self, email: &str) -> StoreResult<Vec<PaymentRecord>> {
        let guard = self.inner.read().await;
        Ok(guard
            .payments
            .iter()
            .filter(|payment| payment.email == email)
            .cloned()
            .collect())
    }

    async fn estimated_counts(&self) -> StoreResult<CollectionCounts> {
        let guard = self.inner.read().await;
        Ok(CollectionCounts {
            users: guard.users.len() as u64,
            menu_items: guard.menu.len() as u64,
            payments: guard.payments.len() as u64,
        })
    }

    async fn total_revenue(&self) -> StoreResult<f64> {
        Ok(stats::total_revenue(&self.inner.read().await.payments))
    }

    async fn category_breakdown(&self) -> StoreResult<Vec<CategoryStats>> {
        let guard = self.inner.read().await;
        Ok(stats::breakdown_by_category(&guard.payments, &guard.menu))
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_delete_missing_id_reports_zero() {
        let store = MemoryStore::new();

        assert_eq!(store.delete_cart_item("nope").await.unwrap().deleted_count, 0);
        assert_eq!(store.delete_menu_item("nope").await.unwrap().deleted_count, 0);
        assert_eq!(store.delete_user("nope").await.unwrap().deleted_count, 0);
    }

    #[tokio::test]
    async fn test_cart_listing_filters_by_owner() {
        let store = MemoryStore::new();
        store
            .insert_cart_item(CartItem::new("ana@bistro.io", "m1", 4.0))
            .await
            .unwrap();
        store
            .insert_cart_item(CartItem::new("bob@bistro.io", "m1", 4.0))
            .await
            .unwrap();

        let cart = store.list_cart("ana@bistro.io").await.unwrap();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart[0].email, "ana@bistro.io");
        assert!(store.list_cart("").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_menu_update_counts() {
        let store = MemoryStore::new();
        let id = store
            .insert_menu_item(MenuItem::new("Soup", "soup", 5.0))
            .await
            .unwrap()
            .inserted_id
            .unwrap();

        let update = MenuUpdate {
            name: Some("Tomato Soup".into()),
            ..Default::default()
        };
        let outcome = store.update_menu_item(&id, &update).await.unwrap();
        assert_eq!((outcome.matched_count, outcome.modified_count), (1, 1));

        let outcome = store.update_menu_item("missing", &update).await.unwrap();
        assert_eq!(outcome.matched_count, 0);

        let item = store.get_menu_item(&id).await.unwrap().unwrap();
        assert_eq!(item.name, "Tomato Soup");
    }

    #[tokio::test]
    async fn test_duplicate_user_email_rejected() {
        let store = MemoryStore::new();
        store.insert_user(User::new("ana@bistro.io")).await.unwrap();

        let err = store.insert_user(User::new("ana@bistro.io")).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
    }
}
