//! # MongoDB Store
//!
//! [`Store`] implementation over the official MongoDB driver. Documents are
//! kept untyped (`Collection<Document>`) and converted at the boundary, so
//! client-supplied extra fields survive the round trip. `_id` is an ObjectId
//! in the database and its hex string everywhere else.

use crate::config::MongoConfig;
use async_trait::async_trait;
use bistro_core::{
    CartItem, CategoryStats, CollectionCounts, DeleteOutcome, InsertOutcome, MenuItem,
    MenuUpdate, PaymentRecord, Review, Store, StoreError, StoreResult, UpdateOutcome, User,
};
use futures::TryStreamExt;
use mongodb::{
    bson::{self, doc, oid::ObjectId, Bson, Document},
    error::{ErrorKind, WriteFailure},
    options::IndexOptions,
    results::{DeleteResult, InsertOneResult, UpdateResult},
    Client, Collection, Cursor, Database, IndexModel,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error, info};

// Names used by existing BistroBossDb deployments, spelling included
pub const MENU: &str = "Menu";
pub const REVIEWS: &str = "Reviws";
pub const CARTS: &str = "cartItems";
pub const USERS: &str = "users";
pub const PAYMENTS: &str = "payments";

const DUPLICATE_KEY: i32 = 11000;

/// Shared MongoDB handle. Cloning is cheap; the driver pools connections.
#[derive(Clone)]
pub struct MongoStore {
    client: Client,
    db: Database,
}

impl MongoStore {
    /// Connect, ping and try to create indexes.
    ///
    /// A failed index (e.g. existing duplicate emails) is logged and skipped;
    /// only the connection itself is fatal.
    pub async fn connect(config: &MongoConfig) -> StoreResult<Self> {
        let client = Client::with_uri_str(&config.uri).await.map_err(store_error)?;
        let db = client.database(&config.database);

        db.run_command(doc! { "ping": 1 }).await.map_err(store_error)?;
        info!("Connected to MongoDB database: {}", config.database);

        let store = Self { client, db };
        store.ensure_indexes().await;
        Ok(store)
    }

    /// Create each index independently. Returns how many were created.
    async fn ensure_indexes(&self) -> usize {
        let mut created = 0;
        for (collection, model) in index_models() {
            match self.collection(collection).create_index(model).await {
                Ok(_) => created += 1,
                Err(e) => error!(
                    "Could not create index on {}, continuing without it: {}",
                    collection, e
                ),
            }
        }
        info!("Database indexes ready: {}", created);
        created
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.db.collection(name)
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Close pooled connections. Call once the server has stopped.
    pub async fn shutdown(self) {
        self.client.shutdown().await;
        info!("MongoDB connections closed");
    }

    async fn find_all<T: DeserializeOwned>(&self, name: &str, filter: Document) -> StoreResult<Vec<T>> {
        let cursor = self.collection(name).find(filter).await.map_err(store_error)?;
        collect(cursor).await
    }

    async fn find_first<T: DeserializeOwned>(
        &self,
        name: &str,
        filter: Document,
    ) -> StoreResult<Option<T>> {
        self.collection(name)
            .find_one(filter)
            .await
            .map_err(store_error)?
            .map(decode)
            .transpose()
    }

    async fn insert<T: Serialize>(&self, name: &str, value: &T) -> StoreResult<InsertOutcome> {
        let mut document = encode(value)?;
        document.remove("_id");
        let result = self
            .collection(name)
            .insert_one(document)
            .await
            .map_err(store_error)?;
        Ok(insert_outcome(result))
    }

    async fn delete_by_id(&self, name: &str, id: &str) -> StoreResult<DeleteOutcome> {
        let oid = object_id(id)?;
        let result = self
            .collection(name)
            .delete_one(doc! { "_id": oid })
            .await
            .map_err(store_error)?;
        Ok(delete_outcome(result))
    }
}

#[async_trait]
impl Store for MongoStore {
    async fn list_menu(&self) -> StoreResult<Vec<MenuItem>> {
        self.find_all(MENU, doc! {}).await
    }

    async fn get_menu_item(&self, id: &str) -> StoreResult<Option<MenuItem>> {
        let oid = object_id(id)?;
        self.find_first(MENU, doc! { "_id": oid }).await
    }

    async fn insert_menu_item(&self, item: MenuItem) -> StoreResult<InsertOutcome> {
        self.insert(MENU, &item).await
    }

    async fn update_menu_item(&self, id: &str, update: &MenuUpdate) -> StoreResult<UpdateOutcome> {
        let oid = object_id(id)?;
        let fields = encode(update)?;
        let result = self
            .collection(MENU)
            .update_one(doc! { "_id": oid }, doc! { "$set": fields })
            .await
            .map_err(store_error)?;
        Ok(update_outcome(result))
    }

    async fn delete_menu_item(&self, id: &str) -> StoreResult<DeleteOutcome> {
        self.delete_by_id(MENU, id).await
    }

    async fn list_reviews(&self) -> StoreResult<Vec<Review>> {
        self.find_all(REVIEWS, doc! {}).await
    }

    async fn list_cart(&self, email: &str) -> StoreResult<Vec<CartItem>> {
        self.find_all(CARTS, doc! { "email": email }).await
    }

    async fn insert_cart_item(&self, item: CartItem) -> StoreResult<InsertOutcome> {
        self.insert(CARTS, &item).await
    }

    async fn delete_cart_item(&self, id: &str) -> StoreResult<DeleteOutcome> {
        self.delete_by_id(CARTS, id).await
    }

    async fn delete_cart_items(&self, ids: &[String]) -> StoreResult<DeleteOutcome> {
        // Ids that are not ObjectIds cannot match anything
        let oids: Vec<ObjectId> = ids
            .iter()
            .filter_map(|id| ObjectId::parse_str(id).ok())
            .collect();
        if oids.is_empty() {
            return Ok(DeleteOutcome::new(0));
        }

        let result = self
            .collection(CARTS)
            .delete_many(doc! { "_id": { "$in": oids } })
            .await
            .map_err(store_error)?;
        Ok(delete_outcome(result))
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        self.find_all(USERS, doc! {}).await
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        self.find_first(USERS, doc! { "email": email }).await
    }

    async fn insert_user(&self, user: User) -> StoreResult<InsertOutcome> {
        self.insert(USERS, &user).await
    }

    async fn set_user_role(&self, id: &str, role: &str) -> StoreResult<UpdateOutcome> {
        let oid = object_id(id)?;
        let result = self
            .collection(USERS)
            .update_one(doc! { "_id": oid }, doc! { "$set": { "role": role } })
            .await
            .map_err(store_error)?;
        Ok(update_outcome(result))
    }

    async fn delete_user(&self, id: &str) -> StoreResult<DeleteOutcome> {
        self.delete_by_id(USERS, id).await
    }

    async fn insert_payment(&self, payment: PaymentRecord) -> StoreResult<InsertOutcome> {
        self.insert(PAYMENTS, &payment).await
    }

    async fn find_payment_by_transaction(
        &self,
        transaction_id: &str,
    ) -> StoreResult<Option<PaymentRecord>> {
        self.find_first(PAYMENTS, doc! { "transactionId": transaction_id })
            .await
    }

    async fn list_payments(&self, email: &str) -> StoreResult<Vec<PaymentRecord>> {
        self.find_all(PAYMENTS, doc! { "email": email }).await
    }

    async fn estimated_counts(&self) -> StoreResult<CollectionCounts> {
        let users = self
            .collection(USERS)
            .estimated_document_count()
            .await
            .map_err(store_error)?;
        let menu_items = self
            .collection(MENU)
            .estimated_document_count()
            .await
            .map_err(store_error)?;
        let payments = self
            .collection(PAYMENTS)
            .estimated_document_count()
            .await
            .map_err(store_error)?;

        Ok(CollectionCounts {
            users,
            menu_items,
            payments,
        })
    }

    async fn total_revenue(&self) -> StoreResult<f64> {
        let cursor = self
            .collection(PAYMENTS)
            .aggregate(revenue_pipeline())
            .await
            .map_err(store_error)?;
        let rows: Vec<Document> = cursor.try_collect().await.map_err(store_error)?;

        Ok(rows
            .first()
            .map(|row| number(row, "totalRevenue"))
            .unwrap_or(0.0))
    }

    async fn category_breakdown(&self) -> StoreResult<Vec<CategoryStats>> {
        let cursor = self
            .collection(PAYMENTS)
            .aggregate(category_pipeline())
            .await
            .map_err(store_error)?;
        let rows: Vec<Document> = cursor.try_collect().await.map_err(store_error)?;
        debug!("Category breakdown returned {} rows", rows.len());

        Ok(rows.iter().map(category_row).collect())
    }

    async fn ping(&self) -> StoreResult<()> {
        self.db
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(store_error)?;
        Ok(())
    }
}

fn unique() -> IndexOptions {
    IndexOptions::builder().unique(true).build()
}

fn index_models() -> Vec<(&'static str, IndexModel)> {
    vec![
        // One account per email
        (
            USERS,
            IndexModel::builder()
                .keys(doc! { "email": 1 })
                .options(unique())
                .build(),
        ),
        // Cart listing by owner
        (CARTS, IndexModel::builder().keys(doc! { "email": 1 }).build()),
        // Payment history by payer
        (PAYMENTS, IndexModel::builder().keys(doc! { "email": 1 }).build()),
        // Replay detection; records without a transaction id are not indexed
        (
            PAYMENTS,
            IndexModel::builder()
                .keys(doc! { "transactionId": 1 })
                .options(IndexOptions::builder().unique(true).sparse(true).build())
                .build(),
        ),
    ]
}

// =============================================================================
// Aggregation Pipelines
// =============================================================================

fn revenue_pipeline() -> Vec<Document> {
    vec![doc! {
        "$group": { "_id": Bson::Null, "totalRevenue": { "$sum": "$price" } }
    }]
}

/// Unwind each payment's menu item ids, join them to the menu (ids are stored
/// as hex strings, menu `_id`s are ObjectIds), then group by category.
fn category_pipeline() -> Vec<Document> {
    vec![
        doc! { "$unwind": "$menuItemIds" },
        doc! {
            "$lookup": {
                "from": MENU,
                "let": { "itemId": "$menuItemIds" },
                "pipeline": [
                    { "$match": { "$expr": { "$eq": [
                        "$_id",
                        { "$convert": {
                            "input": "$$itemId",
                            "to": "objectId",
                            "onError": Bson::Null,
                            "onNull": Bson::Null
                        } }
                    ] } } }
                ],
                "as": "menuItems"
            }
        },
        doc! { "$unwind": "$menuItems" },
        doc! {
            "$group": {
                "_id": "$menuItems.category",
                "quantity": { "$sum": 1 },
                "revenue": { "$sum": "$menuItems.price" }
            }
        },
        doc! {
            "$project": {
                "_id": 0,
                "category": "$_id",
                "quantity": "$quantity",
                "revenue": "$revenue"
            }
        },
        doc! { "$sort": { "category": 1 } },
    ]
}

// =============================================================================
// Conversions
// =============================================================================

fn store_error(err: mongodb::error::Error) -> StoreError {
    if is_duplicate_key(&err) {
        StoreError::Duplicate(err.to_string())
    } else {
        StoreError::Backend(err.to_string())
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write)) if write.code == DUPLICATE_KEY
    )
}

fn object_id(id: &str) -> StoreResult<ObjectId> {
    ObjectId::parse_str(id).map_err(|_| StoreError::InvalidId(id.to_string()))
}

fn encode<T: Serialize>(value: &T) -> StoreResult<Document> {
    bson::to_document(value).map_err(|e| StoreError::Serialization(e.to_string()))
}

/// Replace an ObjectId `_id` with its hex string, then deserialize
fn decode<T: DeserializeOwned>(mut document: Document) -> StoreResult<T> {
    if let Ok(oid) = document.get_object_id("_id") {
        document.insert("_id", oid.to_hex());
    }
    bson::from_document(document).map_err(|e| StoreError::Serialization(e.to_string()))
}

async fn collect<T: DeserializeOwned>(cursor: Cursor<Document>) -> StoreResult<Vec<T>> {
    let documents: Vec<Document> = cursor.try_collect().await.map_err(store_error)?;
    documents.into_iter().map(decode).collect()
}

fn id_string(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn insert_outcome(result: InsertOneResult) -> InsertOutcome {
    InsertOutcome::inserted(id_string(&result.inserted_id))
}

fn update_outcome(result: UpdateResult) -> UpdateOutcome {
    UpdateOutcome {
        acknowledged: true,
        matched_count: result.matched_count,
        modified_count: result.modified_count,
        upserted_id: result.upserted_id.as_ref().map(id_string),
    }
}

fn delete_outcome(result: DeleteResult) -> DeleteOutcome {
    DeleteOutcome::new(result.deleted_count)
}

/// Numeric field as f64; `$sum` yields int or double depending on inputs
fn number(document: &Document, key: &str) -> f64 {
    match document.get(key) {
        Some(Bson::Double(v)) => *v,
        Some(Bson::Int32(v)) => *v as f64,
        Some(Bson::Int64(v)) => *v as f64,
        _ => 0.0,
    }
}

fn category_row(row: &Document) -> CategoryStats {
    CategoryStats {
        category: row.get_str("category").unwrap_or_default().to_string(),
        quantity: number(row, "quantity") as u64,
        revenue: number(row, "revenue"),
    }
}
