//! # Payments
//!
//! Payment records and the record-then-cleanup flow.
//!
//! Recording a payment is two writes: insert the record, then delete the
//! cart lines it paid for. They are not atomic. A record is written at least
//! once; the cleanup is a delete by id set, so running it again is harmless.
//! When the client sends a `transactionId` it is used as an idempotency key
//! and a replay reuses the stored record instead of inserting a second one.

use crate::error::{StoreError, StoreResult};
use crate::outcome::{DeleteOutcome, InsertOutcome};
use crate::store::Store;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, warn};

/// Charge currency. The storefront only sells in US dollars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    USD,
}

impl Currency {
    /// Returns the ISO 4217 currency code
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::USD => "usd",
        }
    }

    /// Convert a dollar amount to cents, rounded to the nearest cent
    pub fn to_smallest_unit(&self, amount: f64) -> i64 {
        match self {
            Currency::USD => (amount * 100.0).round() as i64,
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

/// A completed payment, stored in the `payments` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Payer
    pub email: String,

    /// Total charged, in dollars
    pub price: f64,

    /// Gateway transaction id; doubles as idempotency key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Cart lines settled by this payment
    #[serde(default)]
    pub cart_ids: Vec<String>,

    /// Menu items bought, one entry per unit
    #[serde(default)]
    pub menu_item_ids: Vec<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PaymentRecord {
    pub fn new(email: impl Into<String>, price: f64) -> Self {
        Self {
            id: None,
            email: email.into(),
            price,
            transaction_id: None,
            date: None,
            status: None,
            cart_ids: Vec::new(),
            menu_item_ids: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Builder: set transaction id
    pub fn with_transaction(mut self, transaction_id: impl Into<String>) -> Self {
        self.transaction_id = Some(transaction_id.into());
        self
    }

    /// Builder: add a paid cart line and the menu item it referenced
    pub fn with_line(mut self, cart_id: impl Into<String>, menu_item_id: impl Into<String>) -> Self {
        self.cart_ids.push(cart_id.into());
        self.menu_item_ids.push(menu_item_id.into());
        self
    }
}

/// Response for `POST /payments`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentReceipt {
    pub payment_result: InsertOutcome,
    pub delete_result: DeleteOutcome,
}

/// Body of `POST /create-payment-intent`
#[derive(Debug, Clone, Deserialize)]
pub struct IntentPrice {
    pub price: f64,
}

/// Request sent to a payment gateway
#[derive(Debug, Clone, PartialEq)]
pub struct IntentRequest {
    /// Amount in the currency's smallest unit
    pub amount: i64,
    pub currency: Currency,
    pub payment_method_types: Vec<String>,
}

impl IntentRequest {
    /// Card-only intent in USD for a dollar price
    pub fn card_usd(price: f64) -> Self {
        let currency = Currency::USD;
        Self {
            amount: currency.to_smallest_unit(price),
            currency,
            payment_method_types: vec!["card".to_string()],
        }
    }
}

/// Payment intent created by a gateway
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    /// Secret handed to the browser to confirm the payment
    pub client_secret: String,
    pub amount: i64,
    pub currency: Currency,
    #[serde(default)]
    pub status: String,
}

/// Response for `POST /create-payment-intent`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSecret {
    pub client_secret: String,
}

/// Persist a payment and remove the cart lines it settled.
pub async fn record(store: &dyn Store, mut payment: PaymentRecord) -> StoreResult<PaymentReceipt> {
    payment.id = None;

    let existing = match payment.transaction_id.as_deref() {
        Some(tx) => store.find_payment_by_transaction(tx).await?,
        None => None,
    };

    let payment_result = match existing {
        Some(previous) => {
            warn!(
                "Payment {:?} already recorded, skipping insert",
                payment.transaction_id
            );
            InsertOutcome {
                acknowledged: true,
                inserted_id: previous.id,
            }
        }
        None => match store.insert_payment(payment.clone()).await {
            Ok(outcome) => outcome,
            // A concurrent replay won the unique transaction index
            Err(StoreError::Duplicate(_)) => {
                let tx = payment.transaction_id.as_deref().unwrap_or_default();
                let previous = store.find_payment_by_transaction(tx).await?;
                InsertOutcome {
                    acknowledged: true,
                    inserted_id: previous.and_then(|p| p.id),
                }
            }
            Err(err) => return Err(err),
        },
    };

    let delete_result = store.delete_cart_items(&payment.cart_ids).await?;

    info!(
        "Recorded payment for {}: {} cart lines removed",
        payment.email, delete_result.deleted_count
    );

    Ok(PaymentReceipt {
        payment_result,
        delete_result,
    })
}
