//! # Payment Handlers
//!
//! The browser confirms the card payment itself; the server only creates the
//! intent and afterwards records what was paid for.

use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiPath};
use crate::state::AppState;
use axum::{
    extract::State,
    Json,
};
use bistro_core::{
    payment, validate_price, ClientSecret, IntentPrice, IntentRequest, PaymentReceipt,
    PaymentRecord,
};
use tracing::{error, info, instrument};

/// `{ price }` in dollars to a card-only USD intent
#[instrument(skip(state, body), fields(price = body.price))]
pub async fn create_intent(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<IntentPrice>,
) -> ApiResult<Json<ClientSecret>> {
    validate_price(body.price)?;

    let request = IntentRequest::card_usd(body.price);
    let intent = state.gateway.create_intent(&request).await.map_err(|e| {
        error!("Failed to create payment intent: {}", e);
        e
    })?;

    info!(
        "Created {} intent {} for {} {}",
        state.gateway.provider_name(),
        intent.id,
        intent.amount,
        intent.currency
    );
    Ok(Json(ClientSecret {
        client_secret: intent.client_secret,
    }))
}

/// Persist the payment, then remove the cart lines it covered
#[instrument(skip(state, record), fields(email = %record.email, lines = record.cart_ids.len()))]
pub async fn record(
    State(state): State<AppState>,
    ApiJson(record): ApiJson<PaymentRecord>,
) -> ApiResult<Json<PaymentReceipt>> {
    Ok(Json(payment::record(state.store.as_ref(), record).await?))
}

#[instrument(skip(state))]
pub async fn history(
    State(state): State<AppState>,
    ApiPath(email): ApiPath<String>,
) -> ApiResult<Json<Vec<PaymentRecord>>> {
    Ok(Json(state.store.list_payments(&email).await?))
}
