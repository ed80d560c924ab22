//! Cart lines are scoped by the `email` they carry; none of these routes
//! require a token.

use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::state::AppState;
use axum::{
    extract::State,
    Json,
};
use bistro_core::{CartItem, CartQuery, DeleteOutcome, InsertOutcome};
use tracing::{info, instrument};

/// Without an `email` query nothing matches
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CartQuery>,
) -> ApiResult<Json<Vec<CartItem>>> {
    let Some(email) = query.email else {
        return Ok(Json(Vec::new()));
    };
    Ok(Json(state.store.list_cart(&email).await?))
}

#[instrument(skip(state, item), fields(email = %item.email))]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(mut item): ApiJson<CartItem>,
) -> ApiResult<Json<InsertOutcome>> {
    item.id = None;
    let outcome = state.store.insert_cart_item(item).await?;
    info!("Cart line added: {:?}", outcome.inserted_id);
    Ok(Json(outcome))
}

#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> ApiResult<Json<DeleteOutcome>> {
    Ok(Json(state.store.delete_cart_item(&id).await?))
}
