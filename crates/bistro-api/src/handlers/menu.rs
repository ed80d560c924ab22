use crate::error::{ApiError, ApiResult};
use crate::extract::{ApiJson, ApiPath};
use crate::state::AppState;
use axum::{
    extract::State,
    Json,
};
use bistro_core::{DeleteOutcome, InsertOutcome, MenuItem, MenuUpdate, UpdateOutcome};
use tracing::{info, instrument};

pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<MenuItem>>> {
    Ok(Json(state.store.list_menu().await?))
}

#[instrument(skip(state))]
pub async fn get_one(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> ApiResult<Json<MenuItem>> {
    state
        .store
        .get_menu_item(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("menu item not found: {}", id)))
}

#[instrument(skip(state, item), fields(name = %item.name, category = %item.category))]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(mut item): ApiJson<MenuItem>,
) -> ApiResult<Json<InsertOutcome>> {
    item.id = None;
    let outcome = state.store.insert_menu_item(item).await?;
    info!("Menu item created: {:?}", outcome.inserted_id);
    Ok(Json(outcome))
}

#[instrument(skip(state, update))]
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    ApiJson(update): ApiJson<MenuUpdate>,
) -> ApiResult<Json<UpdateOutcome>> {
    if update.is_empty() {
        return Err(ApiError::BadRequest(
            "update needs at least one of name, category, price, recipe, image".to_string(),
        ));
    }

    let outcome = state.store.update_menu_item(&id, &update).await?;
    info!(
        "Menu item {} updated: matched={}, modified={}",
        id, outcome.matched_count, outcome.modified_count
    );
    Ok(Json(outcome))
}

#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> ApiResult<Json<DeleteOutcome>> {
    let outcome = state.store.delete_menu_item(&id).await?;
    info!("Menu item {} deleted: {}", id, outcome.deleted_count);
    Ok(Json(outcome))
}
