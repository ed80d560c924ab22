use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiPath};
use crate::state::AppState;
use axum::{
    extract::State,
    Json,
};
use bistro_core::{
    user, AdminStatus, DeleteOutcome, UpdateOutcome, User, UserCreation, ADMIN_ROLE,
};
use tracing::{info, instrument};

pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<User>>> {
    Ok(Json(state.store.list_users().await?))
}

/// Idempotent by email
#[instrument(skip(state, new_user), fields(email = %new_user.email))]
pub async fn create(
    State(state): State<AppState>,
    ApiJson(new_user): ApiJson<User>,
) -> ApiResult<Json<UserCreation>> {
    let creation = user::register(state.store.as_ref(), new_user).await?;
    if let UserCreation::Created(outcome) = &creation {
        info!("User registered: {:?}", outcome.inserted_id);
    }
    Ok(Json(creation))
}

#[instrument(skip(state))]
pub async fn promote(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> ApiResult<Json<UpdateOutcome>> {
    let outcome = state.store.set_user_role(&id, ADMIN_ROLE).await?;
    info!("User {} promoted: matched={}", id, outcome.matched_count);
    Ok(Json(outcome))
}

#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> ApiResult<Json<DeleteOutcome>> {
    let outcome = state.store.delete_user(&id).await?;
    info!("User {} deleted: {}", id, outcome.deleted_count);
    Ok(Json(outcome))
}

pub async fn admin_status(
    State(state): State<AppState>,
    ApiPath(email): ApiPath<String>,
) -> ApiResult<Json<AdminStatus>> {
    Ok(Json(user::admin_status(state.store.as_ref(), &email).await?))
}
