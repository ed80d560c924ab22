use crate::error::ApiResult;
use crate::state::AppState;
use axum::{extract::State, Json};
use bistro_core::Review;

pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Review>>> {
    Ok(Json(state.store.list_reviews().await?))
}
