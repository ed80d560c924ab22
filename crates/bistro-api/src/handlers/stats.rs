use crate::error::ApiResult;
use crate::state::AppState;
use axum::{extract::State, Json};
use bistro_core::{stats, AdminStats, CategoryStats};
use tracing::instrument;

/// Estimated collection counts plus total revenue
#[instrument(skip(state))]
pub async fn admin_stats(State(state): State<AppState>) -> ApiResult<Json<AdminStats>> {
    Ok(Json(stats::admin_summary(state.store.as_ref()).await?))
}

/// Items sold and revenue per menu category
#[instrument(skip(state))]
pub async fn order_stats(State(state): State<AppState>) -> ApiResult<Json<Vec<CategoryStats>>> {
    Ok(Json(state.store.category_breakdown().await?))
}
