use crate::auth::{TokenRequest, TokenResponse};
use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::state::AppState;
use axum::{extract::State, Json};
use tracing::{info, instrument};

/// Sign the posted payload
#[instrument(skip(state, request), fields(email = %request.email))]
pub async fn issue(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<TokenRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let token = state.tokens.issue(request)?;
    info!("Issued token valid for {}s", state.tokens.ttl_seconds());
    Ok(Json(TokenResponse { token }))
}
