use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use serde_json::json;

use crate::extractors::auth_extractor::AuthUser;
use crate::utils::app_error::AppError;
use crate::utils::users::fetch_discovery_users;
use crate::AppState;

const DISCOVERY_LIMIT: i64 = 20;

pub async fn get_users_route(
    State(app_state): State<Arc<AppState>>,
    AuthUser(auth_user): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let viewer = auth_user.as_ref().map(|user| user.id);

    let users = fetch_discovery_users(&app_state.pool, viewer, DISCOVERY_LIMIT).await?;

    Ok(Json(json!({ "users": users })))
}
