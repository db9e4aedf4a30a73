use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;

use crate::extractors::auth_extractor::AuthUser;
use crate::utils::app_error::AppError;
use crate::utils::feed::fetch_user_posts;
use crate::utils::users::fetch_public_user;
use crate::AppState;

pub async fn get_user_profile_route(
    State(app_state): State<Arc<AppState>>,
    AuthUser(auth_user): AuthUser,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let viewer = auth_user.as_ref().map(|user| user.id);

    let user = fetch_public_user(&app_state.pool, user_id, viewer)
        .await?
        .ok_or_else(|| AppError::not_found("User"))?;

    let posts = fetch_user_posts(&app_state.pool, user_id, viewer).await?;

    Ok(Json(json!({
        "user": user,
        "posts": posts
    })))
}
