use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use tracing::warn;

use crate::extractors::auth_extractor::AuthUser;
use crate::structs::comment::{CommentRow, PublicComment};
use crate::utils::app_error::AppError;
use crate::utils::feed::fetch_post;
use crate::AppState;

pub async fn get_comments_route(
    State(app_state): State<Arc<AppState>>,
    AuthUser(auth_user): AuthUser,
    Path(post_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let viewer = auth_user.as_ref().map(|user| user.id);

    let post = fetch_post(&app_state.pool, post_id, viewer)
        .await?
        .ok_or_else(|| AppError::not_found("Post"))?;

    let comments = sqlx::query_as::<_, CommentRow>(
        "SELECT c.id, c.content, c.created_at, c.updated_at,
                u.id AS author_id,
                u.telegram_id AS author_telegram_id,
                u.username AS author_username,
                u.first_name AS author_first_name,
                u.last_name AS author_last_name,
                u.photo_url AS author_photo_url
         FROM comments c
         JOIN users u ON u.id = c.user_id
         WHERE c.post_id = $1
         ORDER BY c.created_at DESC",
    )
    .bind(post_id)
    .fetch_all(&app_state.pool)
    .await
    .map_err(|e| {
        warn!("Error fetching comments of post {post_id}: {e}");
        AppError::internal_server_error()
    })?;

    let comments: Vec<PublicComment> = comments.into_iter().map(PublicComment::from).collect();

    Ok(Json(json!({
        "post": post,
        "comments": comments
    })))
}
