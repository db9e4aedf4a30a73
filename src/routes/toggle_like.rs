use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use tracing::warn;

use crate::extractors::auth_extractor::AuthUser;
use crate::utils::app_error::AppError;
use crate::AppState;

const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Toggle the requesting user's like on a post. The unique constraint on
/// (user_id, post_id) is the arbiter under concurrent duplicate requests:
/// the insert either lands the single row or hits the conflict, and the
/// conflicting side deletes it.
pub async fn toggle_like_route(
    State(app_state): State<Arc<AppState>>,
    AuthUser(auth_user): AuthUser,
    Path(post_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let Some(auth_user) = auth_user else {
        warn!("Anonymous user tried to like post {post_id}");
        return Err(AppError::authentication_required());
    };

    let inserted = sqlx::query(
        "INSERT INTO likes (user_id, post_id) VALUES ($1, $2)
         ON CONFLICT (user_id, post_id) DO NOTHING",
    )
    .bind(auth_user.id)
    .bind(post_id)
    .execute(&app_state.pool)
    .await
    .map_err(|e| {
        if let Some(db_error) = e.as_database_error() {
            // A foreign key violation means the post is gone.
            if db_error.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) {
                return AppError::not_found("Post");
            }
        }
        warn!(
            "Error inserting like of user {} on post {post_id}: {e}",
            auth_user.id
        );
        AppError::internal_server_error()
    })?;

    let liked = inserted.rows_affected() == 1;
    if !liked {
        sqlx::query("DELETE FROM likes WHERE user_id = $1 AND post_id = $2")
            .bind(auth_user.id)
            .bind(post_id)
            .execute(&app_state.pool)
            .await
            .map_err(|e| {
                warn!(
                    "Error deleting like of user {} on post {post_id}: {e}",
                    auth_user.id
                );
                AppError::internal_server_error()
            })?;
    }

    let like_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM likes WHERE post_id = $1")
        .bind(post_id)
        .fetch_one(&app_state.pool)
        .await
        .map_err(|e| {
            warn!("Error counting likes of post {post_id}: {e}");
            AppError::internal_server_error()
        })?;

    Ok(Json(json!({
        "liked": liked,
        "like_count": like_count
    })))
}
