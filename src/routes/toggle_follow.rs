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

/// Toggle the requesting user's follow edge towards another user, with the
/// same convergence discipline as the like toggle.
pub async fn toggle_follow_route(
    State(app_state): State<Arc<AppState>>,
    AuthUser(auth_user): AuthUser,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let Some(auth_user) = auth_user else {
        warn!("Anonymous user tried to follow user {user_id}");
        return Err(AppError::authentication_required());
    };

    if auth_user.id == user_id {
        warn!("User {} tried to follow themself", auth_user.id);
        return Err(AppError::invalid_operation("You cannot follow yourself."));
    }

    let inserted = sqlx::query(
        "INSERT INTO follows (follower_id, following_id) VALUES ($1, $2)
         ON CONFLICT (follower_id, following_id) DO NOTHING",
    )
    .bind(auth_user.id)
    .bind(user_id)
    .execute(&app_state.pool)
    .await
    .map_err(|e| {
        if let Some(db_error) = e.as_database_error() {
            if db_error.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) {
                return AppError::not_found("User");
            }
        }
        warn!(
            "Error inserting follow of user {} towards user {user_id}: {e}",
            auth_user.id
        );
        AppError::internal_server_error()
    })?;

    let following = inserted.rows_affected() == 1;
    if !following {
        sqlx::query("DELETE FROM follows WHERE follower_id = $1 AND following_id = $2")
            .bind(auth_user.id)
            .bind(user_id)
            .execute(&app_state.pool)
            .await
            .map_err(|e| {
                warn!(
                    "Error deleting follow of user {} towards user {user_id}: {e}",
                    auth_user.id
                );
                AppError::internal_server_error()
            })?;
    }

    Ok(Json(json!({ "following": following })))
}
