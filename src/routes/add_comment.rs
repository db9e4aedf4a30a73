use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use hyper::StatusCode;
use serde::Deserialize;
use serde_json::json;
use sqlx::FromRow;
use time::OffsetDateTime;
use tracing::warn;

use crate::extractors::auth_extractor::AuthUser;
use crate::structs::comment::PublicComment;
use crate::structs::post::PostAuthor;
use crate::structs::user::handle;
use crate::utils::app_error::AppError;
use crate::utils::post::check_comment_content;
use crate::AppState;

const FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Deserialize)]
pub struct NewComment {
    pub content: String,
}

#[derive(FromRow)]
struct InsertedComment {
    id: i64,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
}

pub async fn add_comment_route(
    State(app_state): State<Arc<AppState>>,
    AuthUser(auth_user): AuthUser,
    Path(post_id): Path<i64>,
    Json(body): Json<NewComment>,
) -> Result<impl IntoResponse, AppError> {
    let Some(auth_user) = auth_user else {
        warn!("Anonymous user tried to comment on post {post_id}");
        return Err(AppError::authentication_required());
    };

    let content = body.content.trim();
    check_comment_content(content)?;

    let inserted = sqlx::query_as::<_, InsertedComment>(
        "INSERT INTO comments (user_id, post_id, content) VALUES ($1, $2, $3)
         RETURNING id, created_at, updated_at",
    )
    .bind(auth_user.id)
    .bind(post_id)
    .bind(content)
    .fetch_one(&app_state.pool)
    .await
    .map_err(|e| {
        if let Some(db_error) = e.as_database_error() {
            if db_error.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) {
                return AppError::not_found("Post");
            }
        }
        warn!(
            "Error inserting comment by user {} on post {post_id}: {e}",
            auth_user.id
        );
        AppError::internal_server_error()
    })?;

    let comment = PublicComment {
        id: inserted.id,
        content: content.to_string(),
        author: PostAuthor {
            handle: handle(auth_user.username.as_deref(), auth_user.telegram_id),
            id: auth_user.id,
            telegram_id: auth_user.telegram_id,
            username: auth_user.username.clone(),
            first_name: auth_user.first_name.clone(),
            last_name: auth_user.last_name.clone(),
            photo_url: auth_user.photo_url.clone(),
        },
        created_at: inserted.created_at,
        updated_at: inserted.updated_at,
    };

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "comment": comment,
            "message": "Comment created successfully"
        })),
    ))
}
