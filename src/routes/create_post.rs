use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use hyper::StatusCode;
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use crate::extractors::auth_extractor::AuthUser;
use crate::utils::app_error::AppError;
use crate::utils::feed::fetch_post;
use crate::utils::post::check_post_content;
use crate::AppState;

#[derive(Deserialize)]
pub struct NewPost {
    pub content: String,
    pub image_url: Option<String>,
}

pub async fn create_post_route(
    State(app_state): State<Arc<AppState>>,
    AuthUser(auth_user): AuthUser,
    Json(body): Json<NewPost>,
) -> Result<impl IntoResponse, AppError> {
    let Some(auth_user) = auth_user else {
        warn!("Anonymous user tried to create a post");
        return Err(AppError::authentication_required());
    };

    let content = body.content.trim();
    check_post_content(content)?;

    let post_id: i64 = sqlx::query_scalar(
        "INSERT INTO posts (user_id, content, image_url) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind(auth_user.id)
    .bind(content)
    .bind(&body.image_url)
    .fetch_one(&app_state.pool)
    .await
    .map_err(|e| {
        warn!("Error inserting post by user {}: {e}", auth_user.id);
        AppError::internal_server_error()
    })?;

    let post = fetch_post(&app_state.pool, post_id, Some(auth_user.id))
        .await?
        .ok_or_else(AppError::internal_server_error)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "post": post,
            "message": "Post created successfully"
        })),
    ))
}
