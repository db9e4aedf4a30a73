use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::utils::app_error::AppError;
use crate::utils::telegram_auth::validate_init_data;
use crate::utils::users::fetch_public_user;
use crate::AppState;

#[derive(Deserialize)]
pub struct AuthRequest {
    #[serde(rename = "initData")]
    pub init_data: String,
}

/// Validate the signed init data and upsert the user it identifies,
/// refreshing the profile fields Telegram sent along.
pub async fn auth_route(
    State(app_state): State<Arc<AppState>>,
    Json(body): Json<AuthRequest>,
) -> Result<impl IntoResponse, AppError> {
    let telegram_user = validate_init_data(
        &body.init_data,
        &app_state.config.bot_token,
        app_state.config.auth_max_age,
    )?;

    let user_id: i64 = sqlx::query_scalar(
        "INSERT INTO users (telegram_id, username, first_name, last_name, language_code, photo_url)
         VALUES ($1, $2, $3, $4, $5, $6)
         ON CONFLICT (telegram_id) DO UPDATE
         SET username = EXCLUDED.username,
             first_name = EXCLUDED.first_name,
             last_name = EXCLUDED.last_name,
             language_code = EXCLUDED.language_code,
             photo_url = EXCLUDED.photo_url,
             updated_at = now()
         RETURNING id",
    )
    .bind(telegram_user.id)
    .bind(&telegram_user.username)
    .bind(&telegram_user.first_name)
    .bind(&telegram_user.last_name)
    .bind(&telegram_user.language_code)
    .bind(&telegram_user.photo_url)
    .fetch_one(&app_state.pool)
    .await
    .map_err(|e| {
        warn!(
            "Error upserting user for telegram id {}: {e}",
            telegram_user.id
        );
        AppError::internal_server_error()
    })?;

    let user = fetch_public_user(&app_state.pool, user_id, Some(user_id))
        .await?
        .ok_or_else(AppError::internal_server_error)?;

    info!("Authenticated user {user_id} (telegram id {})", telegram_user.id);

    Ok(Json(json!({
        "user": user,
        "message": "Authentication successful"
    })))
}
