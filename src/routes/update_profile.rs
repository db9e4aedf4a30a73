use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use crate::extractors::auth_extractor::AuthUser;
use crate::utils::app_error::AppError;
use crate::utils::users::fetch_public_user;
use crate::AppState;

const MAX_BIO_CHARS: usize = 160;

#[derive(Deserialize)]
pub struct ProfileUpdate {
    pub bio: Option<String>,
}

pub async fn update_profile_route(
    State(app_state): State<Arc<AppState>>,
    AuthUser(auth_user): AuthUser,
    Json(body): Json<ProfileUpdate>,
) -> Result<impl IntoResponse, AppError> {
    let Some(auth_user) = auth_user else {
        warn!("Anonymous user tried to update a profile");
        return Err(AppError::authentication_required());
    };

    let bio = body
        .bio
        .map(|bio| bio.chars().take(MAX_BIO_CHARS).collect::<String>());

    sqlx::query("UPDATE users SET bio = COALESCE($2, bio), updated_at = now() WHERE id = $1")
        .bind(auth_user.id)
        .bind(&bio)
        .execute(&app_state.pool)
        .await
        .map_err(|e| {
            warn!("Error updating profile of user {}: {e}", auth_user.id);
            AppError::internal_server_error()
        })?;

    let user = fetch_public_user(&app_state.pool, auth_user.id, Some(auth_user.id))
        .await?
        .ok_or_else(AppError::internal_server_error)?;

    Ok(Json(json!({
        "user": user,
        "message": "Profile updated successfully"
    })))
}
