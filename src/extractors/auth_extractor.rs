use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use sqlx::{FromRow, PgPool};
use tracing::warn;

use crate::structs::telegram::TelegramUser;
use crate::utils::app_error::AppError;
use crate::utils::telegram_auth::validate_init_data;
use crate::AppState;

pub const INIT_DATA_HEADER: &str = "x-telegram-init-data";

#[derive(FromRow)]
pub struct InnerAuthUser {
    pub id: i64,
    pub telegram_id: i64,
    pub username: Option<String>,
    pub first_name: String,
    pub last_name: Option<String>,
    pub photo_url: Option<String>,
}

/// Requesting user, resolved from the signed init data header. `None` when
/// the header is absent; routes that need a user map it to a 401.
pub struct AuthUser(pub Option<Arc<InnerAuthUser>>);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    Arc<AppState>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = Arc::<AppState>::from_ref(state);

        let Some(init_data) = parts.headers.get(INIT_DATA_HEADER) else {
            return Ok(AuthUser(None));
        };
        let init_data = init_data.to_str().map_err(|e| {
            warn!("Init data header is not valid ASCII: {e}");
            AppError::auth_malformed()
        })?;

        let telegram_user = validate_init_data(
            init_data,
            &app_state.config.bot_token,
            app_state.config.auth_max_age,
        )?;
        let user = resolve_user(&app_state.pool, &telegram_user).await?;

        Ok(AuthUser(Some(Arc::new(user))))
    }
}

const AUTH_USER_SELECT: &str =
    "SELECT id, telegram_id, username, first_name, last_name, photo_url
     FROM users WHERE telegram_id = $1";

/// Look the user up by Telegram id, creating the row on first contact. The
/// unique constraint on telegram_id arbitrates concurrent first requests,
/// so two of them never create two rows.
pub async fn resolve_user(pool: &PgPool, telegram_user: &TelegramUser) -> Result<InnerAuthUser, AppError> {
    let existing = sqlx::query_as::<_, InnerAuthUser>(AUTH_USER_SELECT)
        .bind(telegram_user.id)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            warn!("Error getting auth user from database: {e}");
            AppError::internal_server_error()
        })?;
    if let Some(user) = existing {
        return Ok(user);
    }

    sqlx::query(
        "INSERT INTO users (telegram_id, username, first_name, last_name, language_code, photo_url)
         VALUES ($1, $2, $3, $4, $5, $6)
         ON CONFLICT (telegram_id) DO NOTHING",
    )
    .bind(telegram_user.id)
    .bind(&telegram_user.username)
    .bind(&telegram_user.first_name)
    .bind(&telegram_user.last_name)
    .bind(&telegram_user.language_code)
    .bind(&telegram_user.photo_url)
    .execute(pool)
    .await
    .map_err(|e| {
        warn!("Error creating user for telegram id {}: {e}", telegram_user.id);
        AppError::internal_server_error()
    })?;

    sqlx::query_as::<_, InnerAuthUser>(AUTH_USER_SELECT)
        .bind(telegram_user.id)
        .fetch_one(pool)
        .await
        .map_err(|e| {
            warn!("Error getting freshly created auth user: {e}");
            AppError::internal_server_error()
        })
}
