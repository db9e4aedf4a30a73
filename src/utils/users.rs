use sqlx::PgPool;
use tracing::warn;

use crate::structs::user::{PublicUser, PublicUserRow};
use crate::utils::app_error::AppError;

/// User SELECT with aggregate counts and the viewer's follow edge, `$1`
/// being the requesting user (NULL when anonymous).
const USER_SELECT: &str = "
SELECT u.id, u.telegram_id, u.username, u.first_name, u.last_name, u.photo_url, u.bio,
       u.created_at,
       (SELECT COUNT(*) FROM follows f WHERE f.follower_id = u.id) AS following_count,
       (SELECT COUNT(*) FROM follows f WHERE f.following_id = u.id) AS followers_count,
       (SELECT COUNT(*) FROM posts p WHERE p.user_id = u.id) AS posts_count,
       EXISTS(SELECT 1 FROM follows f WHERE f.follower_id = $1 AND f.following_id = u.id) AS is_following
FROM users u
";

pub async fn fetch_public_user(
    pool: &PgPool,
    user_id: i64,
    viewer: Option<i64>,
) -> Result<Option<PublicUser>, AppError> {
    let query = format!("{USER_SELECT} WHERE u.id = $2");

    let row = sqlx::query_as::<_, PublicUserRow>(&query)
        .bind(viewer)
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            warn!("Error fetching user {user_id}: {e}");
            AppError::internal_server_error()
        })?;

    Ok(row.map(PublicUser::from))
}

/// Users the viewer does not follow yet (self excluded), for the discovery
/// list. Anonymous requesters simply get the newest users.
pub async fn fetch_discovery_users(
    pool: &PgPool,
    viewer: Option<i64>,
    limit: i64,
) -> Result<Vec<PublicUser>, AppError> {
    let query = format!(
        "{USER_SELECT}
         WHERE ($1 IS NULL OR u.id <> $1)
           AND NOT EXISTS(SELECT 1 FROM follows f WHERE f.follower_id = $1 AND f.following_id = u.id)
         ORDER BY u.created_at DESC
         LIMIT $2"
    );

    let rows = sqlx::query_as::<_, PublicUserRow>(&query)
        .bind(viewer)
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            warn!("Error fetching discovery users: {e}");
            AppError::internal_server_error()
        })?;

    Ok(rows.into_iter().map(PublicUser::from).collect())
}
