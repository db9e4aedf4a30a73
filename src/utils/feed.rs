use serde::Deserialize;
use sqlx::PgPool;
use tracing::warn;

use crate::structs::pagination::page_with_more;
use crate::structs::post::{FeedPostRow, PublicPost};
use crate::utils::app_error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedFilter {
    Latest,
    Trending,
    Following,
    ForYou,
}

impl Default for FeedFilter {
    fn default() -> Self {
        Self::Latest
    }
}

/// Post page SELECT shared by every filter. `$1` is the requesting user
/// (NULL when anonymous); the aggregates are subselects so the whole page
/// is one query.
const FEED_SELECT: &str = "
SELECT p.id, p.content, p.image_url, p.created_at, p.updated_at,
       u.id AS author_id,
       u.telegram_id AS author_telegram_id,
       u.username AS author_username,
       u.first_name AS author_first_name,
       u.last_name AS author_last_name,
       u.photo_url AS author_photo_url,
       (SELECT COUNT(*) FROM likes l WHERE l.post_id = p.id) AS like_count,
       (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comment_count,
       EXISTS(SELECT 1 FROM likes l WHERE l.post_id = p.id AND l.user_id = $1) AS is_liked
FROM posts p
JOIN users u ON u.id = p.user_id
";

/// Likes decayed by age, the usual gravity ranking: a like on a fresh post
/// outweighs one on an old post, and a post with no likes scores zero.
const TRENDING_SCORE: &str = "((SELECT COUNT(*) FROM likes l WHERE l.post_id = p.id)::float8
 / power(EXTRACT(EPOCH FROM (now() - p.created_at))::float8 / 3600.0 + 2.0, 1.5))";

const FOLLOWED_BY_VIEWER: &str =
    "EXISTS(SELECT 1 FROM follows f WHERE f.follower_id = $1 AND f.following_id = p.user_id)";

/// Fetch one feed page plus a `has_more` flag. An offset past the end of
/// the table yields an empty page, never an error.
pub async fn fetch_feed_page(
    pool: &PgPool,
    viewer: Option<i64>,
    filter: FeedFilter,
    offset: i64,
    limit: i64,
) -> Result<(Vec<PublicPost>, bool), AppError> {
    // The following feed of an anonymous requester is empty by definition.
    if filter == FeedFilter::Following && viewer.is_none() {
        return Ok((Vec::new(), false));
    }

    let query = match filter {
        FeedFilter::Latest => format!("{FEED_SELECT} ORDER BY p.created_at DESC LIMIT $2 OFFSET $3"),
        FeedFilter::Trending => format!(
            "{FEED_SELECT} ORDER BY {TRENDING_SCORE} DESC, p.created_at DESC LIMIT $2 OFFSET $3"
        ),
        FeedFilter::Following => format!(
            "{FEED_SELECT} WHERE {FOLLOWED_BY_VIEWER}
             ORDER BY p.created_at DESC LIMIT $2 OFFSET $3"
        ),
        FeedFilter::ForYou => format!(
            "{FEED_SELECT}
             ORDER BY ({TRENDING_SCORE} + CASE WHEN {FOLLOWED_BY_VIEWER} THEN 2.0 ELSE 0.0 END) DESC,
                      p.created_at DESC
             LIMIT $2 OFFSET $3"
        ),
    };

    let rows = sqlx::query_as::<_, FeedPostRow>(&query)
        .bind(viewer)
        .bind(limit + 1)
        .bind(offset)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            warn!("Error fetching {filter:?} feed page: {e}");
            AppError::internal_server_error()
        })?;

    let (rows, has_more) = page_with_more(rows, limit);
    Ok((rows.into_iter().map(PublicPost::from).collect(), has_more))
}

/// Fetch a single post with its aggregates, as seen by `viewer`.
pub async fn fetch_post(
    pool: &PgPool,
    post_id: i64,
    viewer: Option<i64>,
) -> Result<Option<PublicPost>, AppError> {
    let query = format!("{FEED_SELECT} WHERE p.id = $2");

    let row = sqlx::query_as::<_, FeedPostRow>(&query)
        .bind(viewer)
        .bind(post_id)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            warn!("Error fetching post {post_id}: {e}");
            AppError::internal_server_error()
        })?;

    Ok(row.map(PublicPost::from))
}

/// All posts written by one user, newest first, for the profile page.
pub async fn fetch_user_posts(
    pool: &PgPool,
    user_id: i64,
    viewer: Option<i64>,
) -> Result<Vec<PublicPost>, AppError> {
    let query = format!("{FEED_SELECT} WHERE p.user_id = $2 ORDER BY p.created_at DESC");

    let rows = sqlx::query_as::<_, FeedPostRow>(&query)
        .bind(viewer)
        .bind(user_id)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            warn!("Error fetching posts of user {user_id}: {e}");
            AppError::internal_server_error()
        })?;

    Ok(rows.into_iter().map(PublicPost::from).collect())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn filter_names_parse() {
        assert_eq!(
            serde_json::from_str::<FeedFilter>("\"latest\"").unwrap(),
            FeedFilter::Latest
        );
        assert_eq!(
            serde_json::from_str::<FeedFilter>("\"trending\"").unwrap(),
            FeedFilter::Trending
        );
        assert_eq!(
            serde_json::from_str::<FeedFilter>("\"following\"").unwrap(),
            FeedFilter::Following
        );
        assert_eq!(
            serde_json::from_str::<FeedFilter>("\"for_you\"").unwrap(),
            FeedFilter::ForYou
        );
    }

    #[test]
    fn unknown_filter_name_is_rejected() {
        assert!(serde_json::from_str::<FeedFilter>("\"hottest\"").is_err());
    }

    #[test]
    fn default_filter_is_latest() {
        assert_eq!(FeedFilter::default(), FeedFilter::Latest);
    }
}
