use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

use crate::structs::user::handle;

/// Post row joined with its author and aggregates, one row per feed entry.
/// The aggregates ride along in the same query so a page never costs a
/// round trip per post.
#[derive(FromRow)]
pub struct FeedPostRow {
    pub id: i64,
    pub content: String,
    pub image_url: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub author_id: i64,
    pub author_telegram_id: i64,
    pub author_username: Option<String>,
    pub author_first_name: String,
    pub author_last_name: Option<String>,
    pub author_photo_url: Option<String>,
    pub like_count: i64,
    pub comment_count: i64,
    pub is_liked: bool,
}

#[derive(Serialize)]
pub struct PostAuthor {
    pub id: i64,
    pub telegram_id: i64,
    pub username: Option<String>,
    pub first_name: String,
    pub last_name: Option<String>,
    pub photo_url: Option<String>,
    pub handle: String,
}

#[derive(Serialize)]
pub struct PublicPost {
    pub id: i64,
    pub content: String,
    pub image_url: Option<String>,
    pub author: PostAuthor,
    pub like_count: i64,
    pub comment_count: i64,
    pub is_liked: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<FeedPostRow> for PublicPost {
    fn from(row: FeedPostRow) -> Self {
        Self {
            id: row.id,
            content: row.content,
            image_url: row.image_url,
            author: PostAuthor {
                handle: handle(row.author_username.as_deref(), row.author_telegram_id),
                id: row.author_id,
                telegram_id: row.author_telegram_id,
                username: row.author_username,
                first_name: row.author_first_name,
                last_name: row.author_last_name,
                photo_url: row.author_photo_url,
            },
            like_count: row.like_count,
            comment_count: row.comment_count,
            is_liked: row.is_liked,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
