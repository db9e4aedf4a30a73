use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

use crate::structs::post::PostAuthor;
use crate::structs::user::handle;

#[derive(FromRow)]
pub struct CommentRow {
    pub id: i64,
    pub content: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub author_id: i64,
    pub author_telegram_id: i64,
    pub author_username: Option<String>,
    pub author_first_name: String,
    pub author_last_name: Option<String>,
    pub author_photo_url: Option<String>,
}

#[derive(Serialize)]
pub struct PublicComment {
    pub id: i64,
    pub content: String,
    pub author: PostAuthor,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<CommentRow> for PublicComment {
    fn from(row: CommentRow) -> Self {
        Self {
            id: row.id,
            content: row.content,
            author: PostAuthor {
                handle: handle(row.author_username.as_deref(), row.author_telegram_id),
                id: row.author_id,
                telegram_id: row.author_telegram_id,
                username: row.author_username,
                first_name: row.author_first_name,
                last_name: row.author_last_name,
                photo_url: row.author_photo_url,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
