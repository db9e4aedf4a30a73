use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

/// User row joined with its aggregate counts, as selected by
/// `utils::users`.
#[derive(FromRow)]
pub struct PublicUserRow {
    pub id: i64,
    pub telegram_id: i64,
    pub username: Option<String>,
    pub first_name: String,
    pub last_name: Option<String>,
    pub photo_url: Option<String>,
    pub bio: String,
    pub following_count: i64,
    pub followers_count: i64,
    pub posts_count: i64,
    pub is_following: bool,
    pub created_at: OffsetDateTime,
}

#[derive(Serialize)]
pub struct PublicUser {
    pub id: i64,
    pub telegram_id: i64,
    pub username: Option<String>,
    pub first_name: String,
    pub last_name: Option<String>,
    pub full_name: String,
    pub photo_url: Option<String>,
    pub bio: String,
    pub following_count: i64,
    pub followers_count: i64,
    pub posts_count: i64,
    pub is_following: bool,
    pub handle: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<PublicUserRow> for PublicUser {
    fn from(row: PublicUserRow) -> Self {
        Self {
            handle: handle(row.username.as_deref(), row.telegram_id),
            full_name: full_name(&row.first_name, row.last_name.as_deref()),
            id: row.id,
            telegram_id: row.telegram_id,
            username: row.username,
            first_name: row.first_name,
            last_name: row.last_name,
            photo_url: row.photo_url,
            bio: row.bio,
            following_count: row.following_count,
            followers_count: row.followers_count,
            posts_count: row.posts_count,
            is_following: row.is_following,
            created_at: row.created_at,
        }
    }
}

pub fn handle(username: Option<&str>, telegram_id: i64) -> String {
    match username {
        Some(username) => format!("@{username}"),
        None => format!("@user{telegram_id}"),
    }
}

pub fn full_name(first_name: &str, last_name: Option<&str>) -> String {
    match last_name {
        Some(last_name) => format!("{first_name} {last_name}"),
        None => first_name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn handle_prefers_the_username() {
        assert_eq!(handle(Some("alice"), 99), "@alice");
        assert_eq!(handle(None, 99), "@user99");
    }

    #[test]
    fn full_name_skips_missing_last_name() {
        assert_eq!(full_name("Alice", Some("Smith")), "Alice Smith");
        assert_eq!(full_name("Alice", None), "Alice");
    }
}
