pub mod app_error;
pub mod feed;
pub mod post;
pub mod telegram_auth;
pub mod users;
