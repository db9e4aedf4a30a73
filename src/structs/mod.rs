pub mod comment;
pub mod pagination;
pub mod post;
pub mod telegram;
pub mod user;
