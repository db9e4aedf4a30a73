pub mod add_comment;
pub mod auth_route;
pub mod create_post;
pub mod get_comments;
pub mod get_posts;
pub mod get_user_profile;
pub mod get_users;
pub mod toggle_follow;
pub mod toggle_like;
pub mod update_profile;
