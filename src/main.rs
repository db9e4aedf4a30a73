mod config;
mod extractors;
mod middleware;
mod routes;
mod structs;
mod utils;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::HeaderName;
use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use hyper::header::CONTENT_TYPE;
use hyper::http::Method;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;
use middleware::logger::logger;
use routes::add_comment::add_comment_route;
use routes::auth_route::auth_route;
use routes::create_post::create_post_route;
use routes::get_comments::get_comments_route;
use routes::get_posts::get_posts_route;
use routes::get_user_profile::get_user_profile_route;
use routes::get_users::get_users_route;
use routes::toggle_follow::toggle_follow_route;
use routes::toggle_like::toggle_like_route;
use routes::update_profile::update_profile_route;

#[derive(Clone)]
pub struct AppState {
    pool: PgPool,
    config: Config,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("telx=info")),
        )
        .init();

    let config = Config::load();

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await
        .expect("Failed to connect to the database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    let port = config.port;
    let app_state = Arc::new(AppState { pool, config });

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([
            CONTENT_TYPE,
            HeaderName::from_static("x-telegram-init-data"),
        ])
        .allow_origin(Any);

    let router = Router::new()
        .route("/api/auth", post(auth_route))
        .route("/api/posts", get(get_posts_route).post(create_post_route))
        .route("/api/posts/:post_id/like", post(toggle_like_route))
        .route(
            "/api/posts/:post_id/comments",
            get(get_comments_route).post(add_comment_route),
        )
        .route("/api/users", get(get_users_route))
        .route("/api/users/:user_id", get(get_user_profile_route))
        .route("/api/users/:user_id/follow", post(toggle_follow_route))
        .route("/api/user/profile", put(update_profile_route))
        .layer(cors)
        .layer(axum_middleware::from_fn(logger))
        .with_state(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Listening on {addr}");

    axum::Server::bind(&addr)
        .serve(router.into_make_service())
        .await
        .expect("Server error");
}
