use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::extractors::auth_extractor::AuthUser;
use crate::structs::pagination::{clamp_limit, clamp_offset};
use crate::utils::app_error::AppError;
use crate::utils::feed::{fetch_feed_page, FeedFilter};
use crate::AppState;

#[derive(Deserialize)]
pub struct FeedParams {
    pub filter: Option<FeedFilter>,
    pub offset: Option<i64>,
    pub limit: Option<i64>,
}

pub async fn get_posts_route(
    State(app_state): State<Arc<AppState>>,
    AuthUser(auth_user): AuthUser,
    Query(params): Query<FeedParams>,
) -> Result<impl IntoResponse, AppError> {
    let viewer = auth_user.as_ref().map(|user| user.id);
    let filter = params.filter.unwrap_or_default();
    let offset = clamp_offset(params.offset);
    let limit = clamp_limit(params.limit);

    let (posts, has_more) = fetch_feed_page(&app_state.pool, viewer, filter, offset, limit).await?;

    Ok(Json(json!({
        "posts": posts,
        "has_more": has_more
    })))
}
