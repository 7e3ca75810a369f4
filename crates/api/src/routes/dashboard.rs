use axum::extract::{Extension, Query, State};
use axum::{Router, routing::get};
use serde::Deserialize;
use tubegraph_domain::views::{
    ChannelAnalytics, ChannelVideo, DashboardStats, Page, PageRequest, PublishState,
};

use super::actor_identity;
use crate::error::ApiError;
use crate::middleware::AuthContext;
use crate::response::ApiResponse;
use crate::state::AppState;

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/dashboard/stats", get(stats))
        .route("/api/v1/dashboard/videos", get(videos))
        .route("/api/v1/dashboard/analytics", get(analytics))
}

async fn stats(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<ApiResponse<DashboardStats>, ApiError> {
    let actor = actor_identity(&auth)?;
    let stats = state.views.dashboard_stats(&actor).await?;
    Ok(ApiResponse::ok(stats, "channel stats fetched successfully"))
}

#[derive(Debug, Default, Deserialize)]
struct ChannelVideosParams {
    status: Option<PublishState>,
    page: Option<usize>,
    limit: Option<usize>,
}

async fn videos(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(params): Query<ChannelVideosParams>,
) -> Result<ApiResponse<Page<ChannelVideo>>, ApiError> {
    let actor = actor_identity(&auth)?;
    let page = state
        .views
        .channel_videos(
            &actor,
            params.status,
            PageRequest {
                page: params.page,
                limit: params.limit,
            },
        )
        .await?;
    Ok(ApiResponse::ok(page, "channel videos fetched successfully"))
}

#[derive(Debug, Default, Deserialize)]
struct AnalyticsParams {
    period: Option<u32>,
}

async fn analytics(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(params): Query<AnalyticsParams>,
) -> Result<ApiResponse<ChannelAnalytics>, ApiError> {
    let actor = actor_identity(&auth)?;
    let analytics = state.views.channel_analytics(&actor, params.period).await?;
    Ok(ApiResponse::ok(analytics, "channel analytics fetched successfully"))
}
