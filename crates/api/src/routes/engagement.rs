use axum::extract::{Extension, Path, Query, State};
use axum::{Router, routing::get, routing::post};
use tubegraph_domain::likes::TargetKind;
use tubegraph_domain::toggle::ToggleOutcome;
use tubegraph_domain::views::{ChannelSubscriber, LikedVideo, Page, SubscribedChannel};

use super::{PageParams, actor_identity};
use crate::error::ApiError;
use crate::middleware::AuthContext;
use crate::observability;
use crate::response::ApiResponse;
use crate::state::AppState;

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/likes/videos", get(liked_videos))
        .route("/api/v1/likes/:target_kind/:target_id", post(toggle_like))
        .route(
            "/api/v1/subscriptions/toggle/:channel_id",
            post(toggle_subscription),
        )
        .route(
            "/api/v1/subscriptions/subscribers/:channel_id",
            get(channel_subscribers),
        )
        .route("/api/v1/subscriptions/subscribed", get(subscribed_channels))
}

async fn toggle_like(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((target_kind, target_id)): Path<(String, String)>,
) -> Result<ApiResponse<ToggleOutcome>, ApiError> {
    let actor = actor_identity(&auth)?;
    let kind = TargetKind::parse(&target_kind)?;
    let outcome = state.toggles.toggle_like(&actor, kind, &target_id).await?;
    observability::register_toggle("like", outcome.active);
    let message = if outcome.active { "liked" } else { "unliked" };
    Ok(ApiResponse::ok(outcome, message))
}

async fn liked_videos(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(params): Query<PageParams>,
) -> Result<ApiResponse<Page<LikedVideo>>, ApiError> {
    let actor = actor_identity(&auth)?;
    let page = state.views.liked_videos(&actor, params.into()).await?;
    Ok(ApiResponse::ok(page, "liked videos fetched successfully"))
}

async fn toggle_subscription(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(channel_id): Path<String>,
) -> Result<ApiResponse<ToggleOutcome>, ApiError> {
    let actor = actor_identity(&auth)?;
    let outcome = state.toggles.toggle_subscription(&actor, &channel_id).await?;
    observability::register_toggle("subscription", outcome.active);
    let message = if outcome.active {
        "subscribed"
    } else {
        "unsubscribed"
    };
    Ok(ApiResponse::ok(outcome, message))
}

async fn channel_subscribers(
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
) -> Result<ApiResponse<Vec<ChannelSubscriber>>, ApiError> {
    let subscribers = state.views.channel_subscribers(&channel_id).await?;
    Ok(ApiResponse::ok(subscribers, "subscribers fetched successfully"))
}

async fn subscribed_channels(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<ApiResponse<Vec<SubscribedChannel>>, ApiError> {
    let actor = actor_identity(&auth)?;
    let channels = state.views.subscribed_channels(&actor).await?;
    Ok(ApiResponse::ok(channels, "subscribed channels fetched successfully"))
}
