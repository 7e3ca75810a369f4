use axum::extract::{Extension, Path, Query, State};
use axum::{
    Json, Router,
    routing::{get, patch, post},
};
use serde::Deserialize;
use tubegraph_domain::videos::{SortDirection, Video, VideoDetail, VideoPublish, VideoSortField, VideoUpdate};
use tubegraph_domain::views::{FeedQuery, Page, PageRequest, VideoCard};
use validator::Validate;

use super::actor_identity;
use crate::error::ApiError;
use crate::middleware::AuthContext;
use crate::response::ApiResponse;
use crate::{state::AppState, validation};

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/videos", get(feed).post(publish))
        .route(
            "/api/v1/videos/:video_id",
            get(get_video).patch(update_video).delete(delete_video),
        )
        .route("/api/v1/videos/toggle/publish/:video_id", patch(toggle_publish))
        .route("/api/v1/videos/:video_id/views", post(record_view))
}

#[derive(Debug, Default, Deserialize)]
struct FeedParams {
    page: Option<usize>,
    limit: Option<usize>,
    query: Option<String>,
    sort_by: Option<String>,
    sort_type: Option<String>,
    user_id: Option<String>,
}

async fn feed(
    State(state): State<AppState>,
    Query(params): Query<FeedParams>,
) -> Result<ApiResponse<Page<VideoCard>>, ApiError> {
    let sort_by = params
        .sort_by
        .as_deref()
        .map(VideoSortField::parse)
        .transpose()?;
    let direction = params
        .sort_type
        .as_deref()
        .map(SortDirection::parse)
        .transpose()?;
    let page = state
        .views
        .feed(FeedQuery {
            page: PageRequest {
                page: params.page,
                limit: params.limit,
            },
            text: params.query,
            owner_id: params.user_id,
            sort_by,
            direction,
        })
        .await?;
    Ok(ApiResponse::ok(page, "videos fetched successfully"))
}

#[derive(Debug, Deserialize, Validate)]
struct PublishVideoRequest {
    #[validate(length(min = 1, max = 200))]
    title: String,
    #[validate(length(min = 1, max = 5000))]
    description: String,
    #[validate(url)]
    media_url: String,
    #[validate(url)]
    thumbnail_url: String,
    #[validate(range(min = 0.0))]
    duration_secs: f64,
}

async fn publish(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<PublishVideoRequest>,
) -> Result<ApiResponse<Video>, ApiError> {
    validation::validate(&payload)?;
    let actor = actor_identity(&auth)?;
    let video = state
        .videos
        .publish(
            &actor,
            VideoPublish {
                title: payload.title,
                description: payload.description,
                media_url: payload.media_url,
                thumbnail_url: payload.thumbnail_url,
                duration_secs: payload.duration_secs,
            },
        )
        .await?;
    Ok(ApiResponse::created(video, "video published successfully"))
}

async fn get_video(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(video_id): Path<String>,
) -> Result<ApiResponse<VideoDetail>, ApiError> {
    let actor = actor_identity(&auth)?;
    let detail = state.videos.get_for_viewer(&actor, &video_id).await?;
    Ok(ApiResponse::ok(detail, "video fetched successfully"))
}

#[derive(Debug, Deserialize, Validate)]
struct UpdateVideoRequest {
    #[validate(length(min = 1, max = 200))]
    title: Option<String>,
    #[validate(length(min = 1, max = 5000))]
    description: Option<String>,
    #[validate(url)]
    thumbnail_url: Option<String>,
}

async fn update_video(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(video_id): Path<String>,
    Json(payload): Json<UpdateVideoRequest>,
) -> Result<ApiResponse<Video>, ApiError> {
    validation::validate(&payload)?;
    let actor = actor_identity(&auth)?;
    let video = state
        .videos
        .update(
            &actor,
            &video_id,
            VideoUpdate {
                title: payload.title,
                description: payload.description,
                thumbnail_url: payload.thumbnail_url,
            },
        )
        .await?;
    Ok(ApiResponse::ok(video, "video updated successfully"))
}

async fn delete_video(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(video_id): Path<String>,
) -> Result<ApiResponse<()>, ApiError> {
    let actor = actor_identity(&auth)?;
    state.videos.delete(&actor, &video_id).await?;
    Ok(ApiResponse::ok((), "video deleted successfully"))
}

async fn toggle_publish(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(video_id): Path<String>,
) -> Result<ApiResponse<Video>, ApiError> {
    let actor = actor_identity(&auth)?;
    let video = state.videos.toggle_publish(&actor, &video_id).await?;
    Ok(ApiResponse::ok(video, "publish status toggled"))
}

async fn record_view(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> Result<ApiResponse<Video>, ApiError> {
    let video = state.videos.increment_views(&video_id).await?;
    Ok(ApiResponse::ok(video, "view recorded"))
}
