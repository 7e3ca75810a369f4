use axum::extract::{Extension, Path, Query, State};
use axum::{Json, Router, routing::get, routing::patch};
use serde::Deserialize;
use tubegraph_domain::comments::{Comment, CommentView};
use tubegraph_domain::views::Page;
use validator::Validate;

use super::{PageParams, actor_identity};
use crate::error::ApiError;
use crate::middleware::AuthContext;
use crate::response::ApiResponse;
use crate::{state::AppState, validation};

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/comments/:video_id", get(list_comments).post(add_comment))
        .route(
            "/api/v1/comments/c/:comment_id",
            patch(update_comment).delete(delete_comment),
        )
}

#[derive(Debug, Deserialize, Validate)]
struct CommentRequest {
    #[validate(length(min = 1, max = 2000))]
    content: String,
}

async fn list_comments(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<ApiResponse<Page<CommentView>>, ApiError> {
    let page = state
        .comments
        .list_for_video(&video_id, params.into())
        .await?;
    Ok(ApiResponse::ok(page, "comments fetched successfully"))
}

async fn add_comment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(video_id): Path<String>,
    Json(payload): Json<CommentRequest>,
) -> Result<ApiResponse<Comment>, ApiError> {
    validation::validate(&payload)?;
    let actor = actor_identity(&auth)?;
    let comment = state
        .comments
        .add(&actor, &video_id, &payload.content)
        .await?;
    Ok(ApiResponse::created(comment, "comment added successfully"))
}

async fn update_comment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(comment_id): Path<String>,
    Json(payload): Json<CommentRequest>,
) -> Result<ApiResponse<Comment>, ApiError> {
    validation::validate(&payload)?;
    let actor = actor_identity(&auth)?;
    let comment = state
        .comments
        .update(&actor, &comment_id, &payload.content)
        .await?;
    Ok(ApiResponse::ok(comment, "comment updated successfully"))
}

async fn delete_comment(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(comment_id): Path<String>,
) -> Result<ApiResponse<()>, ApiError> {
    let actor = actor_identity(&auth)?;
    state.comments.delete(&actor, &comment_id).await?;
    Ok(ApiResponse::ok((), "comment deleted successfully"))
}
