use axum::extract::{Extension, Path, Query, State};
use axum::{Json, Router, routing::get, routing::patch, routing::post};
use serde::Deserialize;
use tubegraph_domain::playlists::{Playlist, PlaylistCreate, PlaylistDetail, PlaylistUpdate};
use tubegraph_domain::views::Page;
use validator::Validate;

use super::{PageParams, actor_identity};
use crate::error::ApiError;
use crate::middleware::AuthContext;
use crate::response::ApiResponse;
use crate::{state::AppState, validation};

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/playlists", post(create_playlist))
        .route("/api/v1/playlists/user/:user_id", get(user_playlists))
        .route(
            "/api/v1/playlists/:playlist_id",
            get(get_playlist)
                .patch(update_playlist)
                .delete(delete_playlist),
        )
        .route(
            "/api/v1/playlists/add/:video_id/:playlist_id",
            patch(add_video),
        )
        .route(
            "/api/v1/playlists/remove/:video_id/:playlist_id",
            patch(remove_video),
        )
}

#[derive(Debug, Deserialize, Validate)]
struct CreatePlaylistRequest {
    #[validate(length(min = 1, max = 100))]
    name: String,
    #[serde(default)]
    #[validate(length(max = 1000))]
    description: String,
    is_public: Option<bool>,
}

async fn create_playlist(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<CreatePlaylistRequest>,
) -> Result<ApiResponse<Playlist>, ApiError> {
    validation::validate(&payload)?;
    let actor = actor_identity(&auth)?;
    let playlist = state
        .playlists
        .create(
            &actor,
            PlaylistCreate {
                name: payload.name,
                description: payload.description,
                is_public: payload.is_public,
            },
        )
        .await?;
    Ok(ApiResponse::created(playlist, "playlist created successfully"))
}

async fn user_playlists(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(user_id): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<ApiResponse<Page<Playlist>>, ApiError> {
    let actor = actor_identity(&auth)?;
    let page = state
        .playlists
        .list_for_user(&actor, &user_id, params.into())
        .await?;
    Ok(ApiResponse::ok(page, "playlists fetched successfully"))
}

async fn get_playlist(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(playlist_id): Path<String>,
) -> Result<ApiResponse<PlaylistDetail>, ApiError> {
    let actor = actor_identity(&auth)?;
    let detail = state.playlists.get(&actor, &playlist_id).await?;
    Ok(ApiResponse::ok(detail, "playlist fetched successfully"))
}

#[derive(Debug, Deserialize, Validate)]
struct UpdatePlaylistRequest {
    #[validate(length(min = 1, max = 100))]
    name: Option<String>,
    #[validate(length(max = 1000))]
    description: Option<String>,
    is_public: Option<bool>,
}

async fn update_playlist(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(playlist_id): Path<String>,
    Json(payload): Json<UpdatePlaylistRequest>,
) -> Result<ApiResponse<Playlist>, ApiError> {
    validation::validate(&payload)?;
    let actor = actor_identity(&auth)?;
    let playlist = state
        .playlists
        .update(
            &actor,
            &playlist_id,
            PlaylistUpdate {
                name: payload.name,
                description: payload.description,
                is_public: payload.is_public,
            },
        )
        .await?;
    Ok(ApiResponse::ok(playlist, "playlist updated successfully"))
}

async fn delete_playlist(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(playlist_id): Path<String>,
) -> Result<ApiResponse<()>, ApiError> {
    let actor = actor_identity(&auth)?;
    state.playlists.delete(&actor, &playlist_id).await?;
    Ok(ApiResponse::ok((), "playlist deleted successfully"))
}

async fn add_video(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((video_id, playlist_id)): Path<(String, String)>,
) -> Result<ApiResponse<Playlist>, ApiError> {
    let actor = actor_identity(&auth)?;
    let playlist = state
        .playlists
        .add_video(&actor, &playlist_id, &video_id)
        .await?;
    Ok(ApiResponse::ok(playlist, "video added to playlist"))
}

async fn remove_video(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path((video_id, playlist_id)): Path<(String, String)>,
) -> Result<ApiResponse<Playlist>, ApiError> {
    let actor = actor_identity(&auth)?;
    let playlist = state
        .playlists
        .remove_video(&actor, &playlist_id, &video_id)
        .await?;
    Ok(ApiResponse::ok(playlist, "video removed from playlist"))
}
