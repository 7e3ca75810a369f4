use axum::extract::{Extension, Path, State};
use axum::{
    Json, Router,
    http::{HeaderMap, header},
    response::{AppendHeaders, IntoResponse, Response},
    routing::{get, patch, post},
};
use serde::Deserialize;
use tubegraph_domain::sessions::{LoginInput, TokenPair};
use tubegraph_domain::users::{AccountUpdate, RegisterInput, UserProfile};
use tubegraph_domain::views::{ChannelProfile, VideoCard};
use validator::Validate;

use super::actor_identity;
use crate::error::ApiError;
use crate::middleware::{
    ACCESS_TOKEN_COOKIE, AuthContext, REFRESH_TOKEN_COOKIE, cookie_value, session_cookie,
};
use crate::response::ApiResponse;
use crate::{state::AppState, validation};

pub(super) fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/users/register", post(register))
        .route("/api/v1/users/login", post(login))
        .route("/api/v1/users/refresh-token", post(refresh_token))
}

pub(super) fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/users/logout", post(logout))
        .route("/api/v1/users/current-user", get(current_user))
        .route("/api/v1/users/change-password", post(change_password))
        .route("/api/v1/users/update-account", patch(update_account))
        .route("/api/v1/users/avatar", patch(update_avatar))
        .route("/api/v1/users/cover-image", patch(update_cover_image))
        .route("/api/v1/users/c/:username", get(channel_profile))
        .route("/api/v1/users/history", get(watch_history))
}

#[derive(Debug, Deserialize, Validate)]
struct RegisterRequest {
    #[validate(length(min = 1, max = 120))]
    full_name: String,
    #[validate(email)]
    email: String,
    #[validate(length(min = 1, max = 64))]
    username: String,
    #[validate(length(min = 8, max = 128))]
    password: String,
    #[validate(url)]
    avatar_url: String,
    #[validate(url)]
    cover_image_url: Option<String>,
}

async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<ApiResponse<UserProfile>, ApiError> {
    validation::validate(&payload)?;
    let profile = state
        .users
        .register(RegisterInput {
            full_name: payload.full_name,
            email: payload.email,
            username: payload.username,
            password: payload.password,
            avatar_url: payload.avatar_url,
            cover_image_url: payload.cover_image_url,
        })
        .await?;
    Ok(ApiResponse::created(profile, "user registered successfully"))
}

#[derive(Debug, Deserialize, Validate)]
struct LoginRequest {
    username: Option<String>,
    email: Option<String>,
    #[validate(length(min = 1, max = 128))]
    password: String,
}

fn session_cookies(
    state: &AppState,
    tokens: &TokenPair,
) -> AppendHeaders<[(header::HeaderName, String); 2]> {
    AppendHeaders([
        (
            header::SET_COOKIE,
            session_cookie(
                ACCESS_TOKEN_COOKIE,
                &tokens.access_token,
                state.config.access_token_ttl_secs,
            ),
        ),
        (
            header::SET_COOKIE,
            session_cookie(
                REFRESH_TOKEN_COOKIE,
                &tokens.refresh_token,
                state.config.refresh_token_ttl_secs,
            ),
        ),
    ])
}

async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    validation::validate(&payload)?;
    let outcome = state
        .sessions
        .login(LoginInput {
            username: payload.username,
            email: payload.email,
            password: payload.password,
        })
        .await?;
    let cookies = session_cookies(&state, &outcome.tokens);
    Ok((cookies, ApiResponse::ok(outcome, "user logged in successfully")).into_response())
}

#[derive(Debug, Default, Deserialize)]
struct RefreshRequest {
    refresh_token: Option<String>,
}

async fn refresh_token(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Option<Json<RefreshRequest>>,
) -> Result<Response, ApiError> {
    let presented = body
        .and_then(|Json(request)| request.refresh_token)
        .filter(|token| !token.trim().is_empty())
        .or_else(|| cookie_value(&headers, REFRESH_TOKEN_COOKIE).map(str::to_string))
        .ok_or(ApiError::Unauthorized)?;

    let tokens = state.sessions.rotate(presented.trim()).await?;
    let cookies = session_cookies(&state, &tokens);
    Ok((cookies, ApiResponse::ok(tokens, "access token refreshed")).into_response())
}

async fn logout(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Response, ApiError> {
    let actor = actor_identity(&auth)?;
    state.sessions.revoke(&actor.user_id).await?;
    let cleared = AppendHeaders([
        (header::SET_COOKIE, session_cookie(ACCESS_TOKEN_COOKIE, "", 0)),
        (header::SET_COOKIE, session_cookie(REFRESH_TOKEN_COOKIE, "", 0)),
    ]);
    Ok((cleared, ApiResponse::ok((), "user logged out")).into_response())
}

async fn current_user(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<ApiResponse<UserProfile>, ApiError> {
    let actor = actor_identity(&auth)?;
    let profile = state.users.current(&actor).await?;
    Ok(ApiResponse::ok(profile, "current user fetched successfully"))
}

#[derive(Debug, Deserialize, Validate)]
struct ChangePasswordRequest {
    #[validate(length(min = 1, max = 128))]
    old_password: String,
    #[validate(length(min = 8, max = 128))]
    new_password: String,
}

async fn change_password(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<ApiResponse<()>, ApiError> {
    validation::validate(&payload)?;
    let actor = actor_identity(&auth)?;
    state
        .users
        .change_password(&actor, &payload.old_password, &payload.new_password)
        .await?;
    Ok(ApiResponse::ok((), "password changed successfully"))
}

#[derive(Debug, Deserialize, Validate)]
struct UpdateAccountRequest {
    #[validate(length(min = 1, max = 120))]
    full_name: String,
    #[validate(email)]
    email: String,
}

async fn update_account(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<UpdateAccountRequest>,
) -> Result<ApiResponse<UserProfile>, ApiError> {
    validation::validate(&payload)?;
    let actor = actor_identity(&auth)?;
    let profile = state
        .users
        .update_account(
            &actor,
            AccountUpdate {
                full_name: payload.full_name,
                email: payload.email,
            },
        )
        .await?;
    Ok(ApiResponse::ok(profile, "account details updated successfully"))
}

#[derive(Debug, Deserialize, Validate)]
struct AvatarRequest {
    #[validate(url)]
    avatar_url: String,
}

async fn update_avatar(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<AvatarRequest>,
) -> Result<ApiResponse<UserProfile>, ApiError> {
    validation::validate(&payload)?;
    let actor = actor_identity(&auth)?;
    let profile = state.users.update_avatar(&actor, &payload.avatar_url).await?;
    Ok(ApiResponse::ok(profile, "avatar updated successfully"))
}

#[derive(Debug, Deserialize, Validate)]
struct CoverImageRequest {
    #[validate(url)]
    cover_image_url: String,
}

async fn update_cover_image(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<CoverImageRequest>,
) -> Result<ApiResponse<UserProfile>, ApiError> {
    validation::validate(&payload)?;
    let actor = actor_identity(&auth)?;
    let profile = state
        .users
        .update_cover_image(&actor, &payload.cover_image_url)
        .await?;
    Ok(ApiResponse::ok(profile, "cover image updated successfully"))
}

async fn channel_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(username): Path<String>,
) -> Result<ApiResponse<ChannelProfile>, ApiError> {
    let actor = actor_identity(&auth)?;
    let profile = state.views.channel_profile(&actor, &username).await?;
    Ok(ApiResponse::ok(profile, "channel fetched successfully"))
}

async fn watch_history(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> Result<ApiResponse<Vec<VideoCard>>, ApiError> {
    let actor = actor_identity(&auth)?;
    let history = state.views.watch_history(&actor).await?;
    Ok(ApiResponse::ok(history, "watch history fetched successfully"))
}
