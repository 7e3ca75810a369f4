use axum::extract::{Extension, Path, State};
use axum::{Json, Router, routing::get, routing::patch, routing::post};
use serde::Deserialize;
use tubegraph_domain::tweets::Tweet;
use validator::Validate;

use super::actor_identity;
use crate::error::ApiError;
use crate::middleware::AuthContext;
use crate::response::ApiResponse;
use crate::{state::AppState, validation};

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/tweets", post(create_tweet))
        .route("/api/v1/tweets/user/:user_id", get(user_tweets))
        .route(
            "/api/v1/tweets/:tweet_id",
            patch(update_tweet).delete(delete_tweet),
        )
}

#[derive(Debug, Deserialize, Validate)]
struct TweetRequest {
    #[validate(length(min = 1, max = 2000))]
    content: String,
}

async fn create_tweet(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<TweetRequest>,
) -> Result<ApiResponse<Tweet>, ApiError> {
    validation::validate(&payload)?;
    let actor = actor_identity(&auth)?;
    let tweet = state.tweets.create(&actor, &payload.content).await?;
    Ok(ApiResponse::created(tweet, "tweet created successfully"))
}

async fn user_tweets(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<ApiResponse<Vec<Tweet>>, ApiError> {
    let tweets = state.tweets.list_by_user(&user_id).await?;
    Ok(ApiResponse::ok(tweets, "tweets fetched successfully"))
}

async fn update_tweet(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(tweet_id): Path<String>,
    Json(payload): Json<TweetRequest>,
) -> Result<ApiResponse<Tweet>, ApiError> {
    validation::validate(&payload)?;
    let actor = actor_identity(&auth)?;
    let tweet = state
        .tweets
        .update(&actor, &tweet_id, &payload.content)
        .await?;
    Ok(ApiResponse::ok(tweet, "tweet updated successfully"))
}

async fn delete_tweet(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Path(tweet_id): Path<String>,
) -> Result<ApiResponse<()>, ApiError> {
    let actor = actor_identity(&auth)?;
    state.tweets.delete(&actor, &tweet_id).await?;
    Ok(ApiResponse::ok((), "tweet deleted successfully"))
}
