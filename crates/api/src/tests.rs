use std::sync::Arc;

use axum::body::{Body, to_bytes};
use axum::http::header::{CONTENT_TYPE, SET_COOKIE};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use serde_json::{Value, json};
use tower_util::ServiceExt;
use tubegraph_domain::ports::tokens::{TokenClaims, TokenCodec, TokenKind};
use tubegraph_infra::auth::JwtTokenCodec;
use tubegraph_infra::config::AppConfig;
use tubegraph_infra::db::MemoryAdapter;
use tubegraph_infra::repositories::memory_repositories;

use crate::routes;
use crate::state::AppState;

const PASSWORD: &str = "correct-horse-battery";

fn test_config() -> AppConfig {
    AppConfig::for_tests()
}

fn test_app() -> axum::Router {
    let repos = memory_repositories();
    let store = Arc::new(MemoryAdapter::new(repos.clone()));
    let state = AppState::with_repositories(test_config(), repos, store);
    routes::router(state)
}

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json body")
}

async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    (status, body_json(response).await)
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).expect("request")
}

fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    builder.body(Body::empty()).expect("request")
}

struct Session {
    user_id: String,
    access_token: String,
    refresh_token: String,
}

async fn register_and_login(app: &axum::Router, username: &str) -> Session {
    let (status, _) = send(
        app,
        json_request(
            "POST",
            "/api/v1/users/register",
            None,
            json!({
                "full_name": format!("{username} tester"),
                "email": format!("{username}@example.com"),
                "username": username,
                "password": PASSWORD,
                "avatar_url": format!("https://cdn.example.com/{username}.png"),
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/api/v1/users/login",
            None,
            json!({ "username": username, "password": PASSWORD }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    Session {
        user_id: body["data"]["user"]["user_id"]
            .as_str()
            .expect("user id")
            .to_string(),
        access_token: body["data"]["access_token"]
            .as_str()
            .expect("access token")
            .to_string(),
        refresh_token: body["data"]["refresh_token"]
            .as_str()
            .expect("refresh token")
            .to_string(),
    }
}

async fn publish_video(app: &axum::Router, session: &Session, title: &str) -> String {
    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/api/v1/videos",
            Some(&session.access_token),
            json!({
                "title": title,
                "description": format!("about {title}"),
                "media_url": "https://cdn.example.com/video.mp4",
                "thumbnail_url": "https://cdn.example.com/thumb.png",
                "duration_secs": 61.5,
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["video_id"]
        .as_str()
        .expect("video id")
        .to_string()
}

#[tokio::test]
async fn health_reports_store_status() {
    let app = test_app();
    let (status, body) = send(&app, empty_request("GET", "/health", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["environment"], "test");
    assert_eq!(body["store"]["backend"], "memory");
    assert_eq!(body["store"]["healthy"], true);
}

#[tokio::test]
async fn metrics_endpoint_is_public() {
    let app = test_app();
    let response = app
        .clone()
        .oneshot(empty_request("GET", "/metrics", None))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn register_login_and_fetch_current_user() {
    let app = test_app();
    let session = register_and_login(&app, "alice").await;

    let (status, body) = send(
        &app,
        empty_request(
            "GET",
            "/api/v1/users/current-user",
            Some(&session.access_token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status_code"], 200);
    assert_eq!(body["data"]["user_id"], session.user_id.as_str());
    assert_eq!(body["data"]["username"], "alice");
    assert!(body["data"].get("password_hash").is_none());
}

#[tokio::test]
async fn login_sets_session_cookies() {
    let app = test_app();
    register_and_login(&app, "carol").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/v1/users/login",
            None,
            json!({ "email": "carol@example.com", "password": PASSWORD }),
        ))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let cookies: Vec<String> = response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok().map(str::to_string))
        .collect();
    assert!(cookies.iter().any(|c| c.starts_with("access_token=")));
    assert!(cookies.iter().any(|c| c.starts_with("refresh_token=")));
}

#[tokio::test]
async fn access_cookie_authenticates_requests() {
    let app = test_app();
    let session = register_and_login(&app, "cookie").await;

    let request = Request::builder()
        .method("GET")
        .uri("/api/v1/users/current-user")
        .header("cookie", format!("access_token={}", session.access_token))
        .body(Body::empty())
        .expect("request");
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "cookie");
}

#[tokio::test]
async fn wrong_password_is_rejected_with_envelope() {
    let app = test_app();
    register_and_login(&app, "dave").await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/users/login",
            None,
            json!({ "username": "dave", "password": "not-the-password" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status_code"], 401);
    assert_eq!(body["code"], "invalid_credentials");
    assert!(body["data"].is_null());
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let app = test_app();
    let (status, body) = send(&app, empty_request("GET", "/api/v1/users/current-user", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "unauthorized");

    let (status, body) = send(
        &app,
        empty_request("GET", "/api/v1/users/current-user", Some("garbage")),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "token_invalid");
}

#[tokio::test]
async fn expired_access_token_is_reported_as_expired() {
    let app = test_app();
    let session = register_and_login(&app, "erin").await;
    let config = test_config();
    let codec = JwtTokenCodec::from_config(&config);
    let now = tubegraph_domain::util::now_ms() / 1000;
    let expired = codec
        .sign(&TokenClaims {
            sub: session.user_id.clone(),
            username: Some("erin".to_string()),
            typ: TokenKind::Access,
            jti: "expired-token".to_string(),
            iat: now - 120,
            exp: now - 60,
        })
        .expect("sign");

    let (status, body) = send(
        &app,
        empty_request("GET", "/api/v1/users/current-user", Some(&expired)),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "token_expired");
}

#[tokio::test]
async fn refresh_rotation_detects_reuse() {
    let app = test_app();
    let session = register_and_login(&app, "frank").await;

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/users/refresh-token",
            None,
            json!({ "refresh_token": session.refresh_token }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let rotated = body["data"]["refresh_token"]
        .as_str()
        .expect("rotated refresh token")
        .to_string();
    assert_ne!(rotated, session.refresh_token);

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/users/refresh-token",
            None,
            json!({ "refresh_token": session.refresh_token }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "token_reused");
}

#[tokio::test]
async fn refresh_token_is_read_from_cookie() {
    let app = test_app();
    let session = register_and_login(&app, "grace").await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/users/refresh-token")
        .header("cookie", format!("refresh_token={}", session.refresh_token))
        .body(Body::empty())
        .expect("request");
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["access_token"].is_string());
}

#[tokio::test]
async fn logout_revokes_the_refresh_token() {
    let app = test_app();
    let session = register_and_login(&app, "heidi").await;

    let (status, _) = send(
        &app,
        empty_request("POST", "/api/v1/users/logout", Some(&session.access_token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/users/refresh-token",
            None,
            json!({ "refresh_token": session.refresh_token }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "token_invalid");
}

#[tokio::test]
async fn like_toggle_flips_state() {
    let app = test_app();
    let owner = register_and_login(&app, "owner").await;
    let viewer = register_and_login(&app, "viewer").await;
    let video_id = publish_video(&app, &owner, "first upload").await;
    let uri = format!("/api/v1/likes/video/{video_id}");

    let (status, body) = send(&app, empty_request("POST", &uri, Some(&viewer.access_token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["active"], true);

    let (_, detail) = send(
        &app,
        empty_request(
            "GET",
            &format!("/api/v1/videos/{video_id}"),
            Some(&viewer.access_token),
        ),
    )
    .await;
    assert_eq!(detail["data"]["likes_count"], 1);
    assert_eq!(detail["data"]["is_liked"], true);

    let (status, body) = send(&app, empty_request("POST", &uri, Some(&viewer.access_token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["active"], false);
}

#[tokio::test]
async fn like_toggle_rejects_unknown_kind_and_missing_target() {
    let app = test_app();
    let viewer = register_and_login(&app, "ivan").await;

    let (status, body) = send(
        &app,
        empty_request(
            "POST",
            "/api/v1/likes/playlist/0190a1b2c3d4e5f60718293a4b5c6d7e",
            Some(&viewer.access_token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");

    let (status, body) = send(
        &app,
        empty_request(
            "POST",
            "/api/v1/likes/video/0190a1b2c3d4e5f60718293a4b5c6d7e",
            Some(&viewer.access_token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}

#[tokio::test]
async fn self_subscription_is_an_invalid_operation() {
    let app = test_app();
    let session = register_and_login(&app, "judy").await;

    let (status, body) = send(
        &app,
        empty_request(
            "POST",
            &format!("/api/v1/subscriptions/toggle/{}", session.user_id),
            Some(&session.access_token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_operation");
}

#[tokio::test]
async fn subscription_shows_up_in_channel_profile() {
    let app = test_app();
    let creator = register_and_login(&app, "creator").await;
    let fan = register_and_login(&app, "fan").await;

    let (status, body) = send(
        &app,
        empty_request(
            "POST",
            &format!("/api/v1/subscriptions/toggle/{}", creator.user_id),
            Some(&fan.access_token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["active"], true);

    let (status, body) = send(
        &app,
        empty_request("GET", "/api/v1/users/c/creator", Some(&fan.access_token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["subscribers_count"], 1);
    assert_eq!(body["data"]["is_subscribed"], true);

    let (_, body) = send(
        &app,
        empty_request(
            "GET",
            "/api/v1/subscriptions/subscribed",
            Some(&fan.access_token),
        ),
    )
    .await;
    assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn feed_returns_a_page_envelope() {
    let app = test_app();
    let owner = register_and_login(&app, "kate").await;
    for n in 0..3 {
        publish_video(&app, &owner, &format!("clip {n}")).await;
    }

    let (status, body) = send(
        &app,
        empty_request(
            "GET",
            "/api/v1/videos?page=1&limit=2",
            Some(&owner.access_token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let page = &body["data"];
    assert_eq!(page["items"].as_array().map(Vec::len), Some(2));
    assert_eq!(page["total_items"], 3);
    assert_eq!(page["total_pages"], 2);
    assert_eq!(page["has_next_page"], true);
    assert_eq!(page["items"][0]["owner"]["username"], "kate");
}

#[tokio::test]
async fn feed_rejects_zero_limit_and_unknown_sort() {
    let app = test_app();
    let session = register_and_login(&app, "leo").await;

    let (status, body) = send(
        &app,
        empty_request("GET", "/api/v1/videos?limit=0", Some(&session.access_token)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation_error");

    let (status, _) = send(
        &app,
        empty_request(
            "GET",
            "/api/v1/videos?sort_by=popularity",
            Some(&session.access_token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn non_owner_cannot_delete_a_video() {
    let app = test_app();
    let owner = register_and_login(&app, "mallory").await;
    let intruder = register_and_login(&app, "niaj").await;
    let video_id = publish_video(&app, &owner, "mine").await;

    let (status, body) = send(
        &app,
        empty_request(
            "DELETE",
            &format!("/api/v1/videos/{video_id}"),
            Some(&intruder.access_token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "forbidden");

    let (status, _) = send(
        &app,
        empty_request(
            "DELETE",
            &format!("/api/v1/videos/{video_id}"),
            Some(&owner.access_token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn invalid_register_payload_names_fields() {
    let app = test_app();
    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/users/register",
            None,
            json!({
                "full_name": "Olivia",
                "email": "not-an-email",
                "username": "olivia",
                "password": "short",
                "avatar_url": "https://cdn.example.com/o.png",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "invalid fields: email, password");
}

#[tokio::test]
async fn duplicate_registration_conflicts() {
    let app = test_app();
    register_and_login(&app, "peggy").await;
    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/users/register",
            None,
            json!({
                "full_name": "Peggy Again",
                "email": "peggy@example.com",
                "username": "peggy",
                "password": PASSWORD,
                "avatar_url": "https://cdn.example.com/p.png",
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "conflict");
}

#[tokio::test]
async fn comments_and_playlists_round_through_the_api() {
    let app = test_app();
    let owner = register_and_login(&app, "quinn").await;
    let video_id = publish_video(&app, &owner, "tutorial").await;

    let (status, _) = send(
        &app,
        json_request(
            "POST",
            &format!("/api/v1/comments/{video_id}"),
            Some(&owner.access_token),
            json!({ "content": "first!" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        empty_request(
            "GET",
            &format!("/api/v1/comments/{video_id}"),
            Some(&owner.access_token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_items"], 1);
    assert_eq!(body["data"]["items"][0]["content"], "first!");

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/v1/playlists",
            Some(&owner.access_token),
            json!({ "name": "favourites", "description": "best of" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let playlist_id = body["data"]["playlist_id"]
        .as_str()
        .expect("playlist id")
        .to_string();

    let add_uri = format!("/api/v1/playlists/add/{video_id}/{playlist_id}");
    let (status, _) = send(&app, empty_request("PATCH", &add_uri, Some(&owner.access_token))).await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = send(&app, empty_request("PATCH", &add_uri, Some(&owner.access_token))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "conflict");

    let (status, body) = send(
        &app,
        empty_request(
            "GET",
            &format!("/api/v1/playlists/{playlist_id}"),
            Some(&owner.access_token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_videos"], 1);
}

#[tokio::test]
async fn dashboard_stats_count_views_and_likes() {
    let app = test_app();
    let owner = register_and_login(&app, "rupert").await;
    let viewer = register_and_login(&app, "sybil").await;
    let video_id = publish_video(&app, &owner, "stats").await;

    send(
        &app,
        empty_request(
            "GET",
            &format!("/api/v1/videos/{video_id}"),
            Some(&viewer.access_token),
        ),
    )
    .await;
    send(
        &app,
        empty_request(
            "POST",
            &format!("/api/v1/likes/video/{video_id}"),
            Some(&viewer.access_token),
        ),
    )
    .await;

    let (status, body) = send(
        &app,
        empty_request("GET", "/api/v1/dashboard/stats", Some(&owner.access_token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_videos"], 1);
    assert_eq!(body["data"]["total_views"], 1);
    assert_eq!(body["data"]["total_likes"], 1);

    let (status, _) = send(
        &app,
        empty_request(
            "GET",
            "/api/v1/dashboard/analytics?period=0",
            Some(&owner.access_token),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn correlation_id_is_echoed() {
    let app = test_app();
    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .header("x-correlation-id", "corr-123")
        .body(Body::empty())
        .expect("request");
    let response = app.clone().oneshot(request).await.expect("response");
    assert_eq!(
        response
            .headers()
            .get("x-correlation-id")
            .and_then(|v| v.to_str().ok()),
        Some("corr-123")
    );
}
