use axum::extract::State;
use axum::{
    Json, Router,
    http::{StatusCode, header},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tubegraph_domain::identity::ActorIdentity;
use tubegraph_domain::views::PageRequest;

use crate::error::ApiError;
use crate::middleware::AuthContext;
use crate::{middleware as app_middleware, observability, state::AppState};

mod comments;
mod dashboard;
mod engagement;
mod playlists;
mod tweets;
mod users;
mod videos;

pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .merge(users::protected_routes())
        .merge(videos::routes())
        .merge(comments::routes())
        .merge(tweets::routes())
        .merge(engagement::routes())
        .merge(playlists::routes())
        .merge(dashboard::routes())
        .route_layer(middleware::from_fn(app_middleware::require_auth_middleware));

    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .merge(users::public_routes())
        .merge(protected)
        .layer(middleware::from_fn(app_middleware::metrics_layer))
        .layer(app_middleware::timeout_layer(
            state.config.request_timeout_secs,
        ))
        .layer(app_middleware::trace_layer())
        .layer(app_middleware::set_request_id_layer())
        .layer(app_middleware::propagate_request_id_layer())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            app_middleware::auth_middleware,
        ))
        .layer(middleware::from_fn(
            app_middleware::correlation_id_middleware,
        ))
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    environment: String,
    store: StoreHealth,
}

#[derive(Serialize)]
struct StoreHealth {
    backend: &'static str,
    healthy: bool,
}

async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let healthy = match state.store.health_check().await {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(error = %err, backend = state.store.name(), "store health check failed");
            false
        }
    };
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (
        status,
        Json(HealthResponse {
            status: if healthy { "ok" } else { "degraded" },
            version: env!("CARGO_PKG_VERSION"),
            environment: state.config.app_env.clone(),
            store: StoreHealth {
                backend: state.store.name(),
                healthy,
            },
        }),
    )
}

async fn metrics() -> Response {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        observability::render_metrics().unwrap_or_default(),
    )
        .into_response()
}

fn actor_identity(auth: &AuthContext) -> Result<ActorIdentity, ApiError> {
    auth.actor.clone().ok_or(ApiError::Unauthorized)
}

#[derive(Debug, Default, Deserialize)]
struct PageParams {
    page: Option<usize>,
    limit: Option<usize>,
}

impl From<PageParams> for PageRequest {
    fn from(params: PageParams) -> Self {
        PageRequest {
            page: params.page,
            limit: params.limit,
        }
    }
}
