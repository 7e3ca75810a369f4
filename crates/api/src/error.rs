use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use thiserror::Error;
use tubegraph_domain::error::DomainError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    InvalidOperation(String),
    #[error("authentication required")]
    Unauthorized,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("token expired")]
    TokenExpired,
    #[error("token invalid")]
    TokenInvalid,
    #[error("refresh token reused")]
    TokenReused,
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("service unavailable")]
    Unavailable,
    #[error("internal error")]
    Internal,
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::InvalidOperation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized
            | ApiError::InvalidCredentials
            | ApiError::TokenExpired
            | ApiError::TokenInvalid
            | ApiError::TokenReused => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation_error",
            ApiError::InvalidOperation(_) => "invalid_operation",
            ApiError::Unauthorized => "unauthorized",
            ApiError::InvalidCredentials => "invalid_credentials",
            ApiError::TokenExpired => "token_expired",
            ApiError::TokenInvalid => "token_invalid",
            ApiError::TokenReused => "token_reused",
            ApiError::Forbidden(_) => "forbidden",
            ApiError::NotFound(_) => "not_found",
            ApiError::Conflict(_) => "conflict",
            ApiError::Unavailable => "store_unavailable",
            ApiError::Internal => "internal_error",
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidArgument(message) => ApiError::Validation(message),
            DomainError::NotFound(_) => ApiError::NotFound(err.to_string()),
            DomainError::Forbidden(message) => ApiError::Forbidden(message),
            DomainError::Conflict(message) => ApiError::Conflict(message),
            DomainError::InvalidOperation(message) => ApiError::InvalidOperation(message),
            DomainError::InvalidCredentials => ApiError::InvalidCredentials,
            DomainError::Expired => ApiError::TokenExpired,
            DomainError::Invalid => ApiError::TokenInvalid,
            DomainError::Reused => ApiError::TokenReused,
            DomainError::StoreUnavailable(detail) => {
                tracing::error!(detail = %detail, "store unavailable");
                ApiError::Unavailable
            }
            DomainError::Unknown(detail) => {
                tracing::error!(detail = %detail, "unexpected domain failure");
                ApiError::Internal
            }
        }
    }
}

#[derive(Serialize)]
struct ErrorEnvelope {
    status_code: u16,
    data: Option<()>,
    message: String,
    code: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        let body = ErrorEnvelope {
            status_code: status.as_u16(),
            data: None,
            message: self.to_string(),
            code: self.error_code(),
        };
        (status, Json(body)).into_response()
    }
}
