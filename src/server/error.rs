//! Error kinds returned by the request handlers and their JSON rendering.

use std::any::Any;
use std::fmt::Display;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

pub type ApiResponse<T> = Result<T, ApiError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("bad request")]
    BadRequest,
    #[error("resource not found")]
    NotFound,
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("unprocessable")]
    Unprocessable,
    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    /// Code reported in the `error` field of the body.
    pub fn code(&self) -> u16 {
        match self {
            ApiError::BadRequest => 400,
            ApiError::NotFound => 404,
            ApiError::MethodNotAllowed => 405,
            ApiError::Unprocessable => 422,
            ApiError::Internal => 505,
        }
    }

    /// HTTP status of the response. Matches [`ApiError::code`] except for
    /// `Internal`, which existing clients receive as 405.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed | ApiError::Internal => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Unprocessable => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: u16,
    pub message: String,
}

impl From<ApiError> for ErrorBody {
    fn from(err: ApiError) -> Self {
        Self {
            success: false,
            error: err.code(),
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(ErrorBody::from(self))).into_response()
    }
}

/// Maps any failure onto the error kind an endpoint reports, logging the cause.
pub trait OrApiError<T> {
    fn or_api_error(self, kind: ApiError) -> ApiResponse<T>;
}

impl<T, E: Display> OrApiError<T> for Result<T, E> {
    fn or_api_error(self, kind: ApiError) -> ApiResponse<T> {
        self.map_err(|err| {
            tracing::warn!(error = %err, code = kind.code(), "request failed");
            kind
        })
    }
}

pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        *s
    } else {
        "unknown panic"
    };
    tracing::error!(details, "handler panicked");
    ApiError::Internal.into_response()
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use serde_json::{json, Value};

    use super::*;

    async fn body_of(err: ApiError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn not_found_body() {
        let (status, body) = body_of(ApiError::NotFound).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body,
            json!({"success": false, "error": 404, "message": "resource not found"})
        );
    }

    #[tokio::test]
    async fn unprocessable_body() {
        let (status, body) = body_of(ApiError::Unprocessable).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            body,
            json!({"success": false, "error": 422, "message": "unprocessable"})
        );
    }

    #[tokio::test]
    async fn internal_error_is_sent_as_405() {
        let (status, body) = body_of(ApiError::Internal).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body["error"], 505);
        assert_eq!(body["message"], "Internal server error");
    }

    #[test]
    fn status_matches_code_for_client_errors() {
        for err in [
            ApiError::BadRequest,
            ApiError::NotFound,
            ApiError::MethodNotAllowed,
            ApiError::Unprocessable,
        ] {
            assert_eq!(err.status_code().as_u16(), err.code());
        }
    }

    #[test]
    fn or_api_error_replaces_the_cause() {
        let res: Result<(), sqlx::Error> = Err(sqlx::Error::RowNotFound);
        assert_eq!(res.or_api_error(ApiError::BadRequest), Err(ApiError::BadRequest));
    }

    #[test]
    fn panic_renders_internal_error() {
        let response = handle_panic(Box::new("boom"));
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
