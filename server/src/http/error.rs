use axum::{
    Json,
    extract::{
        Request,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use bulb_types::ValidationErrors;
use tracing::error;

use super::dto::ErrorResponse;
use crate::service::ServiceError;

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Validation(ValidationErrors),
    InternalError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message, errors) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "Not Found", msg, None),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "Bad Request", msg, None),
            ApiError::Validation(violations) => {
                let errors = violations
                    .violations()
                    .iter()
                    .map(|v| (v.field.clone(), v.message.clone()))
                    .collect();
                (
                    StatusCode::BAD_REQUEST,
                    "Validation Error",
                    "Validation failed".to_string(),
                    Some(errors),
                )
            }
            ApiError::InternalError(msg) => {
                error!("Request failed: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error",
                    format!("An unexpected error occurred: {msg}"),
                    None,
                )
            }
        };

        let body = ErrorResponse {
            timestamp: chrono::Utc::now().to_rfc3339(),
            status: status.as_u16(),
            error: error.to_string(),
            message,
            path: String::new(),
            errors,
        };

        // Kept on the response so `attach_error_path` can fill in the path.
        let mut response = (status, Json(body.clone())).into_response();
        response.extensions_mut().insert(body);
        response
    }
}

/// Middleware that stamps the request path onto `ApiError` bodies.
pub async fn attach_error_path(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let mut response = next.run(request).await;

    match response.extensions_mut().remove::<ErrorResponse>() {
        Some(mut body) => {
            body.path = path;
            (response.status(), Json(body)).into_response()
        }
        None => response,
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            ServiceError::Validation(violations) => ApiError::Validation(violations),
            ServiceError::Storage { .. } => ApiError::InternalError(err.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
