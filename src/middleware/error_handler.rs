use actix_web::{
    error::{JsonPayloadError, QueryPayloadError},
    http::StatusCode,
    Error, HttpRequest, ResponseError,
};

use crate::core::AppError;

/// Turn JSON extractor failures into the standard 400 error body
pub fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> Error {
    tracing::warn!(path = %req.path(), "Rejected report body: {}", err);
    AppError::validation(format!("Invalid request body: {}", err)).into()
}

/// Turn query-string extractor failures into the standard 400 error body
pub fn query_error_handler(err: QueryPayloadError, req: &HttpRequest) -> Error {
    tracing::warn!(path = %req.path(), "Rejected query string: {}", err);
    AppError::validation(format!("Invalid query parameters: {}", err)).into()
}

/// Log a failed report request at a level matching its status
///
/// Client mistakes are warnings; storage failures are errors.
pub fn log_error(operation: &str, err: &AppError) {
    if err.status_code() == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!(operation, "Failed to generate report: {}", err);
    } else {
        tracing::warn!(operation, status = %err.status_code(), "Report request rejected: {}", err);
    }
}
