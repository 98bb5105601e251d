//! Error types for the agri HTTP service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::gateway::GatewayError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed request that never reached the advisor (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Prediction service failure (502)
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// agri-common error, status chosen by variant
    #[error(transparent)]
    Common(#[from] agri_common::Error),
}

impl ApiError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        use agri_common::Error as E;

        match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            ApiError::Gateway(err) => (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_FAILURE",
                err.user_message(),
            ),
            ApiError::Common(err) => {
                let (status, code) = match err {
                    E::InvalidInput(_) => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
                    E::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
                    E::UpstreamFailure(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_FAILURE"),
                    E::UnsupportedCapability(_) => {
                        (StatusCode::NOT_IMPLEMENTED, "UNSUPPORTED_CAPABILITY")
                    }
                    E::Io(_) | E::Config(_) | E::Internal(_) => {
                        (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
                    }
                };
                (status, code, err.user_message())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = self.parts();

        if status.is_server_error() {
            tracing::warn!(code = error_code, "{}", self);
        }

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use agri_common::Error;

    fn status_of(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_common_error_status_mapping() {
        assert_eq!(status_of(Error::InvalidInput("x".into()).into()), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(Error::NotFound("x".into()).into()), StatusCode::NOT_FOUND);
        assert_eq!(status_of(Error::UpstreamFailure("x".into()).into()), StatusCode::BAD_GATEWAY);
        assert_eq!(
            status_of(Error::UnsupportedCapability("x".into()).into()),
            StatusCode::NOT_IMPLEMENTED
        );
        assert_eq!(
            status_of(Error::Internal("x".into()).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_gateway_error_is_bad_gateway() {
        let err = ApiError::from(GatewayError::Rejected("No image uploaded".into()));
        let (status, code, message) = err.parts();
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(code, "UPSTREAM_FAILURE");
        assert_eq!(message, "No image uploaded");
    }

    #[test]
    fn test_message_has_no_variant_prefix() {
        let err = ApiError::from(Error::NotFound("Crop information not found".into()));
        let (_, _, message) = err.parts();
        assert_eq!(message, "Crop information not found");
    }
}
