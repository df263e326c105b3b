//! HTTP error mapping.

use std::io;

use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use super::payload::ErrorBody;
use crate::tracking::TrackingError;

/// A tracking error on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub TrackingError);

impl From<TrackingError> for ApiError {
    fn from(e: TrackingError) -> Self {
        Self(e)
    }
}

// Extractor rejections use the JSON error body too
impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self(TrackingError::BadRequest(rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(TrackingError::BadRequest(rejection.body_text()))
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            TrackingError::BadRequest(_) => StatusCode::BAD_REQUEST,
            TrackingError::NotFound(_) => StatusCode::NOT_FOUND,
            TrackingError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Message shown to clients. Resolver failure details stay in the logs.
    pub fn message(&self) -> String {
        match &self.0 {
            TrackingError::Unavailable(_) => {
                "Tracking temporarily unavailable, please retry".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            success: false,
            message: self.message(),
        };
        (self.status(), Json(body)).into_response()
    }
}

/// Errors running the HTTP server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("HTTP server failed: {0}")]
    Serve(#[source] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assignment::OrderId;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (TrackingError::BadRequest("lat is required".into()), 400),
            (TrackingError::NotFound(OrderId::from(7)), 404),
            (TrackingError::Unavailable("timeout".into()), 503),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError(err).status().as_u16(), status);
        }
    }

    #[test]
    fn test_unavailable_hides_internal_reason() {
        let err = ApiError(TrackingError::Unavailable("10.0.3.7:8000 refused".into()));
        assert!(!err.message().contains("10.0.3.7"));
    }

    #[test]
    fn test_not_found_message() {
        let err = ApiError(TrackingError::NotFound(OrderId::from(7)));
        assert_eq!(err.message(), "Order not found");
    }
}
