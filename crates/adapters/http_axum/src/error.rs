//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use prayerbridge_domain::error::{PrayerBridgeError, ValidationError};

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps [`PrayerBridgeError`] to an HTTP response with appropriate status code.
#[derive(Debug)]
pub struct ApiError(PrayerBridgeError);

impl From<PrayerBridgeError> for ApiError {
    fn from(err: PrayerBridgeError) -> Self {
        Self(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            PrayerBridgeError::Validation(err @ ValidationError::UnknownPrayer(_)) => {
                (StatusCode::NOT_FOUND, err.to_string())
            }
            PrayerBridgeError::Validation(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            err => {
                tracing::error!(error = %err, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
