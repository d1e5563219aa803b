use api_types::ErrorBody;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use where_is_bus_tracking::{ErrorKind, TrackingError};

/// Everything a handler can fail with.
///
/// Renders as `{"error": "..."}`. Internal failures are logged in full and
/// reported with a fixed message.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Tracking(#[from] TrackingError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Tracking(err) => match err.kind() {
                ErrorKind::Validation => StatusCode::BAD_REQUEST,
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::Conflict => StatusCode::CONFLICT,
                ErrorKind::Exhausted | ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::Tracking(err @ TrackingError::IdSpaceExhausted { .. }) => {
                tracing::error!(error = %err, "Bus id allocation failed");
                "Unable to generate unique id".to_string()
            }
            Self::Tracking(err) if err.kind() == ErrorKind::Internal => {
                tracing::error!(error = %err, "Request failed");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(ErrorBody::new(message))).into_response()
    }
}
