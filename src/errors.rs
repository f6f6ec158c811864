use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Failures of a detection run. Any of these aborts the whole run; no
/// partial results are produced.
#[derive(Debug, thiserror::Error)]
pub enum DetectError {
    #[error("Required column '{0}' not found in trade table")]
    MissingColumn(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Malformed trade table: {0}")]
    MalformedTable(String),

    #[error("Timestamp {0} ms is outside the representable calendar range")]
    TimestampOutOfRange(f64),
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Analysis(#[from] DetectError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Analysis(e) => {
                let status = match e {
                    DetectError::MissingColumn(_)
                    | DetectError::InvalidParameter(_)
                    | DetectError::MalformedTable(_) => StatusCode::BAD_REQUEST,
                    DetectError::TimestampOutOfRange(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                tracing::warn!(error = %e, "Analysis rejected");
                (status, e.to_string())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".into())
            }
        };

        (
            status,
            Json(ErrorBody {
                success: false,
                error: message,
            }),
        )
            .into_response()
    }
}

impl From<axum::extract::multipart::MultipartError> for AppError {
    fn from(e: axum::extract::multipart::MultipartError) -> Self {
        AppError::BadRequest(format!("invalid multipart upload: {e}"))
    }
}
