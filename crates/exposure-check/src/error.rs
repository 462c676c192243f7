use crate::assessment::{
    AssessmentServiceError, IncompleteAnswers, ParseAnswerError, RepositoryError,
};
use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("server error: {0}")]
    Server(#[from] axum::Error),
    #[error("assessment error: {0}")]
    Assessment(#[from] AssessmentServiceError),
    #[error("invalid answer: {0}")]
    Answer(#[from] ParseAnswerError),
    #[error("{0}")]
    Incomplete(#[from] IncompleteAnswers),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Answer(_) => StatusCode::BAD_REQUEST,
            AppError::Incomplete(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Assessment(AssessmentServiceError::Transition(_)) => StatusCode::CONFLICT,
            AppError::Assessment(AssessmentServiceError::Repository(RepositoryError::NotFound)) => {
                StatusCode::NOT_FOUND
            }
            AppError::Assessment(AssessmentServiceError::Repository(
                RepositoryError::CapacityExceeded(_),
            )) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Assessment(_)
            | AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
