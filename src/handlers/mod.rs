pub mod generate;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{error, warn};

use crate::llm::GenerationError;
use crate::media::TranscodeError;

/// Everything `POST /generate` can answer with besides a success body.
/// Input problems map to 400 and are recoverable by the client; upstream
/// and transcoding failures map to 500 with the failure detail passed
/// through verbatim so callers can see what the service said.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Character data is missing.")]
    MissingCharacterData,
    #[error("Incomplete character data. Please provide a value for '{0}'.")]
    IncompleteCharacterData(&'static str),
    #[error("Invalid generation type.")]
    InvalidGenerationType,
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Transcode(#[from] TranscodeError),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingCharacterData
            | ApiError::IncompleteCharacterData(_)
            | ApiError::InvalidGenerationType => StatusCode::BAD_REQUEST,
            ApiError::Generation(_) | ApiError::Transcode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Generation failed: {self}");
        } else {
            warn!("Rejected generation request: {self}");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_errors_map_to_bad_request() {
        assert_eq!(
            ApiError::MissingCharacterData.status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::IncompleteCharacterData("race").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::InvalidGenerationType.status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn upstream_failures_map_to_internal_error() {
        let err = ApiError::Generation(GenerationError::ImageNotGenerated("refused".to_string()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.to_string(),
            "API did not generate an image. It responded with: \"refused\""
        );
    }

    #[test]
    fn validation_message_names_the_field() {
        assert_eq!(
            ApiError::IncompleteCharacterData("appearance").to_string(),
            "Incomplete character data. Please provide a value for 'appearance'."
        );
    }
}
