//! Failures of the compress endpoint and their HTTP mapping.

use pixpress_core::{CompressError, OptionsError};
use poem::http::StatusCode;
use poem_openapi::payload::Json;
use thiserror::Error;
use tokio::task::JoinError;

use crate::schemas::{common::ErrorResponse, compress::CompressResponse};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("No file provided")]
    MissingFile,

    #[error("File too large: {size} bytes exceeds the {limit} byte limit")]
    PayloadTooLarge { size: usize, limit: usize },

    #[error(transparent)]
    Options(#[from] OptionsError),

    #[error("Failed to read upload: {0}")]
    Upload(#[from] std::io::Error),

    #[error(transparent)]
    Compress(#[from] CompressError),

    #[error("Compression task failed: {0}")]
    Task(#[from] JoinError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingFile | ApiError::Options(_) | ApiError::Upload(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Compress(err) if err.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::Compress(_) | ApiError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ApiError> for CompressResponse {
    fn from(err: ApiError) -> Self {
        let status = err.status();
        let body = Json(ErrorResponse::new(err.to_string()));

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), "compress failed: {}", err);
        } else {
            tracing::warn!(status = status.as_u16(), "compress rejected: {}", err);
        }

        match status {
            StatusCode::PAYLOAD_TOO_LARGE => CompressResponse::PayloadTooLarge(body),
            StatusCode::BAD_REQUEST => CompressResponse::BadRequest(body),
            _ => CompressResponse::InternalServerError(body),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixpress_core::{DecodeError, EncodeError};

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::MissingFile.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::PayloadTooLarge { size: 2, limit: 1 }.status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            ApiError::from(OptionsError::MissingPreset).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(CompressError::from(DecodeError::InvalidFormat)).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(CompressError::from(EncodeError::InvalidDimensions {
                width: 0,
                height: 0
            }))
            .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_response_variant() {
        let resp = CompressResponse::from(ApiError::PayloadTooLarge { size: 10, limit: 5 });
        match resp {
            CompressResponse::PayloadTooLarge(Json(body)) => {
                assert!(body.error.contains("10 bytes"));
            }
            _ => panic!("expected 413"),
        }

        let resp = CompressResponse::from(ApiError::MissingFile);
        match resp {
            CompressResponse::BadRequest(Json(body)) => assert_eq!(body.error, "No file provided"),
            _ => panic!("expected 400"),
        }
    }
}
