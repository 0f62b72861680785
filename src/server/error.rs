//! HTTP mapping for [`DeepvistaError`]

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

use crate::DeepvistaError;

/// JSON error body: `{"detail": "..."}`
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

impl DeepvistaError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            DeepvistaError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            DeepvistaError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            DeepvistaError::ProviderUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            DeepvistaError::Transcript(_) => StatusCode::NOT_FOUND,
            DeepvistaError::Provider(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for DeepvistaError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("{} {}", status, self);
        }

        (
            status,
            Json(ErrorBody {
                detail: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::youtube::TranscriptError;

    #[test]
    fn categories_map_to_status_codes() {
        assert_eq!(
            DeepvistaError::InvalidInput("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            DeepvistaError::Validation("bad".into()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            DeepvistaError::ProviderUnavailable.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            DeepvistaError::Provider("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            DeepvistaError::from(TranscriptError::Unknown("x".into())).status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn transcript_detail_keeps_category_prefix() {
        let err = DeepvistaError::from(TranscriptError::TranscriptsDisabled("abc".into()));
        assert_eq!(
            err.to_string(),
            "Transcripts Disabled: subtitles are disabled for video abc"
        );
    }
}
