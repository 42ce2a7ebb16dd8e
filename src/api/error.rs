use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::error_response;
use crate::core::CalcError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidParameter(String),

    #[error("Invalid API JSON payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    #[error(transparent)]
    Usage(#[from] clap::Error),

    #[error(transparent)]
    Calculation(#[from] CalcError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidParameter(_) | ApiError::InvalidPayload(_) | ApiError::Usage(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Calculation(err) => match err {
                CalcError::InvalidInput { .. } | CalcError::InvalidPeriods => {
                    StatusCode::BAD_REQUEST
                }
                CalcError::InfeasiblePrepayment { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                CalcError::NonFinite(_) | CalcError::Io(_) | CalcError::Serialization(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "calculation failed");
            return error_response(status, "Internal calculation error");
        }
        error_response(status, &self.to_string())
    }
}
