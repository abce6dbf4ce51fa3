//! # ApiError
//!
//! Wraps domain errors so they can be rendered as the JSON status envelope
//! `{"status": "error", "message": ...}` with a matching HTTP status.

use actix_multipart::MultipartError;
use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use thiserror::Error;
use tv_core::AppError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    App(#[from] AppError),

    #[error("invalid multipart body: {0}")]
    Multipart(#[from] MultipartError),
}

#[derive(Serialize)]
struct ErrorBody {
    status: &'static str,
    message: String,
}

impl ApiError {
    /// Client-facing text. Internal details stay in the log.
    fn message(&self) -> String {
        match self {
            ApiError::App(AppError::ValidationError(msg)) => msg.clone(),
            ApiError::App(AppError::Internal(_)) => "internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::App(AppError::NotFound(..)) => StatusCode::NOT_FOUND,
            ApiError::App(AppError::ValidationError(_)) => StatusCode::BAD_REQUEST,
            ApiError::App(AppError::DecodeError(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::App(AppError::EncodeError(_)) | ApiError::App(AppError::Internal(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Multipart(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("request failed: {self}");
        }
        HttpResponse::build(status).json(ErrorBody {
            status: "error",
            message: self.message(),
        })
    }
}
