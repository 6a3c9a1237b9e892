// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use poe_kernel::error::KernelError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChainError {
    #[error("Kernel error: {0}")]
    Kernel(#[from] KernelError),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Decode error: {0}")]
    Decode(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Unauthorized")]
    Unauthorized,
}

impl IntoResponse for ChainError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ChainError::Kernel(k_err) => (StatusCode::BAD_REQUEST, k_err.to_string()),
            ChainError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            ChainError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            ChainError::Network(msg) | ChainError::Decode(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

/// Terminal outcome of a submission other than finalization.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("Submission failed: {0}")]
    Failed(String),
    #[error("Submission abandoned before a terminal status")]
    Abandoned,
}
