// src/error.rs
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use serde_json::json;
use thiserror::Error;

use crate::ledger::Question;

/// Errors surfaced at the request boundary.
///
/// None of these terminate the process: each one is rendered as a JSON
/// `{ "error": ... }` body with a matching status code. Duplicate and
/// unknown-token submissions are not errors; they come back as a
/// [`SubmissionOutcome`](crate::ledger::SubmissionOutcome).
#[derive(Debug, Error)]
pub enum PollError {
    #[error("token not recognized")]
    TokenNotFound,

    #[error("no token provided, add ?token=YOUR_TOKEN to the link")]
    MissingToken,

    /// Query string or JSON body that could not be decoded.
    #[error("malformed request: {0}")]
    BadRequest(String),

    #[error("`{candidate}` is not an option for the {question} question")]
    InvalidCandidate { question: Question, candidate: String },

    #[error("unknown question `{0}`")]
    UnknownQuestion(String),

    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl PollError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::TokenNotFound | Self::UnknownQuestion(_) => StatusCode::NOT_FOUND,
            Self::MissingToken | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::InvalidCandidate { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::StorageUnavailable(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for PollError {
    fn from(err: sqlx::Error) -> Self {
        PollError::StorageUnavailable(err.to_string())
    }
}

impl From<QueryRejection> for PollError {
    fn from(rejection: QueryRejection) -> Self {
        PollError::BadRequest(rejection.body_text())
    }
}

impl From<JsonRejection> for PollError {
    fn from(rejection: JsonRejection) -> Self {
        PollError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for PollError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            // Keep database details in the logs only.
            Self::StorageUnavailable(detail) => {
                tracing::error!(%detail, "storage failure while serving request");
                "storage unavailable, please try again later".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
