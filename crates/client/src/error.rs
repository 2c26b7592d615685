use reqwest::StatusCode;
use thiserror::Error;

use crate::auth::AuthError;

/// Errors surfaced by the gateway and the service modules.
///
/// Service functions return these unchanged; the state containers catch at
/// the top of each async operation.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Token retrieval failed; the request was never sent.
    #[error("authentication failed: {0}")]
    Auth(#[from] AuthError),
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("not found")]
    NotFound,
    #[error("validation error: {0}")]
    Validation(String),
    #[error("{status}: {message}")]
    Server { status: StatusCode, message: String },
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid url: {0}")]
    Url(String),
}

impl ClientError {
    /// Map a non-success response status plus the backend's error body.
    pub(crate) fn from_status(status: StatusCode, message: String) -> Self {
        match status.as_u16() {
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            422 => Self::Validation(message),
            _ => Self::Server { status, message },
        }
    }
}
