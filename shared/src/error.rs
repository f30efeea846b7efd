use crate::responses::error_response;
use lambda_http::{http::StatusCode, Body, Error, Response};
use thiserror::Error;

/// Failures reported by a [`RecordStore`](crate::store::RecordStore) backend
#[derive(Debug, Error)]
pub enum StoreError {
    /// The update precondition (key exists) did not hold when applied
    #[error("conditional check failed")]
    ConditionFailed,

    /// Anything the backend reported: connectivity, throttling, bad table
    #[error("store backend error: {0}")]
    Backend(String),

    /// A stored value could not be mapped to or from JSON
    #[error("attribute conversion error: {0}")]
    Conversion(String),
}

/// Client-facing error taxonomy, one variant per response class
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    /// Store failure. The message is generic; details only go to the log.
    #[error("{message}")]
    Store {
        status: StatusCode,
        message: &'static str,
    },

    #[error("Not Found")]
    RouteNotFound,
}

impl ApiError {
    /// Logs the underlying store error and hides it behind `message`.
    pub fn store(err: StoreError, status: StatusCode, message: &'static str) -> Self {
        tracing::error!(error = %err, "{}", message);
        ApiError::Store { status, message }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) | ApiError::RouteNotFound => StatusCode::NOT_FOUND,
            ApiError::Store { status, .. } => *status,
        }
    }

    pub fn into_response(self) -> Result<Response<Body>, Error> {
        error_response(self.status(), &self.to_string())
    }
}
