//! JSON envelopes for the trivia API and the mapping from crate errors to
//! HTTP status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};

use crate::error::ShowquizError;

/// Message used when a client error carries no more specific explanation.
pub const DEFAULT_BAD_REQUEST: &str =
    "Bad request as maybe the resource requested is not found, missing fields or wrong request.";

/// `{success: true, data, code}`
#[derive(Debug, Serialize)]
pub struct Success<T> {
    pub success: bool,
    pub data: T,
    pub code: u16,
}

/// `{success: false, message, code}`
#[derive(Debug, Serialize)]
pub struct Failure {
    pub success: bool,
    pub message: String,
    pub code: u16,
}

pub fn success<T: Serialize>(data: T) -> Json<Success<T>> {
    Json(Success {
        success: true,
        data,
        code: StatusCode::OK.as_u16(),
    })
}

pub type ApiResult<T> = Result<Json<Success<T>>, ApiError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("{message}")]
    BadRequest { message: String },

    #[error("Invalid endpoint or maybe HTTP request method is not support for this endpoint.")]
    EndpointNotFound,

    #[error("HTTP method is not supported for this endpoint.")]
    MethodNotAllowed,

    #[error("Unable to process your request, please try again later.")]
    Internal,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::EndpointNotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_failure(&self) -> Failure {
        Failure {
            success: false,
            message: self.to_string(),
            code: self.status().as_u16(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.to_failure())).into_response()
    }
}

impl From<ShowquizError> for ApiError {
    fn from(err: ShowquizError) -> Self {
        match err {
            ShowquizError::Validation(message) => {
                debug!(%message, "rejected request");
                ApiError::BadRequest { message }
            }
            ShowquizError::NotFound(what) => {
                debug!(%what, "referenced entity not found");
                ApiError::bad_request(DEFAULT_BAD_REQUEST)
            }
            other => {
                error!(error = %other, "request failed");
                ApiError::Internal
            }
        }
    }
}
