use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use thiserror::Error;

use cddemo_store::StoreError;
use cddemo_types::TypeError;

/// Errors raised while configuring or starting the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("schema error: {0}")]
    Schema(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type ServerResult<T> = Result<T, ServerError>;

/// Error codes surfaced to API clients.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCode {
    NotFound,
    DuplicateResource,
    DeleteParent,
    MissingRequired,
    InvalidFormat,
    InvalidBodyContent,
    MethodNotAllow,
    ServerError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "NotFound",
            Self::DuplicateResource => "DuplicateResource",
            Self::DeleteParent => "DeleteParent",
            Self::MissingRequired => "MissingRequired",
            Self::InvalidFormat => "InvalidFormat",
            Self::InvalidBodyContent => "InvalidBodyContent",
            Self::MethodNotAllow => "MethodNotAllow",
            Self::ServerError => "ServerError",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::DuplicateResource | Self::DeleteParent => StatusCode::CONFLICT,
            Self::MissingRequired | Self::InvalidFormat | Self::InvalidBodyContent => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::MethodNotAllow => StatusCode::METHOD_NOT_ALLOWED,
            Self::ServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// A request-level failure, rendered as
/// `{"type":"error","status":..,"code":..,"message":..}`.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{}: {message}", .code.as_str())]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    status: u16,
    code: &'static str,
    message: &'a str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.code.status();
        let body = ErrorBody {
            kind: "error",
            status: status.as_u16(),
            code: self.code.as_str(),
            message: &self.message,
        };
        (status, Json(body)).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(m) => Self::new(ErrorCode::NotFound, m),
            StoreError::DuplicateResource(m) => Self::new(ErrorCode::DuplicateResource, m),
            StoreError::DeleteParent(m) => Self::new(ErrorCode::DeleteParent, m),
        }
    }
}

impl From<TypeError> for ApiError {
    fn from(e: TypeError) -> Self {
        match e {
            TypeError::UnknownKind(_) => Self::new(ErrorCode::NotFound, e.to_string()),
            TypeError::InvalidBody { .. } => Self::new(ErrorCode::InvalidBodyContent, e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_to_status() {
        let cases = [
            (StoreError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (StoreError::DuplicateResource("x".into()), StatusCode::CONFLICT),
            (StoreError::DeleteParent("x".into()), StatusCode::CONFLICT),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).code.status(), status);
        }
    }

    #[test]
    fn type_errors_map_to_codes() {
        let unknown = ApiError::from(TypeError::UnknownKind("pods".into()));
        assert_eq!(unknown.code, ErrorCode::NotFound);
        assert_eq!(unknown.message, "no found resource type pods");

        let invalid = ApiError::from(TypeError::InvalidBody {
            kind: "cluster".into(),
            reason: "bad".into(),
        });
        assert_eq!(invalid.code.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn display_includes_code() {
        let e = ApiError::not_found("cluster x is non-exists");
        assert_eq!(e.to_string(), "NotFound: cluster x is non-exists");
    }
}
