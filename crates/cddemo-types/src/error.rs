use thiserror::Error;

/// Errors produced while interpreting resource types and payloads.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("no found resource type {0}")]
    UnknownKind(String),

    #[error("invalid {kind} body: {reason}")]
    InvalidBody { kind: String, reason: String },
}
