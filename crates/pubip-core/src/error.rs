//! Error types for the address detection engine
//!
//! Every failure is returned to the immediate caller with enough context
//! (offending literal, underlying cause) to log meaningfully. The engine
//! performs no local recovery or retry; a failed detection simply yields an
//! error for that cycle.

use thiserror::Error;

use crate::config::NetworkStack;

/// Result type alias for detection operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the address detection engine
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors (mismatched detector variant, missing sub-spec)
    #[error("configuration error: {0}")]
    Config(String),

    /// Network-level failure reaching the third-party endpoint
    #[error("transport error: {0}")]
    Transport(String),

    /// The parent execution context was cancelled
    #[error("detection cancelled")]
    Cancelled,

    /// A JSON response requires a query expression but none was configured
    #[error("no jsonpath specified")]
    MissingJsonPath,

    /// Extraction was handed an empty payload
    #[error("response is empty")]
    EmptyPayload,

    /// Extraction was handed an empty query expression
    #[error("jsonpath is empty")]
    EmptyQuery,

    /// The payload could not be parsed as JSON
    #[error("malformed payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    /// The query expression failed to compile
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Query evaluation exceeded its time budget
    #[error("query evaluation timed out")]
    QueryTimeout,

    /// Query evaluation produced an error value
    #[error("query evaluation failed: {0}")]
    QueryEval(String),

    /// The first query result exists but is not a JSON string
    #[error("query result is not a string: {0}")]
    NonScalar(String),

    /// The candidate does not parse as an address of the selected stack
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// A private/local-scope candidate was rejected by policy
    #[error("{reason}: {literal}")]
    LocalAddressRejected {
        /// The rejected literal
        literal: String,
        /// Stack-specific rejection message
        reason: &'static str,
    },
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a transport error wrapping the underlying cause
    pub fn transport(cause: impl std::fmt::Display) -> Self {
        Self::Transport(cause.to_string())
    }

    /// Create an invalid-query error
    pub fn invalid_query(msg: impl Into<String>) -> Self {
        Self::InvalidQuery(msg.into())
    }

    /// Create a query-evaluation error
    pub fn query_eval(msg: impl Into<String>) -> Self {
        Self::QueryEval(msg.into())
    }

    /// Create a non-scalar-result error carrying the offending value
    pub fn non_scalar(value: impl Into<String>) -> Self {
        Self::NonScalar(value.into())
    }

    /// Create an invalid-address error carrying the offending literal
    pub fn invalid_address(literal: impl Into<String>) -> Self {
        Self::InvalidAddress(literal.into())
    }

    /// Create a local-address rejection for the given stack
    pub fn local_address_rejected(literal: impl Into<String>, stack: NetworkStack) -> Self {
        let reason = match stack {
            NetworkStack::V4 => "local address is ignored",
            NetworkStack::V6 => "ULA address is ignored",
        };
        Self::LocalAddressRejected {
            literal: literal.into(),
            reason,
        }
    }
}
