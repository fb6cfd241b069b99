//! Error types for strong-json encoding and decoding operations.

use thiserror::Error;

/// Errors that can occur while encoding or decoding.
///
/// Every variant is fatal for the call that raised it. The only non-fatal
/// condition (dumping an unregistered type) is reported as a
/// [`Diagnostic`](crate::diagnostics::Diagnostic) instead.
#[derive(Error, Debug)]
pub enum StrongJsonError {
    /// An envelope carried a type tag that is neither registered nor a
    /// built-in sentinel.
    #[error("type not found in class map for tag {tag:?}")]
    ClassMapLookupFail { tag: String },

    /// A registered record was decoded from an envelope lacking required
    /// constructor parameters.
    #[error("missing parameters for {type_name}: {}", .missing.join(", "))]
    MissingParameter {
        type_name: String,
        missing: Vec<String>,
    },

    /// An envelope named a reserved adapter tag whose adapter is not active.
    #[error("adapter for tag {tag:?} is not available in this build")]
    MissingOptionalAdapter { tag: String },

    /// An enumeration envelope named a member the enumeration does not have.
    #[error("{type_name} has no member named {member:?}")]
    UnknownEnumMember { type_name: String, member: String },

    /// A sentinel or adapter envelope had a payload of the wrong shape.
    #[error("malformed {tag:?} payload: {reason}")]
    MalformedPayload { tag: String, reason: String },

    /// A record field is named like the configured type key or data key.
    #[error("field {field:?} of {type_name} collides with a reserved envelope key")]
    ReservedField { type_name: String, field: String },

    /// The same object was reached again while it was still being encoded.
    #[error("cycle detected while encoding {type_name}")]
    CycleDetected { type_name: String },

    /// The input nests deeper than the configured limit.
    #[error("nesting depth exceeds limit of {limit}")]
    DepthLimitExceeded { limit: usize },

    /// A `Constructible` type rejected the decoded arguments.
    #[error("cannot construct {type_name}: {reason}")]
    Construct { type_name: String, reason: String },

    /// The codec configuration is unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The JSON text layer failed to parse or print.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StrongJsonError {
    pub(crate) fn malformed(tag: &str, reason: impl Into<String>) -> Self {
        StrongJsonError::MalformedPayload {
            tag: tag.to_string(),
            reason: reason.into(),
        }
    }
}

/// Convenience alias used throughout strong-json.
pub type Result<T> = std::result::Result<T, StrongJsonError>;
