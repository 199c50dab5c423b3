//! Crate-wide error type.
//!
//! Failures fall into these families:
//! - construction errors, raised by the call that builds a malformed node;
//! - validation errors, raised before rendering (see [`crate::validation`]);
//! - dialect errors, raised when a renderer meets a construct its dialect
//!   cannot express;
//! - mapping errors, raised when a record type or property has no mapping.

use crate::sql::value::DataKind;
use crate::validation::ValidationError;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("invalid {kind} constant: {reason}")]
    InvalidConstant { kind: DataKind, reason: String },

    #[error("invalid query: {0}")]
    InvalidQuery(#[from] ValidationError),

    #[error("{feature} is not supported by the {dialect} dialect")]
    UnsupportedFeature {
        feature: String,
        dialect: &'static str,
    },

    #[error("unknown date unit: {0}")]
    UnknownDateUnit(String),

    #[error("unknown dialect: {0}")]
    UnknownDialect(String),

    #[error("no table mapping registered for '{0}'")]
    UnknownRecordType(String),

    #[error("'{record_type}' has no mapped property '{property}'")]
    UnknownProperty {
        record_type: String,
        property: String,
    },
}

impl Error {
    pub(crate) fn invalid_constant(kind: DataKind, reason: impl Into<String>) -> Self {
        Error::InvalidConstant {
            kind,
            reason: reason.into(),
        }
    }

    pub(crate) fn unsupported(feature: impl Into<String>, dialect: &'static str) -> Self {
        Error::UnsupportedFeature {
            feature: feature.into(),
            dialect,
        }
    }
}
