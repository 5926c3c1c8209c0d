//! Configuration and boundary errors.

use crate::error::Problems;

/// A schema definition that cannot be used.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An item behaviour given as text did not name a known behaviour.
    #[error("unknown {kind} behaviour '{value}', expected one of: {expected}")]
    UnknownBehaviour {
        kind: &'static str,
        value: String,
        expected: &'static str,
    },

    /// A regex literal in a pattern or schema did not compile.
    #[error("invalid regex: {0}")]
    Regex(#[from] regex::Error),
}

/// Raised by [`validate`](crate::validate) when a value cannot be turned into
/// the requested type.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    /// The value did not conform to the schema.
    #[error("{0}")]
    Invalid(Problems),

    /// The conformed value did not deserialize into the target type.
    #[error("conformed value does not fit the target type: {0}")]
    Deserialize(#[from] serde_json::Error),
}

impl ValidationError {
    /// The problems reported by the schema, if that is why validation failed.
    pub fn problems(&self) -> Option<&Problems> {
        match self {
            ValidationError::Invalid(problems) => Some(problems),
            ValidationError::Deserialize(_) => None,
        }
    }
}

impl From<Problems> for ValidationError {
    fn from(problems: Problems) -> Self {
        ValidationError::Invalid(problems)
    }
}
