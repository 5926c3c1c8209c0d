//! Policies for container keys the pattern does not account for.

use std::fmt::{self, Display};
use std::str::FromStr;

use crate::error::ConfigError;

/// What to do with a key present on the container but absent from the pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UnexpectedItemBehaviour {
    /// Leave the item untouched.
    Ignore,
    /// Remove the item from the container.
    Delete,
    /// Report an `"Unexpected item"` problem at the item's key.
    #[default]
    Problem,
}

/// What to do with a key the pattern requires but the container lacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MissingItemBehaviour {
    /// Accept the absence; the key stays absent.
    Ignore,
    /// Report a `"No value"` problem at the missing key.
    #[default]
    Problem,
}

impl FromStr for UnexpectedItemBehaviour {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ignore" => Ok(Self::Ignore),
            "delete" => Ok(Self::Delete),
            "problem" => Ok(Self::Problem),
            _ => Err(ConfigError::UnknownBehaviour {
                kind: "unexpected item",
                value: s.to_string(),
                expected: "ignore, delete, problem",
            }),
        }
    }
}

impl FromStr for MissingItemBehaviour {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ignore" => Ok(Self::Ignore),
            "problem" => Ok(Self::Problem),
            _ => Err(ConfigError::UnknownBehaviour {
                kind: "missing item",
                value: s.to_string(),
                expected: "ignore, problem",
            }),
        }
    }
}

impl Display for UnexpectedItemBehaviour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ignore => "ignore",
            Self::Delete => "delete",
            Self::Problem => "problem",
        })
    }
}

impl Display for MissingItemBehaviour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ignore => "ignore",
            Self::Problem => "problem",
        })
    }
}

/// Container schemas whose item policies can be reconfigured.
///
/// Both methods return a new schema; the receiver is consumed.
///
/// # Example
///
/// ```rust
/// use conformer::{HasItemBehaviour, Schema, SchemaExt, SchemaLike, UnexpectedItemBehaviour};
/// use serde_json::json;
///
/// let lenient = Schema::tuple(vec![Schema::eq(1).shared()])
///     .on_unexpected(UnexpectedItemBehaviour::Delete);
///
/// let conformed = lenient.conform(Some(&json!([1, "extra"]))).into_result().unwrap();
/// assert_eq!(conformed, Some(json!([1])));
/// ```
pub trait HasItemBehaviour: Sized {
    fn on_unexpected(self, behaviour: UnexpectedItemBehaviour) -> Self;

    fn on_missing(self, behaviour: MissingItemBehaviour) -> Self;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_behaviours() {
        assert_eq!("ignore".parse::<UnexpectedItemBehaviour>().unwrap(), UnexpectedItemBehaviour::Ignore);
        assert_eq!(" DELETE ".parse::<UnexpectedItemBehaviour>().unwrap(), UnexpectedItemBehaviour::Delete);
        assert_eq!("problem".parse::<MissingItemBehaviour>().unwrap(), MissingItemBehaviour::Problem);
    }

    #[test]
    fn test_parse_rejects_unknown_behaviour() {
        let err = "delete".parse::<MissingItemBehaviour>().unwrap_err();
        assert!(err.to_string().contains("unknown missing item behaviour 'delete'"));

        let err = "drop".parse::<UnexpectedItemBehaviour>().unwrap_err();
        assert!(err.to_string().contains("ignore, delete, problem"));
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for b in [
            UnexpectedItemBehaviour::Ignore,
            UnexpectedItemBehaviour::Delete,
            UnexpectedItemBehaviour::Problem,
        ] {
            assert_eq!(b.to_string().parse::<UnexpectedItemBehaviour>().unwrap(), b);
        }
    }

    #[test]
    fn test_defaults_are_strict() {
        assert_eq!(UnexpectedItemBehaviour::default(), UnexpectedItemBehaviour::Problem);
        assert_eq!(MissingItemBehaviour::default(), MissingItemBehaviour::Problem);
    }
}
