//! Leaf schemas.
//!
//! Equality is the leaf the core leans on: pattern literals become
//! [`EqualsSchema`], and discriminator detection looks for it. The rest are
//! small building blocks for callers and tests: function-backed schemas,
//! predicates, regex matching and the basic JSON type checks.

use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde_json::{json, Value};
use stillwater::Validation;

use crate::error::{ConfigError, Problems};

use super::traits::{failure, literal_eq, non_empty, type_description, Conformed, SchemaLike};

/// Accepts only values equal to `expected`.
///
/// Numbers compare by value, so `Schema::eq(1)` accepts `1.0`.
///
/// # Example
///
/// ```rust
/// use conformer::{Schema, SchemaLike};
/// use serde_json::json;
///
/// let problems = Schema::eq(1).conform(Some(&json!(2))).into_result().unwrap_err();
/// assert_eq!(problems.first().unwrap().message, "expected 1 but got number: 2");
/// ```
#[derive(Debug, Clone)]
pub struct EqualsSchema {
    expected: Value,
}

impl EqualsSchema {
    pub fn new(expected: impl Into<Value>) -> Self {
        Self {
            expected: expected.into(),
        }
    }

    pub fn expected(&self) -> &Value {
        &self.expected
    }
}

impl SchemaLike for EqualsSchema {
    fn conform(&self, value: Option<&Value>) -> Conformed {
        match value {
            Some(v) if literal_eq(v, &self.expected) => Validation::Success(Some(v.clone())),
            other => failure(format!(
                "expected {} but got {}",
                self.expected,
                type_description(other)
            )),
        }
    }

    fn equals_literal(&self) -> Option<&Value> {
        Some(&self.expected)
    }

    fn to_json_schema(&self) -> Option<Value> {
        Some(json!({ "const": self.expected }))
    }
}

type ConformFn = Arc<dyn Fn(Option<&Value>) -> Conformed + Send + Sync>;

/// A schema backed by a conform function.
#[derive(Clone)]
pub struct FnSchema {
    conform: ConformFn,
}

impl FnSchema {
    pub fn new<F>(conform: F) -> Self
    where
        F: Fn(Option<&Value>) -> Conformed + Send + Sync + 'static,
    {
        Self {
            conform: Arc::new(conform),
        }
    }
}

impl SchemaLike for FnSchema {
    fn conform(&self, value: Option<&Value>) -> Conformed {
        match (self.conform)(value) {
            Validation::Failure(problems) => Validation::Failure(non_empty(problems)),
            success => success,
        }
    }
}

impl fmt::Debug for FnSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnSchema")
    }
}

/// The message a [`PredicateSchema`] reports when its predicate rejects a value.
#[derive(Clone, Default)]
pub enum FailureMessage {
    /// `value did not satisfy predicate`.
    #[default]
    Default,
    /// A fixed message.
    Static(String),
    /// A message computed from the rejected value.
    Dynamic(Arc<dyn Fn(&Value) -> String + Send + Sync>),
}

impl FailureMessage {
    pub fn dynamic<F>(message: F) -> Self
    where
        F: Fn(&Value) -> String + Send + Sync + 'static,
    {
        FailureMessage::Dynamic(Arc::new(message))
    }

    fn render(&self, value: &Value) -> String {
        match self {
            FailureMessage::Default => "value did not satisfy predicate".to_string(),
            FailureMessage::Static(message) => message.clone(),
            FailureMessage::Dynamic(message) => message(value),
        }
    }
}

impl From<&str> for FailureMessage {
    fn from(message: &str) -> Self {
        FailureMessage::Static(message.to_string())
    }
}

impl From<String> for FailureMessage {
    fn from(message: String) -> Self {
        FailureMessage::Static(message)
    }
}

type PredicateFn = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// Passes values through unchanged when `predicate` holds.
///
/// Absent values fail with `No value`.
#[derive(Clone)]
pub struct PredicateSchema {
    predicate: PredicateFn,
    message: FailureMessage,
}

impl PredicateSchema {
    pub fn new<F>(predicate: F, message: impl Into<FailureMessage>) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Arc::new(predicate),
            message: message.into(),
        }
    }
}

impl SchemaLike for PredicateSchema {
    fn conform(&self, value: Option<&Value>) -> Conformed {
        match value {
            Some(v) if (self.predicate)(v) => Validation::Success(Some(v.clone())),
            Some(v) => failure(self.message.render(v)),
            None => failure("No value"),
        }
    }
}

/// Accepts strings matching a regular expression.
#[derive(Debug, Clone)]
pub struct RegexSchema {
    regex: Regex,
}

impl RegexSchema {
    pub fn new(regex: Regex) -> Self {
        Self { regex }
    }

    /// Compiles `pattern`, reporting an invalid expression as a configuration
    /// error.
    pub fn parse(pattern: &str) -> Result<Self, ConfigError> {
        Ok(Self::new(Regex::new(pattern)?))
    }
}

impl SchemaLike for RegexSchema {
    fn conform(&self, value: Option<&Value>) -> Conformed {
        match value {
            Some(Value::String(s)) if self.regex.is_match(s) => {
                Validation::Success(Some(Value::String(s.clone())))
            }
            Some(Value::String(s)) => failure(format!(
                "expected a string matching /{}/ but got {:?}",
                self.regex.as_str(),
                s
            )),
            other => failure(format!(
                "expected a string but got {}",
                type_description(other)
            )),
        }
    }

    fn to_json_schema(&self) -> Option<Value> {
        Some(json!({ "type": "string", "pattern": self.regex.as_str() }))
    }
}

/// Accepts anything, including absence.
pub(crate) fn any() -> FnSchema {
    FnSchema::new(|value| Validation::Success(value.cloned()))
}

/// Always fails with `problems`, or with a root problem when `problems` is
/// empty.
pub(crate) fn fail(problems: Problems) -> FnSchema {
    FnSchema::new(move |_| Validation::Failure(problems.clone()))
}

pub(crate) fn type_check(
    expected: &'static str,
    check: fn(&Value) -> bool,
) -> PredicateSchema {
    PredicateSchema::new(
        check,
        FailureMessage::dynamic(move |v| {
            format!("expected {} but got {}", expected, type_description(Some(v)))
        }),
    )
}
