//! The schema contract.
//!
//! Every validator, leaf or combinator, implements [`SchemaLike`]. Combinators
//! hold other schemas only as [`SchemaRef`] trait objects and never inspect
//! their concrete type; the few introspection hooks on the trait
//! (`is_optional`, `equals_literal`, `as_object`) are the only way a container
//! or the discriminator detector learns anything about a schema.

use std::sync::Arc;

use serde_json::{Number, Value};
use stillwater::Validation;

use crate::error::Problems;
use crate::schema::ObjectSchema;

/// The result of conforming a value.
///
/// `Success(None)` is the "no value" result: the schema accepted an absent
/// input and produced nothing to write back.
pub type Conformed = Validation<Option<Value>, Problems>;

/// A shared, type-erased schema.
pub type SchemaRef = Arc<dyn SchemaLike>;

/// A schema that can conform JSON values.
///
/// `conform` receives `None` when the value is absent (a missing object key or
/// a tuple position past the end of the input). It returns the conformed value
/// or the problems found; ordinary data mismatches never panic.
///
/// The `Send + Sync` bounds allow schemas to be built once and shared across
/// threads.
///
/// # Example
///
/// ```rust
/// use conformer::{Schema, SchemaLike};
/// use serde_json::json;
///
/// let schema = Schema::eq("valid");
///
/// assert!(schema.conform(Some(&json!("valid"))).is_success());
/// assert!(schema.conform(Some(&json!("other"))).is_failure());
/// assert!(schema.conform(None).is_failure());
/// ```
pub trait SchemaLike: Send + Sync {
    /// Validates and optionally coerces `value`.
    fn conform(&self, value: Option<&Value>) -> Conformed;

    /// Whether a container may omit the item this schema describes.
    ///
    /// Only the associative engine reads this.
    fn is_optional(&self) -> bool {
        false
    }

    /// The primitive literal this schema compares against with plain
    /// equality, if it is such a schema.
    ///
    /// Discriminator detection uses this to find fields that identify a shape.
    fn equals_literal(&self) -> Option<&Value> {
        None
    }

    /// The object schema behind this schema, if it is one.
    fn as_object(&self) -> Option<&ObjectSchema> {
        None
    }

    /// A JSON-schema fragment describing this schema, for documentation.
    fn to_json_schema(&self) -> Option<Value> {
        None
    }
}

impl<S: SchemaLike + ?Sized> SchemaLike for Arc<S> {
    fn conform(&self, value: Option<&Value>) -> Conformed {
        (**self).conform(value)
    }

    fn is_optional(&self) -> bool {
        (**self).is_optional()
    }

    fn equals_literal(&self) -> Option<&Value> {
        (**self).equals_literal()
    }

    fn as_object(&self) -> Option<&ObjectSchema> {
        (**self).as_object()
    }

    fn to_json_schema(&self) -> Option<Value> {
        (**self).to_json_schema()
    }
}

impl<S: SchemaLike + ?Sized> SchemaLike for Box<S> {
    fn conform(&self, value: Option<&Value>) -> Conformed {
        (**self).conform(value)
    }

    fn is_optional(&self) -> bool {
        (**self).is_optional()
    }

    fn equals_literal(&self) -> Option<&Value> {
        (**self).equals_literal()
    }

    fn as_object(&self) -> Option<&ObjectSchema> {
        (**self).as_object()
    }

    fn to_json_schema(&self) -> Option<Value> {
        (**self).to_json_schema()
    }
}

/// Returns a failed [`Conformed`] with one problem at the root.
pub fn failure(message: impl Into<String>) -> Conformed {
    Validation::Failure(Problems::failure(message))
}

/// Substitutes a root problem for an empty failure, so that a failed conform
/// always reports something.
pub(crate) fn non_empty(problems: Problems) -> Problems {
    if problems.is_empty() {
        Problems::failure("value did not conform")
    } else {
        problems
    }
}

/// Describes a value for use in problem messages, e.g. `number: 2`.
pub fn type_description(value: Option<&Value>) -> String {
    match value {
        None => "no value".to_string(),
        Some(Value::Null) => "null".to_string(),
        Some(Value::Bool(b)) => format!("boolean: {}", b),
        Some(Value::Number(n)) => format!("number: {}", n),
        Some(Value::String(s)) => format!("string: {:?}", s),
        Some(Value::Array(items)) => format!("array of length {}", items.len()),
        Some(Value::Object(_)) => "object".to_string(),
    }
}

/// JSON equality: numbers compare by value, so `1` and `1.0` are equal.
///
/// `serde_json`'s own `==` tells integers and floats apart.
pub fn literal_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => number_eq(x, y),
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| literal_eq(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(key, x)| ys.get(key).is_some_and(|y| literal_eq(x, y)))
        }
        _ => a == b,
    }
}

fn number_eq(x: &Number, y: &Number) -> bool {
    if let (Some(x), Some(y)) = (x.as_i64(), y.as_i64()) {
        return x == y;
    }
    if let (Some(x), Some(y)) = (x.as_u64(), y.as_u64()) {
        return x == y;
    }
    match (x.as_f64(), y.as_f64()) {
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}

/// Whether `value` is a string, number or boolean.
pub(crate) fn is_primitive(value: &Value) -> bool {
    matches!(value, Value::String(_) | Value::Number(_) | Value::Bool(_))
}
