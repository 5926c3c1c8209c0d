//! # Conformer
//!
//! Conform untyped JSON data to an expected shape, or report every way it
//! failed to match.
//!
//! ## Overview
//!
//! A schema conforms a value: it checks it, possibly rewrites it, and returns
//! either the conformed value or a [`Problems`] report. Problems are
//! accumulated rather than short-circuiting on the first failure, and each one
//! carries the [`JsonPath`] of the item it concerns. Accumulation is built on
//! stillwater's `Validation` type.
//!
//! ## Core Types
//!
//! - [`SchemaLike`]: the contract every schema implements
//! - [`Schema`]: constructors for leaves, combinators and container schemas
//! - [`Pattern`]: the keys an object schema expects
//! - [`conform_in_place`]: the engine behind object, tuple, map and array schemas
//! - [`ShapeRegistry`]: named object schemas for discriminated unions
//! - [`detect_discriminator`]: finds the field that tells shapes apart
//!
//! ## Example
//!
//! ```rust
//! use conformer::{JsonPath, Pattern, Schema, SchemaExt, SchemaLike};
//! use serde_json::json;
//!
//! let user = Schema::object(
//!     Pattern::new()
//!         .item("name", Schema::string())
//!         .item("role", Schema::eq("admin").or(Schema::eq("member"))),
//! );
//!
//! let result = user.conform(Some(&json!({"name": "Alice", "role": "guest", "age": 3})));
//!
//! let problems = result.into_result().unwrap_err();
//! assert_eq!(problems.len(), 3);
//! assert_eq!(problems.at_path(&JsonPath::from_key("age")).len(), 1);
//! ```

pub mod behaviour;
pub mod discriminator;
pub mod error;
pub mod path;
pub mod registry;
pub mod schema;

use serde::de::DeserializeOwned;
use serde_json::Value;

pub use behaviour::{HasItemBehaviour, MissingItemBehaviour, UnexpectedItemBehaviour};
pub use discriminator::{
    detect_discriminator, discriminator_report, DiscriminatorError, DiscriminatorField,
    DiscriminatorReport, RejectedField,
};
pub use error::{ConfigError, Problem, Problems, ValidationError};
pub use path::{JsonPath, PathSegment};
pub use registry::{RegistryError, ShapeRegistry};
pub use schema::{
    conform_in_place, literal_eq, AndSchema, ArrayOfSchema, Associative, ConditionalSchema,
    Conformed, DefaultValueSchema, DeferredSchema, DiscriminatedUnionSchema, EqualsSchema,
    FailureMessage, FailureOverride, FnSchema, InSchema, LookupSchema, MapEntries, MapSchema,
    ObjOfSchema, ObjectSchema, OptionalSchema, OrSchema, OverrideSchema, Overrides, Pattern,
    PatternItem, PredicateSchema, RegexSchema, Schema, SchemaExt, SchemaLike, SchemaRef,
    SelectSchema, SetOfSchema, TupleSchema, TupleSlots, UniqueSchema,
};

/// Type alias for validation results using Problems
pub type ValidationResult<T> = stillwater::Validation<T, Problems>;

/// Conforms `value` with `schema` and deserializes the result into `T`.
///
/// # Errors
///
/// Returns `ValidationError::Invalid` with the problems found if the value
/// does not conform, or `ValidationError::Deserialize` if the conformed value
/// does not fit `T`.
///
/// # Example
///
/// ```rust
/// use conformer::{validate, Pattern, Schema};
/// use serde_json::json;
///
/// #[derive(Debug, serde::Deserialize)]
/// struct Point {
///     x: f64,
///     y: f64,
/// }
///
/// let schema = Schema::object(Pattern::new().item("x", Schema::number()).item("y", Schema::number()));
///
/// let point: Point = validate(&schema, &json!({"x": 1, "y": 2.5})).unwrap();
/// assert_eq!(point.y, 2.5);
///
/// let err = validate::<Point, _>(&schema, &json!({"x": 1})).unwrap_err();
/// assert_eq!(err.problems().unwrap().len(), 1);
/// ```
pub fn validate<T, S>(schema: &S, value: &Value) -> Result<T, ValidationError>
where
    T: DeserializeOwned,
    S: SchemaLike + ?Sized,
{
    let conformed = schema.conform(Some(value)).into_result()?;
    Ok(serde_json::from_value(conformed.unwrap_or(Value::Null))?)
}
