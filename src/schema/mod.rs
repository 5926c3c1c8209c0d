//! Schema definitions.
//!
//! Every schema implements [`SchemaLike`]. Leaves check a single value;
//! combinators build new schemas out of existing ones; container schemas
//! (object, tuple, map, array) run the associative engine over their items.
//! The [`Schema`] struct gathers the constructors in one place.
//!
//! # Example
//!
//! ```rust
//! use conformer::{Pattern, Schema, SchemaLike};
//! use serde_json::json;
//!
//! let schema = Schema::object(
//!     Pattern::new()
//!         .item("name", Schema::string())
//!         .item("tags", Schema::array_of(Schema::string())),
//! );
//!
//! let result = schema.conform(Some(&json!({"name": "x", "tags": ["a"]})));
//! assert!(result.is_success());
//! ```

mod array;
mod associative;
mod choice;
mod combinators;
mod conditional;
mod discriminated;
mod leaf;
mod map;
mod object;
mod pattern;
mod select;
mod traits;
mod tuple;
mod unique;

pub use array::ArrayOfSchema;
pub use associative::{conform_in_place, Associative, MapEntries, TupleSlots};
pub use choice::{InSchema, LookupSchema};
pub use combinators::{
    AndSchema, DefaultValueSchema, DeferredSchema, FailureOverride, OptionalSchema, OrSchema,
    OverrideSchema, Overrides, SchemaExt,
};
pub use conditional::ConditionalSchema;
pub use discriminated::DiscriminatedUnionSchema;
pub use leaf::{EqualsSchema, FailureMessage, FnSchema, PredicateSchema, RegexSchema};
pub use map::MapSchema;
pub use object::{ObjOfSchema, ObjectSchema};
pub use pattern::{Pattern, PatternItem};
pub use select::SelectSchema;
pub use traits::{failure, literal_eq, type_description, Conformed, SchemaLike, SchemaRef};
pub use tuple::TupleSchema;
pub use unique::{SetOfSchema, UniqueSchema};

pub(crate) use traits::is_primitive;

use regex::Regex;
use serde_json::Value;

use crate::discriminator::DiscriminatorError;
use crate::error::{ConfigError, Problems};
use crate::registry::{RegistryError, ShapeRegistry};

/// Entry point for creating schemas.
///
/// # Example
///
/// ```rust
/// use conformer::{Schema, SchemaExt, SchemaLike};
/// use serde_json::json;
///
/// let port = Schema::number().and(Schema::predicate(
///     |v| v.as_u64().is_some_and(|n| n <= 65535),
///     "port out of range",
/// ));
///
/// assert!(port.conform(Some(&json!(8080))).is_success());
/// assert!(port.conform(Some(&json!(70000))).is_failure());
/// ```
pub struct Schema;

impl Schema {
    /// Accepts only values equal to `expected`.
    pub fn eq(expected: impl Into<Value>) -> EqualsSchema {
        EqualsSchema::new(expected)
    }

    /// Accepts anything, including absence.
    pub fn any() -> FnSchema {
        leaf::any()
    }

    /// Accepts values equal to one of `values`.
    pub fn is_in(values: Vec<Value>) -> InSchema {
        InSchema::new(values)
    }

    /// Conforms each name of `table` to the value stored under it.
    pub fn lookup<I, K, V>(table: I) -> LookupSchema
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        LookupSchema::new(table)
    }

    /// Like [`Schema::lookup`], ignoring names that read as numbers.
    ///
    /// # Example
    ///
    /// ```rust
    /// use conformer::{Schema, SchemaLike};
    /// use serde_json::json;
    ///
    /// let direction = json!({"Up": 0, "Down": 1, "0": "Up", "1": "Down"});
    /// let table = direction.as_object().unwrap().clone();
    ///
    /// let key = Schema::enum_key(table.clone());
    /// assert_eq!(key.conform(Some(&json!("Down"))).into_result().unwrap(), Some(json!(1)));
    /// assert!(key.conform(Some(&json!("1"))).is_failure());
    ///
    /// let value = Schema::enum_value(table);
    /// assert!(value.conform(Some(&json!(0))).is_success());
    /// assert!(value.conform(Some(&json!("Up"))).is_failure());
    /// ```
    pub fn enum_key<I, K, V>(table: I) -> LookupSchema
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        LookupSchema::new(table).named_only()
    }

    /// Accepts the values of `table` stored under names that do not read as
    /// numbers.
    pub fn enum_value<I, K, V>(table: I) -> InSchema
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        LookupSchema::new(table).named_only().values()
    }

    /// Accepts only `null`.
    pub fn null() -> EqualsSchema {
        EqualsSchema::new(Value::Null)
    }

    /// Always fails with `problems`.
    pub fn fail(problems: Problems) -> FnSchema {
        leaf::fail(problems)
    }

    /// A schema backed by a conform function.
    ///
    /// # Example
    ///
    /// ```rust
    /// use conformer::{Problems, Schema, SchemaLike};
    /// use serde_json::{json, Value};
    /// use stillwater::Validation;
    ///
    /// let trimmed = Schema::from_fn(|value| match value.and_then(Value::as_str) {
    ///     Some(s) => Validation::Success(Some(json!(s.trim()))),
    ///     None => Validation::Failure(Problems::failure("expected a string")),
    /// });
    ///
    /// assert_eq!(trimmed.conform(Some(&json!("  hi "))).into_result().unwrap(), Some(json!("hi")));
    /// ```
    pub fn from_fn<F>(conform: F) -> FnSchema
    where
        F: Fn(Option<&Value>) -> Conformed + Send + Sync + 'static,
    {
        FnSchema::new(conform)
    }

    /// Passes values for which `predicate` holds.
    pub fn predicate<F>(predicate: F, message: impl Into<FailureMessage>) -> PredicateSchema
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        PredicateSchema::new(predicate, message)
    }

    pub fn string() -> PredicateSchema {
        leaf::type_check("a string", Value::is_string)
    }

    pub fn number() -> PredicateSchema {
        leaf::type_check("a number", Value::is_number)
    }

    pub fn boolean() -> PredicateSchema {
        leaf::type_check("a boolean", Value::is_boolean)
    }

    /// Strings matching `pattern`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Regex` if `pattern` does not compile.
    pub fn pattern(pattern: &str) -> Result<RegexSchema, ConfigError> {
        RegexSchema::parse(pattern)
    }

    /// Strings matching a compiled regex.
    pub fn matches(regex: Regex) -> RegexSchema {
        RegexSchema::new(regex)
    }

    /// Objects matching `pattern`; every key is required.
    pub fn object(pattern: Pattern) -> ObjectSchema {
        ObjectSchema::new(pattern)
    }

    /// Objects matching `pattern`; every key, at every level, may be omitted.
    pub fn deep_partial(pattern: Pattern) -> ObjectSchema {
        ObjectSchema::deep_partial(pattern)
    }

    /// Arrays with one schema per position.
    pub fn tuple(items: Vec<SchemaRef>) -> TupleSchema {
        TupleSchema::new(items)
    }

    /// Maps with arbitrary JSON keys; declare entries with [`MapSchema::entry`].
    pub fn map() -> MapSchema {
        MapSchema::new()
    }

    /// Arrays whose every item conforms to `items`.
    pub fn array_of<S: SchemaLike + 'static>(items: S) -> ArrayOfSchema {
        ArrayOfSchema::new(items)
    }

    /// Arrays of distinct items, each conforming to `items`.
    pub fn set_of<S: SchemaLike + 'static>(items: S) -> SetOfSchema {
        SetOfSchema::new(items)
    }

    /// Arrays without repeated items.
    pub fn unique() -> UniqueSchema {
        UniqueSchema::new()
    }

    /// Arrays in which no two items have the same `key`.
    pub fn unique_by<F>(key: F) -> UniqueSchema
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        UniqueSchema::by(key)
    }

    /// Conforms the value at `path` inside nested objects and returns it.
    pub fn select<S: SchemaLike + 'static>(path: &[&str], schema: S) -> SelectSchema {
        SelectSchema::new(path, schema)
    }

    /// Routes input to the schema of the first case it matches; add cases
    /// with [`ConditionalSchema::case`].
    pub fn conditional() -> ConditionalSchema {
        ConditionalSchema::new()
    }

    /// Objects whose every value conforms to `values`.
    pub fn obj_of<S: SchemaLike + 'static>(values: S) -> ObjOfSchema {
        ObjOfSchema::new(values)
    }

    pub fn optional<S: SchemaLike + 'static>(schema: S) -> OptionalSchema {
        OptionalSchema::new(schema)
    }

    /// A schema built by `factory` on every conform call.
    pub fn defer<F>(factory: F) -> DeferredSchema
    where
        F: Fn() -> SchemaRef + Send + Sync + 'static,
    {
        DeferredSchema::new(factory)
    }

    pub fn and<A, B>(first: A, second: B) -> AndSchema
    where
        A: SchemaLike + 'static,
        B: SchemaLike + 'static,
    {
        AndSchema::new(first, second)
    }

    pub fn or(schemas: Vec<SchemaRef>) -> OrSchema {
        OrSchema::new(schemas)
    }

    pub fn override_with<S: SchemaLike + 'static>(schema: S, overrides: Overrides) -> OverrideSchema {
        OverrideSchema::new(schema, overrides)
    }

    /// Substitutes `default()` for an absent value.
    pub fn default_value<F, S>(default: F, schema: S) -> DefaultValueSchema
    where
        F: Fn() -> Value + Send + Sync + 'static,
        S: SchemaLike + 'static,
    {
        DefaultValueSchema::new(default, schema)
    }

    /// A union over registered shapes, routed by the detected discriminator.
    pub fn discriminated(
        registry: &ShapeRegistry,
        shapes: &[&str],
    ) -> Result<DiscriminatedUnionSchema, DiscriminatorError> {
        DiscriminatedUnionSchema::new(registry, shapes)
    }

    /// A union over registered shapes, routed by `field`.
    pub fn discriminated_by(
        registry: &ShapeRegistry,
        shapes: &[&str],
        field: &str,
    ) -> Result<DiscriminatedUnionSchema, DiscriminatorError> {
        DiscriminatedUnionSchema::by(registry, shapes, field)
    }

    /// A copy of the registered shape `name`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use conformer::{HasItemBehaviour, Pattern, Schema, SchemaLike, ShapeRegistry, UnexpectedItemBehaviour};
    /// use serde_json::json;
    ///
    /// let registry = ShapeRegistry::new();
    /// registry.register("Point", Schema::object(Pattern::new().item("x", Schema::number()))).unwrap();
    ///
    /// let lenient = Schema::shape(&registry, "Point").unwrap().on_unexpected(UnexpectedItemBehaviour::Ignore);
    /// assert!(lenient.conform(Some(&json!({"x": 1, "y": 2}))).is_success());
    /// ```
    pub fn shape(registry: &ShapeRegistry, name: &str) -> Result<ObjectSchema, RegistryError> {
        Ok(registry.resolve(name)?.as_ref().clone())
    }
}
