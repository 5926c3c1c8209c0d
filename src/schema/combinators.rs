//! Schema combinators.
//!
//! Every combinator here is built only on the [`SchemaLike`] contract:
//! - [`AndSchema`]: conform with one schema, then feed the result to the next
//! - [`OrSchema`]: the first alternative that conforms wins
//! - [`DeferredSchema`]: builds its schema on every call, for recursive graphs
//! - [`OptionalSchema`]: absence is acceptable inside a container
//! - [`OverrideSchema`]: replaces the problems reported on failure
//! - [`DefaultValueSchema`]: absence is replaced by a default value
//!
//! # Example
//!
//! ```rust
//! use conformer::{Schema, SchemaExt, SchemaLike};
//! use serde_json::json;
//!
//! // Either the literal "auto" or a string of digits.
//! let size = Schema::eq("auto").or(Schema::pattern(r"^\d+$").unwrap());
//!
//! assert!(size.conform(Some(&json!("auto"))).is_success());
//! assert!(size.conform(Some(&json!("42"))).is_success());
//! assert!(size.conform(Some(&json!("big"))).is_failure());
//! ```

use std::sync::Arc;

use serde_json::{json, Value};
use stillwater::Validation;

use crate::error::Problems;

use super::object::ObjectSchema;
use super::traits::{non_empty, Conformed, SchemaLike, SchemaRef};

/// Builder methods available on every schema.
pub trait SchemaExt: SchemaLike + Sized + 'static {
    /// Erases the schema's type so it can sit in patterns and tuples.
    fn shared(self) -> SchemaRef {
        Arc::new(self)
    }

    /// Conforms with `self`, then conforms the result with `next`.
    fn and<S: SchemaLike + 'static>(self, next: S) -> AndSchema {
        AndSchema::new(self, next)
    }

    /// Tries `self`, then `other`.
    fn or<S: SchemaLike + 'static>(self, other: S) -> OrSchema {
        OrSchema::new(vec![self.shared(), other.shared()])
    }

    /// Marks the schema as optional inside containers.
    fn optional(self) -> OptionalSchema {
        OptionalSchema::new(self)
    }

    /// Replaces the failure reported by the schema.
    fn override_with(self, overrides: Overrides) -> OverrideSchema {
        OverrideSchema::new(self, overrides)
    }
}

impl<S: SchemaLike + Sized + 'static> SchemaExt for S {}

/// Sequencing: the output of `first` is the input of `second`.
///
/// If `first` fails, its problems are returned and `second` is not consulted.
#[derive(Clone)]
pub struct AndSchema {
    first: SchemaRef,
    second: SchemaRef,
}

impl AndSchema {
    pub fn new<A, B>(first: A, second: B) -> Self
    where
        A: SchemaLike + 'static,
        B: SchemaLike + 'static,
    {
        Self {
            first: Arc::new(first),
            second: Arc::new(second),
        }
    }
}

impl SchemaLike for AndSchema {
    fn conform(&self, value: Option<&Value>) -> Conformed {
        match self.first.conform(value) {
            Validation::Success(conformed) => self.second.conform(conformed.as_ref()),
            failure => failure,
        }
    }

    fn to_json_schema(&self) -> Option<Value> {
        let first = self.first.to_json_schema()?;
        let second = self.second.to_json_schema()?;
        Some(json!({ "allOf": [first, second] }))
    }
}

/// Alternation: schemas are tried in declaration order.
///
/// The first success is returned. When every alternative fails, the problems
/// of all alternatives are merged in declaration order.
#[derive(Clone)]
pub struct OrSchema {
    schemas: Vec<SchemaRef>,
}

impl OrSchema {
    pub fn new(schemas: Vec<SchemaRef>) -> Self {
        Self { schemas }
    }

    /// Appends another alternative.
    pub fn or<S: SchemaLike + 'static>(mut self, other: S) -> Self {
        self.schemas.push(Arc::new(other));
        self
    }
}

impl SchemaLike for OrSchema {
    fn conform(&self, value: Option<&Value>) -> Conformed {
        let mut problems = Problems::none();

        for schema in &self.schemas {
            match schema.conform(value) {
                Validation::Success(conformed) => return Validation::Success(conformed),
                Validation::Failure(p) => problems = problems.merge(p),
            }
        }

        if problems.is_empty() {
            problems = Problems::failure(format!(
                "value did not match any of {} schemas",
                self.schemas.len()
            ));
        }
        Validation::Failure(problems)
    }

    fn to_json_schema(&self) -> Option<Value> {
        let alternatives = self
            .schemas
            .iter()
            .map(|s| s.to_json_schema())
            .collect::<Option<Vec<_>>>()?;
        Some(json!({ "anyOf": alternatives }))
    }
}

type SchemaFactory = Arc<dyn Fn() -> SchemaRef + Send + Sync>;

/// Builds its schema lazily, on every conform call.
///
/// The factory is never memoized, so a schema may refer to itself without
/// being constructed eagerly and infinitely. Factories must build an
/// equivalent schema every time they are called.
///
/// # Example
///
/// ```rust
/// use conformer::{Pattern, Schema, SchemaExt, SchemaLike, SchemaRef};
/// use serde_json::json;
///
/// fn node() -> SchemaRef {
///     Schema::object(
///         Pattern::new()
///             .item("name", Schema::string())
///             .item("children", Schema::array_of(Schema::defer(node)).optional()),
///     )
///     .shared()
/// }
///
/// let tree = json!({"name": "root", "children": [{"name": "leaf"}]});
/// assert!(node().conform(Some(&tree)).is_success());
/// ```
#[derive(Clone)]
pub struct DeferredSchema {
    factory: SchemaFactory,
}

impl DeferredSchema {
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn() -> SchemaRef + Send + Sync + 'static,
    {
        Self {
            factory: Arc::new(factory),
        }
    }
}

impl SchemaLike for DeferredSchema {
    fn conform(&self, value: Option<&Value>) -> Conformed {
        (self.factory)().conform(value)
    }
}

/// Tags a schema as optional for containers.
///
/// An absent value conforms to "no value" and is not written back; a present
/// value is handed to the inner schema. Outside a container the tag has no
/// further effect.
#[derive(Clone)]
pub struct OptionalSchema {
    inner: SchemaRef,
}

impl OptionalSchema {
    pub fn new<S: SchemaLike + 'static>(inner: S) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }
}

impl SchemaLike for OptionalSchema {
    fn conform(&self, value: Option<&Value>) -> Conformed {
        match value {
            None => Validation::Success(None),
            Some(_) => self.inner.conform(value),
        }
    }

    fn is_optional(&self) -> bool {
        true
    }

    fn as_object(&self) -> Option<&ObjectSchema> {
        self.inner.as_object()
    }

    fn to_json_schema(&self) -> Option<Value> {
        self.inner.to_json_schema()
    }
}

type FailureFn = Arc<dyn Fn(Problems, Option<&Value>) -> Problems + Send + Sync>;

/// How an [`OverrideSchema`] rewrites a failure.
#[derive(Clone)]
pub enum FailureOverride {
    /// Replace all problems with one root problem carrying this message.
    Message(String),
    /// Compute the reported problems from the original ones and the input.
    With(FailureFn),
}

/// Overrides applied by [`OverrideSchema`].
#[derive(Clone, Default)]
pub struct Overrides {
    failure: Option<FailureOverride>,
    json_schema: Option<Value>,
}

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports `message` at the root instead of the inner problems.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(FailureOverride::Message(message.into()));
        self
    }

    /// Rewrites the inner problems with `f`.
    pub fn failure_with<F>(mut self, f: F) -> Self
    where
        F: Fn(Problems, Option<&Value>) -> Problems + Send + Sync + 'static,
    {
        self.failure = Some(FailureOverride::With(Arc::new(f)));
        self
    }

    /// Replaces the JSON-schema fragment.
    pub fn json_schema(mut self, fragment: Value) -> Self {
        self.json_schema = Some(fragment);
        self
    }
}

/// Wraps a schema, rewriting its failures and leaving successes untouched.
///
/// # Example
///
/// ```rust
/// use conformer::{Overrides, Schema, SchemaExt, SchemaLike};
/// use serde_json::json;
///
/// let schema = Schema::eq("yes").override_with(Overrides::new().message("say yes"));
///
/// let problems = schema.conform(Some(&json!("no"))).into_result().unwrap_err();
/// assert_eq!(problems.messages(), vec!["say yes"]);
/// ```
#[derive(Clone)]
pub struct OverrideSchema {
    inner: SchemaRef,
    overrides: Overrides,
}

impl OverrideSchema {
    pub fn new<S: SchemaLike + 'static>(inner: S, overrides: Overrides) -> Self {
        Self {
            inner: Arc::new(inner),
            overrides,
        }
    }
}

impl SchemaLike for OverrideSchema {
    fn conform(&self, value: Option<&Value>) -> Conformed {
        match (self.inner.conform(value), &self.overrides.failure) {
            (Validation::Failure(_), Some(FailureOverride::Message(message))) => {
                Validation::Failure(Problems::failure(message.clone()))
            }
            (Validation::Failure(problems), Some(FailureOverride::With(f))) => {
                Validation::Failure(non_empty(f(problems, value)))
            }
            (result, _) => result,
        }
    }

    fn is_optional(&self) -> bool {
        self.inner.is_optional()
    }

    fn to_json_schema(&self) -> Option<Value> {
        self.overrides
            .json_schema
            .clone()
            .or_else(|| self.inner.to_json_schema())
    }
}

type DefaultFn = Arc<dyn Fn() -> Value + Send + Sync>;

/// Substitutes a default for an absent value, then conforms it.
#[derive(Clone)]
pub struct DefaultValueSchema {
    default: DefaultFn,
    inner: SchemaRef,
}

impl DefaultValueSchema {
    pub fn new<F, S>(default: F, inner: S) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
        S: SchemaLike + 'static,
    {
        Self {
            default: Arc::new(default),
            inner: Arc::new(inner),
        }
    }
}

impl SchemaLike for DefaultValueSchema {
    fn conform(&self, value: Option<&Value>) -> Conformed {
        match value {
            Some(_) => self.inner.conform(value),
            None => self.inner.conform(Some(&(self.default)())),
        }
    }

    fn to_json_schema(&self) -> Option<Value> {
        let mut fragment = self.inner.to_json_schema()?;
        if let Value::Object(map) = &mut fragment {
            map.insert("default".to_string(), (self.default)());
        }
        Some(fragment)
    }
}
