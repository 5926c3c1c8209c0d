//! Object schemas.
//!
//! [`ObjectSchema`] conforms JSON objects against a fixed set of keys using the
//! associative engine. [`ObjOfSchema`] conforms every value of an object
//! against a single schema.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{json, Map, Value};
use stillwater::Validation;

use crate::behaviour::{HasItemBehaviour, MissingItemBehaviour, UnexpectedItemBehaviour};
use crate::error::Problems;

use super::associative::conform_in_place;
use super::combinators::{OptionalSchema, OrSchema};
use super::leaf::EqualsSchema;
use super::pattern::{schematize, Pattern, Strictness};
use super::traits::{failure, type_description, Conformed, SchemaLike, SchemaRef};

/// A schema for JSON objects with a known set of keys.
///
/// Keys are conformed in declaration order. By default every declared key is
/// required and undeclared keys are reported; both policies can be changed
/// through [`HasItemBehaviour`]. All problems are accumulated rather than
/// short-circuiting on the first failure.
///
/// # Example
///
/// ```rust
/// use conformer::{HasItemBehaviour, Pattern, Schema, SchemaLike, UnexpectedItemBehaviour};
/// use serde_json::json;
///
/// let schema = Schema::object(
///     Pattern::new()
///         .item("name", Schema::string())
///         .item("age", Schema::number()),
/// )
/// .on_unexpected(UnexpectedItemBehaviour::Delete);
///
/// let result = schema.conform(Some(&json!({"name": "Alice", "age": 30, "admin": true})));
/// assert_eq!(
///     result.into_result().unwrap(),
///     Some(json!({"name": "Alice", "age": 30}))
/// );
/// ```
#[derive(Clone)]
pub struct ObjectSchema {
    fields: IndexMap<String, SchemaRef>,
    unexpected: UnexpectedItemBehaviour,
    missing: MissingItemBehaviour,
    type_error_message: Option<String>,
}

impl ObjectSchema {
    /// Creates a strict object schema from `pattern`.
    ///
    /// Nested patterns become strict object schemas too.
    pub fn new(pattern: Pattern) -> Self {
        Self::with_strictness(&pattern, Strictness::STRICT)
    }

    /// Creates an object schema in which every key, at every nesting level of
    /// the pattern, may be omitted and undeclared keys are ignored.
    pub fn deep_partial(pattern: Pattern) -> Self {
        Self::with_strictness(&pattern, Strictness::PARTIAL)
    }

    pub(crate) fn with_strictness(pattern: &Pattern, strictness: Strictness) -> Self {
        Self {
            fields: schematize(pattern, strictness),
            unexpected: strictness.unexpected,
            missing: strictness.missing,
            type_error_message: None,
        }
    }

    /// Adds (or replaces) a required key.
    pub fn field<S>(mut self, name: impl Into<String>, schema: S) -> Self
    where
        S: SchemaLike + 'static,
    {
        self.fields.insert(name.into(), Arc::new(schema));
        self
    }

    /// Adds (or replaces) a key that may be omitted.
    pub fn optional_field<S>(self, name: impl Into<String>, schema: S) -> Self
    where
        S: SchemaLike + 'static,
    {
        self.field(name, OptionalSchema::new(schema))
    }

    /// Sets the message reported when the input is not an object.
    ///
    /// # Example
    ///
    /// ```rust
    /// use conformer::{Pattern, Schema, SchemaLike};
    /// use serde_json::json;
    ///
    /// let schema = Schema::object(Pattern::new()).error("must be a user object");
    ///
    /// let problems = schema.conform(Some(&json!("alice"))).into_result().unwrap_err();
    /// assert_eq!(problems.messages(), vec!["must be a user object"]);
    /// ```
    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.type_error_message = Some(message.into());
        self
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &SchemaRef)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.keys().map(String::as_str).collect()
    }

    /// The schema declared for `name`.
    pub fn field_schema(&self, name: &str) -> Option<&SchemaRef> {
        self.fields.get(name)
    }

    pub fn unexpected_behaviour(&self) -> UnexpectedItemBehaviour {
        self.unexpected
    }

    pub fn missing_behaviour(&self) -> MissingItemBehaviour {
        self.missing
    }

    /// Conforms `target` in place.
    ///
    /// On success `target` holds the conformed object. On failure it may be
    /// partially rewritten.
    pub fn conform_in_place(&self, target: &mut Map<String, Value>) -> Validation<(), Problems> {
        conform_in_place(
            self.unexpected,
            self.missing,
            target,
            self.fields.iter().map(|(k, s)| (k.clone(), s)),
        )
    }

    /// The same keys, each of which may be omitted.
    ///
    /// Only this level is affected; nested object schemas keep their own
    /// policies.
    pub fn partial(&self) -> Self {
        self.clone().on_missing(MissingItemBehaviour::Ignore)
    }

    /// The same keys, each of which also accepts `null`.
    ///
    /// Fields whose schema is an object schema, directly or behind
    /// [`OptionalSchema`], are made nullable as well. The result is strict
    /// about missing and unexpected keys.
    pub fn deep_nullable(&self) -> Self {
        let fields = self
            .fields
            .iter()
            .map(|(name, schema)| (name.clone(), nullable(schema)))
            .collect();

        Self {
            fields,
            unexpected: UnexpectedItemBehaviour::Problem,
            missing: MissingItemBehaviour::Problem,
            type_error_message: self.type_error_message.clone(),
        }
    }

    fn type_error(&self, value: Option<&Value>) -> Conformed {
        match &self.type_error_message {
            Some(message) => failure(message.clone()),
            None => failure(format!("expected an object but got {}", type_description(value))),
        }
    }
}

fn nullable(schema: &SchemaRef) -> SchemaRef {
    let inner = match schema.as_object() {
        Some(object) => Arc::new(object.deep_nullable()) as SchemaRef,
        None => Arc::clone(schema),
    };
    let either = OrSchema::new(vec![inner, Arc::new(EqualsSchema::new(Value::Null))]);

    if schema.is_optional() {
        Arc::new(OptionalSchema::new(either))
    } else {
        Arc::new(either)
    }
}

impl fmt::Debug for ObjectSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectSchema")
            .field("fields", &self.field_names())
            .field("unexpected", &self.unexpected)
            .field("missing", &self.missing)
            .finish()
    }
}

impl Default for ObjectSchema {
    fn default() -> Self {
        Self::new(Pattern::new())
    }
}

impl SchemaLike for ObjectSchema {
    fn conform(&self, value: Option<&Value>) -> Conformed {
        let Some(Value::Object(object)) = value else {
            return self.type_error(value);
        };

        let mut conformed = object.clone();
        self.conform_in_place(&mut conformed)
            .map(|()| Some(Value::Object(conformed)))
    }

    fn as_object(&self) -> Option<&ObjectSchema> {
        Some(self)
    }

    fn to_json_schema(&self) -> Option<Value> {
        let properties: Map<String, Value> = self
            .fields
            .iter()
            .map(|(name, schema)| (name.clone(), schema.to_json_schema().unwrap_or(json!({}))))
            .collect();
        let required: Vec<&str> = self
            .fields
            .iter()
            .filter(|(_, schema)| {
                self.missing == MissingItemBehaviour::Problem && !schema.is_optional()
            })
            .map(|(name, _)| name.as_str())
            .collect();

        Some(json!({
            "type": "object",
            "properties": properties,
            "required": required,
            "additionalProperties": self.unexpected != UnexpectedItemBehaviour::Problem,
        }))
    }
}

impl HasItemBehaviour for ObjectSchema {
    fn on_unexpected(mut self, behaviour: UnexpectedItemBehaviour) -> Self {
        self.unexpected = behaviour;
        self
    }

    fn on_missing(mut self, behaviour: MissingItemBehaviour) -> Self {
        self.missing = behaviour;
        self
    }
}

/// A schema for objects whose every value conforms to one schema.
///
/// # Example
///
/// ```rust
/// use conformer::{Schema, SchemaLike};
/// use serde_json::json;
///
/// let scores = Schema::obj_of(Schema::number());
///
/// assert!(scores.conform(Some(&json!({"ada": 3, "alan": 5}))).is_success());
///
/// let problems = scores.conform(Some(&json!({"ada": "three"}))).into_result().unwrap_err();
/// assert_eq!(problems.first().unwrap().path.to_string(), "ada");
/// ```
#[derive(Clone)]
pub struct ObjOfSchema {
    values: SchemaRef,
}

impl ObjOfSchema {
    pub fn new<S: SchemaLike + 'static>(values: S) -> Self {
        Self {
            values: Arc::new(values),
        }
    }

    pub fn conform_in_place(&self, target: &mut Map<String, Value>) -> Validation<(), Problems> {
        let keys: Vec<String> = target.keys().cloned().collect();
        conform_in_place(
            UnexpectedItemBehaviour::Problem,
            MissingItemBehaviour::Problem,
            target,
            keys.into_iter().map(|k| (k, &self.values)),
        )
    }
}

impl SchemaLike for ObjOfSchema {
    fn conform(&self, value: Option<&Value>) -> Conformed {
        let Some(Value::Object(object)) = value else {
            return failure(format!("expected an object but got {}", type_description(value)));
        };

        let mut conformed = object.clone();
        self.conform_in_place(&mut conformed)
            .map(|()| Some(Value::Object(conformed)))
    }

    fn to_json_schema(&self) -> Option<Value> {
        let values = self.values.to_json_schema().unwrap_or(json!({}));
        Some(json!({ "type": "object", "additionalProperties": values }))
    }
}
