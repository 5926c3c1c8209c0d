//! Patterns describing the expected shape of an object.
//!
//! A [`Pattern`] maps each key to a schema, a nested pattern, or a literal
//! value that stands for an equality schema. Patterns are turned into per-key
//! schemas ("schematized") when an object schema is built from them.

use std::sync::Arc;

use indexmap::IndexMap;
use regex::Regex;
use serde_json::Value;

use crate::behaviour::{MissingItemBehaviour, UnexpectedItemBehaviour};

use super::leaf::{EqualsSchema, RegexSchema};
use super::object::ObjectSchema;
use super::traits::{SchemaLike, SchemaRef};

/// One entry of a [`Pattern`].
#[derive(Clone)]
pub enum PatternItem {
    /// Conform the value with this schema.
    Schema(SchemaRef),
    /// The value is an object matching this pattern.
    Nested(Pattern),
    /// The value must equal this literal.
    Literal(Value),
}

/// An ordered mapping from key to [`PatternItem`].
///
/// # Example
///
/// ```rust
/// use conformer::{Pattern, Schema, SchemaLike};
/// use serde_json::json;
///
/// let pattern = Pattern::new()
///     .item("type", "circle")
///     .item("radius", Schema::number())
///     .item("centre", Pattern::new().item("x", Schema::number()).item("y", Schema::number()));
///
/// let circle = Schema::object(pattern);
/// let value = json!({"type": "circle", "radius": 2, "centre": {"x": 0, "y": 0}});
/// assert!(circle.conform(Some(&value)).is_success());
/// ```
#[derive(Clone, Default)]
pub struct Pattern {
    items: IndexMap<String, PatternItem>,
}

impl Pattern {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the entry for `key`.
    pub fn item(mut self, key: impl Into<String>, item: impl Into<PatternItem>) -> Self {
        self.items.insert(key.into(), item.into());
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PatternItem)> {
        self.items.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<S: SchemaLike + 'static> From<S> for PatternItem {
    fn from(schema: S) -> Self {
        PatternItem::Schema(Arc::new(schema))
    }
}

impl From<Pattern> for PatternItem {
    fn from(pattern: Pattern) -> Self {
        PatternItem::Nested(pattern)
    }
}

impl From<Value> for PatternItem {
    fn from(literal: Value) -> Self {
        PatternItem::Literal(literal)
    }
}

impl From<&str> for PatternItem {
    fn from(literal: &str) -> Self {
        PatternItem::Literal(Value::from(literal))
    }
}

impl From<String> for PatternItem {
    fn from(literal: String) -> Self {
        PatternItem::Literal(Value::from(literal))
    }
}

impl From<bool> for PatternItem {
    fn from(literal: bool) -> Self {
        PatternItem::Literal(Value::from(literal))
    }
}

impl From<i64> for PatternItem {
    fn from(literal: i64) -> Self {
        PatternItem::Literal(Value::from(literal))
    }
}

impl From<f64> for PatternItem {
    fn from(literal: f64) -> Self {
        PatternItem::Literal(Value::from(literal))
    }
}

/// A regex literal matches strings.
impl From<Regex> for PatternItem {
    fn from(regex: Regex) -> Self {
        PatternItem::Schema(Arc::new(RegexSchema::new(regex)))
    }
}

/// How nested patterns become object schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Strictness {
    pub unexpected: UnexpectedItemBehaviour,
    pub missing: MissingItemBehaviour,
}

impl Strictness {
    /// Every declared key is required and undeclared keys are problems.
    pub const STRICT: Strictness = Strictness {
        unexpected: UnexpectedItemBehaviour::Problem,
        missing: MissingItemBehaviour::Problem,
    };

    /// Every declared key is optional and undeclared keys are ignored.
    pub const PARTIAL: Strictness = Strictness {
        unexpected: UnexpectedItemBehaviour::Ignore,
        missing: MissingItemBehaviour::Ignore,
    };
}

/// Turns each pattern entry into a schema.
///
/// Nested patterns become object schemas with the given strictness, applied
/// all the way down.
pub(crate) fn schematize(pattern: &Pattern, strictness: Strictness) -> IndexMap<String, SchemaRef> {
    pattern
        .items
        .iter()
        .map(|(key, item)| {
            let schema: SchemaRef = match item {
                PatternItem::Schema(schema) => Arc::clone(schema),
                PatternItem::Nested(nested) => Arc::new(ObjectSchema::with_strictness(nested, strictness)),
                PatternItem::Literal(literal) => Arc::new(EqualsSchema::new(literal.clone())),
            };
            (key.clone(), schema)
        })
        .collect()
}
