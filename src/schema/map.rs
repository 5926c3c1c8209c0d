//! Map schemas: entries keyed by arbitrary JSON values.

use std::sync::Arc;

use serde_json::{json, Value};
use stillwater::Validation;

use crate::behaviour::{HasItemBehaviour, MissingItemBehaviour, UnexpectedItemBehaviour};
use crate::error::Problems;

use super::associative::{conform_in_place, MapEntries};
use super::traits::{failure, literal_eq, type_description, Conformed, SchemaLike, SchemaRef};

/// A schema for maps with a known set of keys.
///
/// A map is written in JSON as an array of `[key, value]` pairs, so keys can
/// be any JSON value. Problems for an entry are reported under its key: a
/// string key becomes a key segment and a non-negative integer key an index
/// segment.
///
/// # Example
///
/// ```rust
/// use conformer::{Schema, SchemaLike};
/// use serde_json::json;
///
/// let ports = Schema::map()
///     .entry(80, Schema::eq("http"))
///     .entry(443, Schema::eq("https"));
///
/// assert!(ports.conform(Some(&json!([[443, "https"], [80, "http"]]))).is_success());
///
/// let problems = ports.conform(Some(&json!([[80, "gopher"], [443, "https"]]))).into_result().unwrap_err();
/// assert_eq!(problems.first().unwrap().path.to_string(), "[80]");
/// ```
#[derive(Clone, Default)]
pub struct MapSchema {
    entries: Vec<(Value, SchemaRef)>,
    unexpected: UnexpectedItemBehaviour,
    missing: MissingItemBehaviour,
}

impl MapSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares (or replaces) the schema for `key`.
    pub fn entry<S>(mut self, key: impl Into<Value>, schema: S) -> Self
    where
        S: SchemaLike + 'static,
    {
        let key = key.into();
        let schema: SchemaRef = Arc::new(schema);
        match self.entries.iter_mut().find(|(k, _)| literal_eq(k, &key)) {
            Some((_, existing)) => *existing = schema,
            None => self.entries.push((key, schema)),
        }
        self
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(k, _)| k)
    }

    /// Conforms `target` in place.
    pub fn conform_in_place(&self, target: &mut MapEntries) -> Validation<(), Problems> {
        conform_in_place(
            self.unexpected,
            self.missing,
            target,
            self.entries.iter().map(|(k, s)| (k.clone(), s)),
        )
    }
}

impl SchemaLike for MapSchema {
    fn conform(&self, value: Option<&Value>) -> Conformed {
        let Some(Value::Array(pairs)) = value else {
            return failure(format!(
                "expected an array of [key, value] pairs but got {}",
                type_description(value)
            ));
        };

        let mut entries = match MapEntries::from_pairs(pairs) {
            Ok(entries) => entries,
            Err(problems) => return Validation::Failure(problems),
        };
        self.conform_in_place(&mut entries)
            .map(|()| Some(Value::Array(entries.into_pairs())))
    }

    fn to_json_schema(&self) -> Option<Value> {
        let pairs: Vec<Value> = self
            .entries
            .iter()
            .map(|(key, schema)| {
                json!({
                    "type": "array",
                    "items": [{ "const": key }, schema.to_json_schema().unwrap_or(json!({}))],
                })
            })
            .collect();

        Some(json!({ "type": "array", "items": { "anyOf": pairs } }))
    }
}

impl HasItemBehaviour for MapSchema {
    fn on_unexpected(mut self, behaviour: UnexpectedItemBehaviour) -> Self {
        self.unexpected = behaviour;
        self
    }

    fn on_missing(mut self, behaviour: MissingItemBehaviour) -> Self {
        self.missing = behaviour;
        self
    }
}
