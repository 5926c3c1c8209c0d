//! Schemas over a fixed set of values.
//!
//! [`InSchema`] accepts any of a list of values. [`LookupSchema`] accepts the
//! names of a table and conforms each name to the value stored under it, the
//! way an enum key maps to its value.

use indexmap::IndexMap;
use serde_json::{json, Value};
use stillwater::Validation;

use super::traits::{failure, literal_eq, type_description, Conformed, SchemaLike};

/// Accepts values equal to one of `values`.
///
/// # Example
///
/// ```rust
/// use conformer::{Schema, SchemaLike};
/// use serde_json::json;
///
/// let level = Schema::is_in(vec![json!("low"), json!("high")]);
///
/// assert!(level.conform(Some(&json!("low"))).is_success());
///
/// let problems = level.conform(Some(&json!("mid"))).into_result().unwrap_err();
/// assert_eq!(problems.messages(), vec![r#"expected one of "low", "high" but got string: "mid""#]);
/// ```
#[derive(Debug, Clone)]
pub struct InSchema {
    values: Vec<Value>,
}

impl InSchema {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

impl SchemaLike for InSchema {
    fn conform(&self, value: Option<&Value>) -> Conformed {
        match value {
            Some(v) if self.values.iter().any(|allowed| literal_eq(allowed, v)) => {
                Validation::Success(Some(v.clone()))
            }
            other => failure(format!(
                "expected one of {} but got {}",
                join(self.values.iter()),
                type_description(other)
            )),
        }
    }

    fn to_json_schema(&self) -> Option<Value> {
        Some(json!({ "enum": self.values }))
    }
}

/// Conforms a name to the value the table stores under it.
///
/// # Example
///
/// ```rust
/// use conformer::{Schema, SchemaLike};
/// use serde_json::json;
///
/// let colour = Schema::lookup([("Red", json!("#f00")), ("Green", json!("#0f0"))]);
///
/// assert_eq!(colour.conform(Some(&json!("Red"))).into_result().unwrap(), Some(json!("#f00")));
/// assert!(colour.conform(Some(&json!("#f00"))).is_failure());
/// ```
#[derive(Debug, Clone, Default)]
pub struct LookupSchema {
    table: IndexMap<String, Value>,
}

impl LookupSchema {
    pub fn new<I, K, V>(table: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Self {
            table: table
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// The table without the names that read as numbers.
    ///
    /// A numeric enum exported to JSON often carries a reverse entry for every
    /// value (`"0": "Red"` next to `"Red": 0`); only the named side is kept.
    pub fn named_only(self) -> Self {
        Self {
            table: self
                .table
                .into_iter()
                .filter(|(name, _)| !reads_as_number(name))
                .collect(),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.table.keys().map(String::as_str)
    }

    /// The stored values, as an [`InSchema`].
    pub fn values(&self) -> InSchema {
        InSchema::new(self.table.values().cloned().collect())
    }
}

impl SchemaLike for LookupSchema {
    fn conform(&self, value: Option<&Value>) -> Conformed {
        if let Some(found) = value.and_then(Value::as_str).and_then(|name| self.table.get(name)) {
            return Validation::Success(Some(found.clone()));
        }

        let names: Vec<Value> = self.table.keys().map(|name| Value::from(name.as_str())).collect();
        failure(format!(
            "expected one of {} but got {}",
            join(names.iter()),
            type_description(value)
        ))
    }

    fn to_json_schema(&self) -> Option<Value> {
        let names: Vec<&String> = self.table.keys().collect();
        Some(json!({ "type": "string", "enum": names }))
    }
}

fn reads_as_number(name: &str) -> bool {
    name.trim().parse::<f64>().is_ok_and(|n| !n.is_nan())
}

fn join<'a>(values: impl Iterator<Item = &'a Value>) -> String {
    values.map(Value::to_string).collect::<Vec<_>>().join(", ")
}
