//! Conditional routing between schemas.

use std::sync::Arc;

use serde_json::{json, Value};

use super::traits::{failure, type_description, Conformed, SchemaLike, SchemaRef};

/// Picks a schema by testing the input against each case in turn.
///
/// A case applies when its test schema conforms the input; the input is then
/// conformed by the case's schema. The test's problems are discarded. Input
/// that matches no case goes to the fallback, or fails when there is none.
///
/// # Example
///
/// ```rust
/// use conformer::{Schema, SchemaLike};
/// use serde_json::json;
///
/// let size = Schema::conditional()
///     .case(Schema::number(), Schema::predicate(|v| v.as_f64().is_some_and(|n| n > 0.0), "must be positive"))
///     .case(Schema::string(), Schema::eq("auto"));
///
/// assert!(size.conform(Some(&json!(12))).is_success());
/// assert!(size.conform(Some(&json!("auto"))).is_success());
///
/// let problems = size.conform(Some(&json!(-1))).into_result().unwrap_err();
/// assert_eq!(problems.messages(), vec!["must be positive"]);
/// ```
#[derive(Clone, Default)]
pub struct ConditionalSchema {
    cases: Vec<(SchemaRef, SchemaRef)>,
    otherwise: Option<SchemaRef>,
}

impl ConditionalSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a case: input conforming to `test` is conformed by `then`.
    pub fn case<T, S>(mut self, test: T, then: S) -> Self
    where
        T: SchemaLike + 'static,
        S: SchemaLike + 'static,
    {
        self.cases.push((Arc::new(test), Arc::new(then)));
        self
    }

    /// The schema for input that matches no case.
    pub fn otherwise<S: SchemaLike + 'static>(mut self, schema: S) -> Self {
        self.otherwise = Some(Arc::new(schema));
        self
    }
}

impl SchemaLike for ConditionalSchema {
    fn conform(&self, value: Option<&Value>) -> Conformed {
        let chosen = self
            .cases
            .iter()
            .find(|(test, _)| test.conform(value).is_success())
            .map(|(_, then)| then)
            .or(self.otherwise.as_ref());

        match chosen {
            Some(schema) => schema.conform(value),
            None => failure(format!("no case matched {}", type_description(value))),
        }
    }

    fn to_json_schema(&self) -> Option<Value> {
        let branches = self
            .cases
            .iter()
            .map(|(_, then)| then)
            .chain(self.otherwise.as_ref())
            .map(|schema| schema.to_json_schema())
            .collect::<Option<Vec<_>>>()?;
        Some(json!({ "anyOf": branches }))
    }
}
