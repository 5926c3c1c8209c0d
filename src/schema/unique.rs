//! Uniqueness over array items.

use std::sync::Arc;

use serde_json::{json, Value};
use stillwater::Validation;

use crate::error::Problems;
use crate::path::JsonPath;

use super::array::ArrayOfSchema;
use super::traits::{failure, literal_eq, type_description, Conformed, SchemaLike};

type KeyFn = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// Accepts arrays in which no two items share a key.
///
/// The key of an item is computed by the key function (the item itself for
/// [`UniqueSchema::new`]) and keys compare as JSON values. Every repeat is
/// reported at its own index. The array is returned unchanged.
///
/// # Example
///
/// ```rust
/// use conformer::{Schema, SchemaLike};
/// use serde_json::json;
///
/// let users = Schema::unique_by(|user| user["id"].clone());
///
/// let input = json!([{"id": 1}, {"id": 2}, {"id": 1}]);
/// let problems = users.conform(Some(&input)).into_result().unwrap_err();
/// assert_eq!(problems.first().unwrap().path.to_string(), "[2]");
/// ```
#[derive(Clone)]
pub struct UniqueSchema {
    key: KeyFn,
}

impl UniqueSchema {
    pub fn new() -> Self {
        Self::by(Value::clone)
    }

    pub fn by<F>(key: F) -> Self
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        Self { key: Arc::new(key) }
    }

    fn duplicates(&self, items: &[Value]) -> Problems {
        let mut seen: Vec<Value> = Vec::with_capacity(items.len());
        let mut problems = Problems::none();

        for (i, item) in items.iter().enumerate() {
            let key = (self.key)(item);
            if let Some(first) = seen.iter().position(|k| literal_eq(k, &key)) {
                problems = problems.merge(Problems::at(
                    JsonPath::from_index(i),
                    format!("duplicate of item {}", first),
                ));
            }
            seen.push(key);
        }
        problems
    }
}

impl Default for UniqueSchema {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaLike for UniqueSchema {
    fn conform(&self, value: Option<&Value>) -> Conformed {
        let Some(Value::Array(items)) = value else {
            return failure(format!("expected an array but got {}", type_description(value)));
        };

        let problems = self.duplicates(items);
        if problems.is_empty() {
            Validation::Success(Some(Value::Array(items.clone())))
        } else {
            Validation::Failure(problems)
        }
    }

    fn to_json_schema(&self) -> Option<Value> {
        Some(json!({ "type": "array", "uniqueItems": true }))
    }
}

/// Arrays of distinct items, each conforming to one schema.
///
/// Items are conformed first; uniqueness is then checked on the conformed
/// items, so two inputs that conform to the same value are duplicates.
#[derive(Clone)]
pub struct SetOfSchema {
    items: ArrayOfSchema,
    unique: UniqueSchema,
}

impl SetOfSchema {
    pub fn new<S: SchemaLike + 'static>(items: S) -> Self {
        Self {
            items: ArrayOfSchema::new(items),
            unique: UniqueSchema::new(),
        }
    }
}

impl SchemaLike for SetOfSchema {
    fn conform(&self, value: Option<&Value>) -> Conformed {
        match self.items.conform(value) {
            Validation::Success(conformed) => self.unique.conform(conformed.as_ref()),
            failure => failure,
        }
    }

    fn to_json_schema(&self) -> Option<Value> {
        let mut fragment = self.items.to_json_schema()?;
        if let Value::Object(map) = &mut fragment {
            map.insert("uniqueItems".to_string(), json!(true));
        }
        Some(fragment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::leaf::{type_check, FnSchema};

    fn unwrap_failure(v: Conformed) -> Problems {
        v.into_result().unwrap_err()
    }

    #[test]
    fn test_unique_accepts_distinct_items() {
        let input = json!([1, "1", [1], {"a": 1}]);
        assert_eq!(
            UniqueSchema::new().conform(Some(&input)).into_result().unwrap(),
            Some(input)
        );
    }

    #[test]
    fn test_unique_reports_every_repeat() {
        let problems = unwrap_failure(UniqueSchema::new().conform(Some(&json!([1, 2, 1.0, 2, 3]))));
        assert_eq!(problems.messages(), vec!["duplicate of item 0", "duplicate of item 1"]);

        let paths: Vec<_> = problems.iter().map(|p| p.path.clone()).collect();
        assert_eq!(paths, vec![JsonPath::from_index(2), JsonPath::from_index(3)]);
    }

    #[test]
    fn test_unique_by_key() {
        let schema = UniqueSchema::by(|v| json!(v.as_str().map(str::to_lowercase)));
        assert!(schema.conform(Some(&json!(["a", "b"]))).is_success());
        assert!(schema.conform(Some(&json!(["a", "A"]))).is_failure());
    }

    #[test]
    fn test_unique_rejects_non_arrays() {
        assert_eq!(
            unwrap_failure(UniqueSchema::new().conform(None)).messages(),
            vec!["expected an array but got no value"]
        );
    }

    #[test]
    fn test_set_of_checks_items_before_uniqueness() {
        let schema = SetOfSchema::new(type_check("a number", Value::is_number));
        assert!(schema.conform(Some(&json!([1, 2]))).is_success());

        let problems = unwrap_failure(schema.conform(Some(&json!([1, "x", 1]))));
        assert_eq!(problems.messages(), vec!["expected a number but got string: \"x\""]);

        let problems = unwrap_failure(schema.conform(Some(&json!([1, 2, 1]))));
        assert_eq!(problems, Problems::at(JsonPath::from_index(2), "duplicate of item 0"));
    }

    #[test]
    fn test_set_of_compares_conformed_items() {
        let trimmed = FnSchema::new(|v| match v.and_then(Value::as_str) {
            Some(s) => Validation::Success(Some(json!(s.trim()))),
            None => Validation::Failure(Problems::failure("expected a string")),
        });
        let problems = unwrap_failure(SetOfSchema::new(trimmed).conform(Some(&json!(["a", " a "]))));
        assert_eq!(problems.first().unwrap().path, JsonPath::from_index(1));
    }

    #[test]
    fn test_set_of_json_schema() {
        let schema = SetOfSchema::new(type_check("a number", Value::is_number));
        assert_eq!(
            schema.to_json_schema(),
            Some(json!({"type": "array", "items": {}, "uniqueItems": true}))
        );
    }
}
