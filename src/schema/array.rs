//! Homogeneous array schemas.
//!
//! [`ArrayOfSchema`] conforms every item of an array against one item schema,
//! with optional length bounds.

use std::sync::Arc;

use serde_json::{json, Value};
use stillwater::Validation;

use crate::behaviour::{MissingItemBehaviour, UnexpectedItemBehaviour};
use crate::error::Problems;

use super::associative::{conform_in_place, TupleSlots};
use super::traits::{type_description, Conformed, SchemaLike, SchemaRef};

/// A length bound on the array.
#[derive(Clone)]
enum LengthBound {
    Min { min: usize, message: Option<String> },
    Max { max: usize, message: Option<String> },
}

/// A schema for arrays whose every item conforms to one schema.
///
/// Item problems are reported under the item's index; length problems at the
/// array itself. All problems are accumulated.
///
/// # Example
///
/// ```rust
/// use conformer::{Schema, SchemaLike};
/// use serde_json::json;
///
/// let tags = Schema::array_of(Schema::string()).non_empty();
///
/// assert!(tags.conform(Some(&json!(["a", "b"]))).is_success());
///
/// let problems = tags.conform(Some(&json!(["a", 2]))).into_result().unwrap_err();
/// assert_eq!(problems.first().unwrap().path.to_string(), "[1]");
/// ```
#[derive(Clone)]
pub struct ArrayOfSchema {
    items: SchemaRef,
    bounds: Vec<LengthBound>,
    type_error_message: Option<String>,
}

impl ArrayOfSchema {
    pub fn new<S: SchemaLike + 'static>(items: S) -> Self {
        Self {
            items: Arc::new(items),
            bounds: Vec::new(),
            type_error_message: None,
        }
    }

    /// The array must have at least `min` items.
    pub fn min_len(mut self, min: usize) -> Self {
        self.bounds.push(LengthBound::Min { min, message: None });
        self
    }

    /// The array must have at most `max` items.
    pub fn max_len(mut self, max: usize) -> Self {
        self.bounds.push(LengthBound::Max { max, message: None });
        self
    }

    pub fn non_empty(self) -> Self {
        self.min_len(1)
    }

    /// Sets the message of the most recent length bound, or the message for
    /// non-array input when no bound has been added yet.
    ///
    /// # Example
    ///
    /// ```rust
    /// use conformer::{Schema, SchemaLike};
    /// use serde_json::json;
    ///
    /// let schema = Schema::array_of(Schema::string())
    ///     .min_len(1)
    ///     .error("at least one tag is required");
    ///
    /// let problems = schema.conform(Some(&json!([]))).into_result().unwrap_err();
    /// assert_eq!(problems.messages(), vec!["at least one tag is required"]);
    /// ```
    pub fn error(mut self, message: impl Into<String>) -> Self {
        match self.bounds.last_mut() {
            Some(LengthBound::Min { message: m, .. }) | Some(LengthBound::Max { message: m, .. }) => {
                *m = Some(message.into());
            }
            None => self.type_error_message = Some(message.into()),
        }
        self
    }

    /// Conforms every item of `target` in place.
    pub fn conform_in_place(&self, target: &mut Vec<Value>) -> Validation<(), Problems> {
        let mut problems = self.check_bounds(target.len());

        let len = target.len();
        let mut slots = TupleSlots::from(std::mem::take(target));
        let items = conform_in_place(
            UnexpectedItemBehaviour::Problem,
            MissingItemBehaviour::Problem,
            &mut slots,
            (0..len).map(|i| (i, &self.items)),
        );
        *target = slots.into_vec();

        if let Validation::Failure(p) = items {
            problems = problems.merge(p);
        }
        if problems.is_empty() {
            Validation::Success(())
        } else {
            Validation::Failure(problems)
        }
    }

    fn check_bounds(&self, len: usize) -> Problems {
        self.bounds
            .iter()
            .filter_map(|bound| match bound {
                LengthBound::Min { min, message } if len < *min => Some(
                    message
                        .clone()
                        .unwrap_or_else(|| format!("expected at least {} items but got {}", min, len)),
                ),
                LengthBound::Max { max, message } if len > *max => Some(
                    message
                        .clone()
                        .unwrap_or_else(|| format!("expected at most {} items but got {}", max, len)),
                ),
                _ => None,
            })
            .map(Problems::failure)
            .fold(Problems::none(), Problems::merge)
    }
}

impl SchemaLike for ArrayOfSchema {
    fn conform(&self, value: Option<&Value>) -> Conformed {
        let Some(Value::Array(items)) = value else {
            let message = self
                .type_error_message
                .clone()
                .unwrap_or_else(|| format!("expected an array but got {}", type_description(value)));
            return Validation::Failure(Problems::failure(message));
        };

        let mut conformed = items.clone();
        self.conform_in_place(&mut conformed)
            .map(|()| Some(Value::Array(conformed)))
    }

    fn to_json_schema(&self) -> Option<Value> {
        let mut fragment = json!({
            "type": "array",
            "items": self.items.to_json_schema().unwrap_or(json!({})),
        });
        if let Value::Object(map) = &mut fragment {
            for bound in &self.bounds {
                match bound {
                    LengthBound::Min { min, .. } => map.insert("minItems".to_string(), json!(min)),
                    LengthBound::Max { max, .. } => map.insert("maxItems".to_string(), json!(max)),
                };
            }
        }
        Some(fragment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::JsonPath;
    use crate::schema::leaf::{EqualsSchema, FnSchema};

    fn unwrap_success(v: Conformed) -> Option<Value> {
        v.into_result().unwrap()
    }

    fn unwrap_failure(v: Conformed) -> Problems {
        v.into_result().unwrap_err()
    }

    #[test]
    fn test_accepts_empty_array() {
        let schema = ArrayOfSchema::new(EqualsSchema::new(1));
        assert_eq!(unwrap_success(schema.conform(Some(&json!([])))), Some(json!([])));
    }

    #[test]
    fn test_rejects_non_array() {
        let schema = ArrayOfSchema::new(EqualsSchema::new(1));
        let problems = unwrap_failure(schema.conform(Some(&json!("x"))));
        assert_eq!(problems.messages(), vec!["expected an array but got string: \"x\""]);
    }

    #[test]
    fn test_accumulates_item_problems() {
        let schema = ArrayOfSchema::new(EqualsSchema::new(1));
        let problems = unwrap_failure(schema.conform(Some(&json!([1, 2, 1, 3]))));

        let paths: Vec<_> = problems.iter().map(|p| p.path.clone()).collect();
        assert_eq!(paths, vec![JsonPath::from_index(1), JsonPath::from_index(3)]);
    }

    #[test]
    fn test_items_are_rewritten() {
        let double = FnSchema::new(|v| match v.and_then(Value::as_i64) {
            Some(n) => Validation::Success(Some(json!(n * 2))),
            None => Validation::Failure(Problems::failure("expected an integer")),
        });
        let schema = ArrayOfSchema::new(double);
        assert_eq!(
            unwrap_success(schema.conform(Some(&json!([1, 2, 3])))),
            Some(json!([2, 4, 6]))
        );
    }

    #[test]
    fn test_length_bounds_and_items_together() {
        let schema = ArrayOfSchema::new(EqualsSchema::new(1)).max_len(2);
        let problems = unwrap_failure(schema.conform(Some(&json!([1, 1, 2]))));
        assert_eq!(
            problems.messages(),
            vec!["expected at most 2 items but got 3", "expected 1 but got number: 2"]
        );
    }

    #[test]
    fn test_custom_messages() {
        let schema = ArrayOfSchema::new(EqualsSchema::new(1))
            .error("must be a list")
            .non_empty()
            .error("must not be empty");

        assert_eq!(unwrap_failure(schema.conform(Some(&json!({})))).messages(), vec!["must be a list"]);
        assert_eq!(unwrap_failure(schema.conform(Some(&json!([])))).messages(), vec!["must not be empty"]);
    }

    #[test]
    fn test_json_schema() {
        let schema = ArrayOfSchema::new(EqualsSchema::new(1)).min_len(1).max_len(4);
        assert_eq!(
            schema.to_json_schema(),
            Some(json!({"type": "array", "items": {"const": 1}, "minItems": 1, "maxItems": 4}))
        );
    }
}
