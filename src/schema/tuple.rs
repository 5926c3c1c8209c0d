//! Tuple schemas: arrays with a schema per position.

use std::sync::Arc;

use serde_json::{json, Value};
use stillwater::Validation;

use crate::behaviour::{HasItemBehaviour, MissingItemBehaviour, UnexpectedItemBehaviour};
use crate::error::Problems;

use super::associative::{conform_in_place, TupleSlots};
use super::traits::{failure, type_description, Conformed, SchemaLike, SchemaRef};

/// A schema for fixed-position arrays.
///
/// Position `i` of the input is conformed by schema `i`. Positions past the
/// end of the input are absent, so an optional schema there produces nothing.
/// Items beyond the declared positions are handled by the unexpected-item
/// behaviour.
///
/// # Example
///
/// ```rust
/// use conformer::{Schema, SchemaExt, SchemaLike};
/// use serde_json::json;
///
/// let pair = Schema::tuple(vec![Schema::string().shared(), Schema::number().optional().shared()]);
///
/// assert!(pair.conform(Some(&json!(["a", 1]))).is_success());
/// assert!(pair.conform(Some(&json!(["a"]))).is_success());
///
/// let problems = pair.conform(Some(&json!(["a", 1, true]))).into_result().unwrap_err();
/// assert_eq!(problems.first().unwrap().to_string(), "[2]: Unexpected item");
/// ```
#[derive(Clone)]
pub struct TupleSchema {
    items: Vec<SchemaRef>,
    unexpected: UnexpectedItemBehaviour,
    missing: MissingItemBehaviour,
}

impl TupleSchema {
    pub fn new(items: Vec<SchemaRef>) -> Self {
        Self {
            items,
            unexpected: UnexpectedItemBehaviour::Problem,
            missing: MissingItemBehaviour::Problem,
        }
    }

    /// Appends a position.
    pub fn item<S: SchemaLike + 'static>(mut self, schema: S) -> Self {
        self.items.push(Arc::new(schema));
        self
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Conforms `target` in place.
    ///
    /// Deleted unexpected items are removed from the end of `target`.
    pub fn conform_in_place(&self, target: &mut Vec<Value>) -> Validation<(), Problems> {
        let mut slots = TupleSlots::from(std::mem::take(target));
        let result = conform_in_place(
            self.unexpected,
            self.missing,
            &mut slots,
            self.items.iter().enumerate(),
        );
        *target = slots.into_vec();
        result
    }
}

impl SchemaLike for TupleSchema {
    fn conform(&self, value: Option<&Value>) -> Conformed {
        let Some(Value::Array(items)) = value else {
            return failure(format!("expected an array but got {}", type_description(value)));
        };

        let mut conformed = items.clone();
        self.conform_in_place(&mut conformed)
            .map(|()| Some(Value::Array(conformed)))
    }

    fn to_json_schema(&self) -> Option<Value> {
        let items: Vec<Value> = self
            .items
            .iter()
            .map(|schema| schema.to_json_schema().unwrap_or(json!({})))
            .collect();
        let min_items = self.items.iter().filter(|s| !s.is_optional()).count();

        Some(json!({
            "type": "array",
            "items": items,
            "minItems": min_items,
            "additionalItems": self.unexpected != UnexpectedItemBehaviour::Problem,
        }))
    }
}

impl HasItemBehaviour for TupleSchema {
    fn on_unexpected(mut self, behaviour: UnexpectedItemBehaviour) -> Self {
        self.unexpected = behaviour;
        self
    }

    fn on_missing(mut self, behaviour: MissingItemBehaviour) -> Self {
        self.missing = behaviour;
        self
    }
}
