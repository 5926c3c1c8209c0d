//! Discriminated unions over registered shapes.

use std::fmt;
use std::sync::Arc;

use serde_json::{json, Value};
use stillwater::Validation;

use crate::discriminator::{discriminator_report, select, DiscriminatorError, DiscriminatorField};
use crate::error::Problems;
use crate::path::JsonPath;
use crate::registry::ShapeRegistry;

use super::object::ObjectSchema;
use super::traits::{failure, literal_eq, type_description, Conformed, SchemaLike};

/// Routes an object to one of several shapes by the value of one field.
///
/// Shapes are resolved when the union is built, so registering more shapes
/// afterwards does not change it.
///
/// # Example
///
/// ```rust
/// use conformer::{Pattern, Schema, SchemaLike, ShapeRegistry};
/// use serde_json::json;
///
/// let registry = ShapeRegistry::new();
/// registry.register("Circle", Schema::object(Pattern::new().item("kind", "circle").item("r", Schema::number()))).unwrap();
/// registry.register("Square", Schema::object(Pattern::new().item("kind", "square").item("side", Schema::number()))).unwrap();
///
/// let shape = Schema::discriminated(&registry, &["Circle", "Square"]).unwrap();
/// assert_eq!(shape.field(), "kind");
///
/// assert!(shape.conform(Some(&json!({"kind": "square", "side": 2}))).is_success());
///
/// let problems = shape.conform(Some(&json!({"kind": "hexagon"}))).into_result().unwrap_err();
/// assert_eq!(
///     problems.first().unwrap().to_string(),
///     r#"kind: expected one of "circle", "square" but got string: "hexagon""#
/// );
/// ```
#[derive(Clone)]
pub struct DiscriminatedUnionSchema {
    field: String,
    routes: Vec<(Value, Arc<ObjectSchema>)>,
}

impl DiscriminatedUnionSchema {
    /// Builds a union over `shapes`, detecting the discriminator field.
    ///
    /// # Errors
    ///
    /// Any [`DiscriminatorError`] from detection.
    pub fn new(registry: &ShapeRegistry, shapes: &[&str]) -> Result<Self, DiscriminatorError> {
        let report = discriminator_report(registry, shapes)?;
        let field = select(report, shapes)?;
        Self::from_field(registry, field)
    }

    /// Builds a union over `shapes` discriminated by `field`.
    ///
    /// # Errors
    ///
    /// Returns `DiscriminatorError::InvalidDiscriminator` if `field` does not
    /// tell the shapes apart, or `UnknownShape` for an unregistered name.
    pub fn by(
        registry: &ShapeRegistry,
        shapes: &[&str],
        field: &str,
    ) -> Result<Self, DiscriminatorError> {
        let report = discriminator_report(registry, shapes)?;

        if let Some(accepted) = report.accepted(field) {
            return Self::from_field(registry, accepted.clone());
        }

        let reason = match report.rejected(field) {
            Some(rejected) => rejected.reason.clone(),
            None => "field is not a literal in any shape".to_string(),
        };
        Err(DiscriminatorError::InvalidDiscriminator {
            field: field.to_string(),
            reason,
        })
    }

    fn from_field(
        registry: &ShapeRegistry,
        field: DiscriminatorField,
    ) -> Result<Self, DiscriminatorError> {
        let routes = field
            .literals
            .into_iter()
            .map(|(literal, shape)| {
                registry
                    .get(&shape)
                    .map(|schema| (literal, schema))
                    .ok_or(DiscriminatorError::UnknownShape(shape))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            field: field.name,
            routes,
        })
    }

    /// The discriminator field.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The shape a discriminator value routes to.
    pub fn shape_for(&self, literal: &Value) -> Option<&ObjectSchema> {
        self.routes
            .iter()
            .find(|(l, _)| literal_eq(l, literal))
            .map(|(_, shape)| shape.as_ref())
    }

    fn unknown_literal(&self, got: &Value) -> Conformed {
        let expected = self
            .routes
            .iter()
            .map(|(literal, _)| literal.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        Validation::Failure(Problems::at(
            JsonPath::from_key(self.field.as_str()),
            format!("expected one of {} but got {}", expected, type_description(Some(got))),
        ))
    }
}

impl fmt::Debug for DiscriminatedUnionSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscriminatedUnionSchema")
            .field("field", &self.field)
            .field("literals", &self.routes.iter().map(|(l, _)| l).collect::<Vec<_>>())
            .finish()
    }
}

impl SchemaLike for DiscriminatedUnionSchema {
    fn conform(&self, value: Option<&Value>) -> Conformed {
        let Some(Value::Object(object)) = value else {
            return failure(format!("expected an object but got {}", type_description(value)));
        };

        match object.get(&self.field) {
            None => Validation::Failure(Problems::at(
                JsonPath::from_key(self.field.as_str()),
                "No value",
            )),
            Some(tag) => match self.shape_for(tag) {
                Some(shape) => shape.conform(value),
                None => self.unknown_literal(tag),
            },
        }
    }

    fn to_json_schema(&self) -> Option<Value> {
        let shapes: Vec<Value> = self
            .routes
            .iter()
            .map(|(_, shape)| shape.to_json_schema().unwrap_or(json!({})))
            .collect();
        Some(json!({ "oneOf": shapes, "discriminator": { "propertyName": self.field } }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Pattern, Schema};

    fn registry() -> ShapeRegistry {
        let registry = ShapeRegistry::new();
        registry
            .register(
                "Cat",
                Schema::object(Pattern::new().item("type", "cat").item("lives", json!(9)).item("id", 1i64)),
            )
            .unwrap();
        registry
            .register(
                "Dog",
                Schema::object(Pattern::new().item("type", "dog").item("good", true).item("id", 2i64)),
            )
            .unwrap();
        registry
    }

    fn unwrap_failure(v: Conformed) -> Problems {
        v.into_result().unwrap_err()
    }

    #[test]
    fn test_ambiguous_family_needs_explicit_field() {
        assert!(matches!(
            DiscriminatedUnionSchema::new(&registry(), &["Cat", "Dog"]),
            Err(DiscriminatorError::Ambiguous { .. })
        ));
    }

    #[test]
    fn test_routes_by_explicit_field() {
        let union = DiscriminatedUnionSchema::by(&registry(), &["Cat", "Dog"], "type").unwrap();

        let cat = json!({"type": "cat", "lives": 9, "id": 1});
        assert_eq!(union.conform(Some(&cat)).into_result().unwrap(), Some(cat));

        let problems = unwrap_failure(union.conform(Some(&json!({"type": "dog", "good": false, "id": 2}))));
        assert_eq!(problems.first().unwrap().path, JsonPath::from_key("good"));
    }

    #[test]
    fn test_invalid_explicit_field() {
        let err = DiscriminatedUnionSchema::by(&registry(), &["Cat", "Dog"], "lives").unwrap_err();
        assert_eq!(
            err,
            DiscriminatorError::InvalidDiscriminator {
                field: "lives".to_string(),
                reason: "field is not present in all shapes".to_string(),
            }
        );

        let err = DiscriminatedUnionSchema::by(&registry(), &["Cat", "Dog"], "name").unwrap_err();
        assert!(matches!(err, DiscriminatorError::InvalidDiscriminator { .. }));
    }

    #[test]
    fn test_input_errors() {
        let union = DiscriminatedUnionSchema::by(&registry(), &["Cat", "Dog"], "id").unwrap();

        assert_eq!(
            unwrap_failure(union.conform(Some(&json!([])))).messages(),
            vec!["expected an object but got array of length 0"]
        );
        assert_eq!(
            unwrap_failure(union.conform(Some(&json!({"type": "cat"})))),
            Problems::at(JsonPath::from_key("id"), "No value")
        );
        assert_eq!(
            unwrap_failure(union.conform(Some(&json!({"id": 3})))).messages(),
            vec!["expected one of 1, 2 but got number: 3"]
        );
    }

    #[test]
    fn test_numeric_tags_route_by_value() {
        let union = DiscriminatedUnionSchema::by(&registry(), &["Cat", "Dog"], "id").unwrap();
        assert!(union.shape_for(&json!(2.0)).is_some());

        let cat = json!({"type": "cat", "lives": 9, "id": 1.0});
        assert_eq!(union.conform(Some(&cat)).into_result().unwrap(), Some(cat));
    }

    #[test]
    fn test_later_registrations_do_not_change_union() {
        let registry = registry();
        let union = DiscriminatedUnionSchema::by(&registry, &["Cat", "Dog"], "type").unwrap();
        registry
            .register("Fox", Schema::object(Pattern::new().item("type", "fox")))
            .unwrap();
        assert!(union.shape_for(&json!("fox")).is_none());
    }
}
