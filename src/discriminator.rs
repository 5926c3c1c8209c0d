//! Discriminator detection.
//!
//! Given a family of registered shapes, find the field whose literal value
//! tells them apart. A field is a candidate when at least one shape declares
//! it with an equality schema against a string, number or boolean. A candidate
//! is a valid discriminator when every shape declares it that way and no two
//! shapes share a literal.
//!
//! # Example
//!
//! ```rust
//! use conformer::{detect_discriminator, Pattern, Schema, ShapeRegistry};
//!
//! let registry = ShapeRegistry::new();
//! registry.register("Circle", Schema::object(Pattern::new().item("kind", "circle").item("r", Schema::number()))).unwrap();
//! registry.register("Square", Schema::object(Pattern::new().item("kind", "square").item("side", Schema::number()))).unwrap();
//!
//! assert_eq!(detect_discriminator(&registry, &["Circle", "Square"]).unwrap(), "kind");
//! ```

use std::fmt;

use indexmap::IndexMap;
use serde_json::Value;

use crate::registry::ShapeRegistry;
use crate::schema::{is_primitive, literal_eq, SchemaLike};

/// A field that identifies exactly one shape per literal.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscriminatorField {
    pub name: String,
    /// Each literal with the shape that declares it, in shape order.
    pub literals: Vec<(Value, String)>,
}

impl DiscriminatorField {
    /// The shape declaring `literal`.
    pub fn shape_for(&self, literal: &Value) -> Option<&str> {
        self.literals
            .iter()
            .find(|(l, _)| literal_eq(l, literal))
            .map(|(_, shape)| shape.as_str())
    }
}

/// A candidate field that cannot discriminate, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedField {
    pub name: String,
    pub reason: String,
}

impl fmt::Display for RejectedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.reason)
    }
}

/// Every candidate field of a shape family, split into accepted and rejected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiscriminatorReport {
    pub accepted: Vec<DiscriminatorField>,
    pub rejected: Vec<RejectedField>,
}

impl DiscriminatorReport {
    pub fn accepted(&self, name: &str) -> Option<&DiscriminatorField> {
        self.accepted.iter().find(|f| f.name == name)
    }

    pub fn rejected(&self, name: &str) -> Option<&RejectedField> {
        self.rejected.iter().find(|f| f.name == name)
    }

    pub fn has_candidates(&self) -> bool {
        !self.accepted.is_empty() || !self.rejected.is_empty()
    }
}

/// Errors from discriminator detection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DiscriminatorError {
    #[error("shape '{0}' not found")]
    UnknownShape(String),

    #[error("no literal fields to discriminate shapes: {}", .shapes.join(", "))]
    NoCandidates { shapes: Vec<String> },

    #[error("no valid discriminator: {}", join_rejected(.considered))]
    NoneValid { considered: Vec<RejectedField> },

    #[error("ambiguous discriminator, candidates: {}", .fields.join(", "))]
    Ambiguous { fields: Vec<String> },

    #[error("'{field}' cannot discriminate: {reason}")]
    InvalidDiscriminator { field: String, reason: String },
}

fn join_rejected(rejected: &[RejectedField]) -> String {
    rejected
        .iter()
        .map(RejectedField::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Literal groupings for one candidate field.
#[derive(Default)]
struct Candidate {
    /// Literal to the shapes declaring it.
    literals: Vec<(Value, Vec<String>)>,
    /// Number of shapes declaring the field as a literal.
    declared_in: usize,
}

/// Classifies every candidate field of `shapes`.
///
/// Shape names are deduplicated, keeping first occurrences.
///
/// # Errors
///
/// Returns `DiscriminatorError::UnknownShape` if a name is not registered.
pub fn discriminator_report(
    registry: &ShapeRegistry,
    shapes: &[&str],
) -> Result<DiscriminatorReport, DiscriminatorError> {
    let names = dedup(shapes);
    let mut candidates: IndexMap<String, Candidate> = IndexMap::new();

    for name in &names {
        let shape = registry
            .get(name)
            .ok_or_else(|| DiscriminatorError::UnknownShape(name.clone()))?;

        for (field, schema) in shape.fields() {
            let Some(literal) = schema.equals_literal().filter(|l| is_primitive(l)) else {
                continue;
            };
            let candidate = candidates.entry(field.to_string()).or_default();
            candidate.declared_in += 1;
            match candidate.literals.iter_mut().find(|(l, _)| literal_eq(l, literal)) {
                Some((_, declaring)) => declaring.push(name.clone()),
                None => candidate.literals.push((literal.clone(), vec![name.clone()])),
            }
        }
    }

    let mut report = DiscriminatorReport::default();
    for (field, candidate) in candidates {
        match rejection(&candidate, names.len()) {
            Some(reason) => report.rejected.push(RejectedField { name: field, reason }),
            None => report.accepted.push(DiscriminatorField {
                name: field,
                literals: candidate
                    .literals
                    .into_iter()
                    .filter_map(|(literal, mut declaring)| declaring.pop().map(|s| (literal, s)))
                    .collect(),
            }),
        }
    }
    Ok(report)
}

fn rejection(candidate: &Candidate, shape_count: usize) -> Option<String> {
    if let Some((literal, declaring)) = candidate.literals.iter().find(|(_, d)| d.len() > 1) {
        return Some(format!(
            "value '{}' is repeated in: {}",
            literal_text(literal),
            declaring.join(", ")
        ));
    }
    if candidate.declared_in < shape_count {
        return Some("field is not present in all shapes".to_string());
    }
    None
}

fn literal_text(literal: &Value) -> String {
    match literal {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn dedup(shapes: &[&str]) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(shapes.len());
    for shape in shapes {
        if !names.iter().any(|n| n == shape) {
            names.push(shape.to_string());
        }
    }
    names
}

/// Finds the single field that discriminates `shapes`.
///
/// # Errors
///
/// - `UnknownShape` if a name is not registered
/// - `NoCandidates` if no shape declares a literal field
/// - `NoneValid` if there are candidates but none discriminates
/// - `Ambiguous` if more than one field discriminates
pub fn detect_discriminator(
    registry: &ShapeRegistry,
    shapes: &[&str],
) -> Result<String, DiscriminatorError> {
    let report = discriminator_report(registry, shapes)?;
    select(report, shapes).map(|field| field.name)
}

pub(crate) fn select(
    mut report: DiscriminatorReport,
    shapes: &[&str],
) -> Result<DiscriminatorField, DiscriminatorError> {
    match report.accepted.len() {
        1 => {
            let field = report.accepted.remove(0);
            tracing::debug!(field = %field.name, shapes = ?shapes, "selected discriminator");
            Ok(field)
        }
        0 if !report.has_candidates() => Err(DiscriminatorError::NoCandidates {
            shapes: dedup(shapes),
        }),
        0 => Err(DiscriminatorError::NoneValid {
            considered: report.rejected,
        }),
        _ => Err(DiscriminatorError::Ambiguous {
            fields: report.accepted.into_iter().map(|f| f.name).collect(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Pattern, Schema};
    use serde_json::json;

    fn register(registry: &ShapeRegistry, name: &str, pattern: Pattern) {
        registry.register(name, Schema::object(pattern)).unwrap();
    }

    #[test]
    fn test_single_valid_field() {
        let registry = ShapeRegistry::new();
        register(&registry, "A", Pattern::new().item("type", "A"));
        register(&registry, "B", Pattern::new().item("type", "B"));

        assert_eq!(detect_discriminator(&registry, &["A", "B"]).unwrap(), "type");
    }

    #[test]
    fn test_repeated_value() {
        let registry = ShapeRegistry::new();
        register(&registry, "A1", Pattern::new().item("type", "A"));
        register(&registry, "A2", Pattern::new().item("type", "A"));

        assert_eq!(
            detect_discriminator(&registry, &["A1", "A2"]),
            Err(DiscriminatorError::NoneValid {
                considered: vec![RejectedField {
                    name: "type".to_string(),
                    reason: "value 'A' is repeated in: A1, A2".to_string(),
                }]
            })
        );
    }

    #[test]
    fn test_integer_and_float_literals_are_the_same_value() {
        let registry = ShapeRegistry::new();
        register(&registry, "A", Pattern::new().item("v", 1i64));
        register(&registry, "B", Pattern::new().item("v", 1.0f64));

        assert_eq!(
            detect_discriminator(&registry, &["A", "B"]),
            Err(DiscriminatorError::NoneValid {
                considered: vec![RejectedField {
                    name: "v".to_string(),
                    reason: "value '1' is repeated in: A, B".to_string(),
                }]
            })
        );
    }

    #[test]
    fn test_field_missing_from_a_shape() {
        let registry = ShapeRegistry::new();
        register(&registry, "A", Pattern::new().item("type", "A").item("kind", "x"));
        register(&registry, "B", Pattern::new().item("type", "B"));

        let report = discriminator_report(&registry, &["A", "B"]).unwrap();
        assert_eq!(report.accepted.len(), 1);
        assert_eq!(
            report.rejected("kind").unwrap().reason,
            "field is not present in all shapes"
        );
    }

    #[test]
    fn test_non_literal_declaration_does_not_count() {
        let registry = ShapeRegistry::new();
        register(&registry, "A", Pattern::new().item("type", "A"));
        register(&registry, "B", Pattern::new().item("type", Schema::string()));

        let err = detect_discriminator(&registry, &["A", "B"]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "no valid discriminator: type: field is not present in all shapes"
        );
    }

    #[test]
    fn test_no_candidates() {
        let registry = ShapeRegistry::new();
        register(&registry, "A", Pattern::new().item("n", Schema::number()));
        register(&registry, "B", Pattern::new().item("kind", json!(null)));

        assert_eq!(
            detect_discriminator(&registry, &["A", "B"]),
            Err(DiscriminatorError::NoCandidates {
                shapes: vec!["A".to_string(), "B".to_string()]
            })
        );
    }

    #[test]
    fn test_ambiguous() {
        let registry = ShapeRegistry::new();
        register(&registry, "A", Pattern::new().item("type", "A").item("code", 1i64));
        register(&registry, "B", Pattern::new().item("type", "B").item("code", 2i64));

        assert_eq!(
            detect_discriminator(&registry, &["A", "B"]),
            Err(DiscriminatorError::Ambiguous {
                fields: vec!["type".to_string(), "code".to_string()]
            })
        );
    }

    #[test]
    fn test_unknown_shape() {
        let registry = ShapeRegistry::new();
        register(&registry, "A", Pattern::new().item("type", "A"));

        assert_eq!(
            detect_discriminator(&registry, &["A", "Nope"]),
            Err(DiscriminatorError::UnknownShape("Nope".to_string()))
        );
    }

    #[test]
    fn test_accepted_field_maps_literals_to_shapes() {
        let registry = ShapeRegistry::new();
        register(&registry, "On", Pattern::new().item("on", true));
        register(&registry, "Off", Pattern::new().item("on", false));

        let report = discriminator_report(&registry, &["On", "Off", "On"]).unwrap();
        let field = report.accepted("on").unwrap();
        assert_eq!(field.shape_for(&json!(true)), Some("On"));
        assert_eq!(field.shape_for(&json!(false)), Some("Off"));
        assert_eq!(field.shape_for(&json!("true")), None);
    }
}
