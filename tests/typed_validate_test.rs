//! Tests for conforming straight into typed values.

use conformer::{validate, HasItemBehaviour, Pattern, Schema, ShapeRegistry, UnexpectedItemBehaviour};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, PartialEq, Deserialize)]
#[serde(tag = "type")]
enum Shape {
    #[serde(rename = "circle")]
    Circle { radius: f64 },
    #[serde(rename = "rect")]
    Rect { width: f64, height: f64 },
}

fn shapes() -> ShapeRegistry {
    let registry = ShapeRegistry::new();
    registry
        .register(
            "Circle",
            Schema::object(Pattern::new().item("type", "circle").item("radius", Schema::number())),
        )
        .unwrap();
    registry
        .register(
            "Rect",
            Schema::object(
                Pattern::new()
                    .item("type", "rect")
                    .item("width", Schema::number())
                    .item("height", Schema::number()),
            ),
        )
        .unwrap();
    registry
}

#[test]
fn test_validate_into_tagged_enum() {
    let registry = shapes();
    let schema = Schema::discriminated(&registry, &["Circle", "Rect"]).unwrap();

    let shape: Shape = validate(&schema, &json!({"type": "rect", "width": 2, "height": 3})).unwrap();
    assert_eq!(shape, Shape::Rect { width: 2.0, height: 3.0 });
}

#[test]
fn test_validate_reports_all_problems() {
    let registry = shapes();
    let schema = Schema::discriminated(&registry, &["Circle", "Rect"]).unwrap();

    let err = validate::<Shape, _>(&schema, &json!({"type": "rect", "width": "2"})).unwrap_err();
    let problems = err.problems().unwrap();
    assert_eq!(problems.len(), 2);
    assert!(err.to_string().contains("height: No value"));
}

#[derive(Debug, Deserialize)]
struct Settings {
    name: String,
    retries: u32,
}

#[test]
fn test_deleted_items_never_reach_the_type() {
    let schema = Schema::object(
        Pattern::new()
            .item("name", Schema::string())
            .item("retries", Schema::default_value(|| json!(3), Schema::number())),
    )
    .on_unexpected(UnexpectedItemBehaviour::Delete);

    let settings: Settings = validate(&schema, &json!({"name": "svc", "debug": true})).unwrap();
    assert_eq!(settings.name, "svc");
    assert_eq!(settings.retries, 3);
}
