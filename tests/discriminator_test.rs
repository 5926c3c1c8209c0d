//! Integration tests for discriminator detection and discriminated unions.

use conformer::{
    detect_discriminator, discriminator_report, DiscriminatorError, JsonPath, Pattern, Problems,
    Schema, SchemaExt, SchemaLike, ShapeRegistry,
};
use serde_json::json;

fn shapes() -> ShapeRegistry {
    let registry = ShapeRegistry::new();
    registry
        .register(
            "Created",
            Schema::object(
                Pattern::new()
                    .item("event", "created")
                    .item("version", 1i64)
                    .item("id", Schema::string()),
            ),
        )
        .unwrap();
    registry
        .register(
            "Deleted",
            Schema::object(
                Pattern::new()
                    .item("event", "deleted")
                    .item("version", 1i64)
                    .item("id", Schema::string())
                    .item("soft", Schema::boolean().optional()),
            ),
        )
        .unwrap();
    registry
}

#[test]
fn test_detects_unique_literal_field() {
    let registry = shapes();
    assert_eq!(
        detect_discriminator(&registry, &["Created", "Deleted"]).unwrap(),
        "event"
    );
}

#[test]
fn test_report_lists_accepted_and_rejected() {
    let registry = shapes();
    let report = discriminator_report(&registry, &["Created", "Deleted"]).unwrap();

    let event = report.accepted("event").unwrap();
    assert_eq!(event.shape_for(&json!("deleted")), Some("Deleted"));

    assert_eq!(
        report.rejected("version").unwrap().reason,
        "value '1' is repeated in: Created, Deleted"
    );
    assert!(report.accepted("id").is_none());
    assert!(report.rejected("id").is_none());
}

#[test]
fn test_same_literal_in_two_shapes() {
    let registry = ShapeRegistry::new();
    registry
        .register("A1", Schema::object(Pattern::new().item("type", "A")))
        .unwrap();
    registry
        .register("A2", Schema::object(Pattern::new().item("type", "A")))
        .unwrap();

    let err = detect_discriminator(&registry, &["A1", "A2"]).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("'A'"));
    assert!(message.contains("A1"));
    assert!(message.contains("A2"));
}

#[test]
fn test_union_routes_and_reports() {
    let registry = shapes();
    let union = Schema::discriminated(&registry, &["Created", "Deleted"]).unwrap();

    assert!(union
        .conform(Some(&json!({"event": "deleted", "version": 1, "id": "x", "soft": true})))
        .is_success());

    let problems = union
        .conform(Some(&json!({"event": "created", "version": 1, "id": "x", "soft": true})))
        .into_result()
        .unwrap_err();
    assert_eq!(problems, Problems::at(JsonPath::from_key("soft"), "Unexpected item"));

    let problems = union
        .conform(Some(&json!({"version": 1})))
        .into_result()
        .unwrap_err();
    assert_eq!(problems, Problems::at(JsonPath::from_key("event"), "No value"));

    let problems = union
        .conform(Some(&json!({"event": "updated"})))
        .into_result()
        .unwrap_err();
    assert_eq!(
        problems.messages(),
        vec![r#"expected one of "created", "deleted" but got string: "updated""#]
    );

    let problems = union.conform(Some(&json!("created"))).into_result().unwrap_err();
    assert_eq!(
        problems.messages(),
        vec![r#"expected an object but got string: "created""#]
    );
}

#[test]
fn test_explicit_field_must_discriminate() {
    let registry = shapes();

    assert!(Schema::discriminated_by(&registry, &["Created", "Deleted"], "event").is_ok());

    let err = Schema::discriminated_by(&registry, &["Created", "Deleted"], "version").unwrap_err();
    assert_eq!(
        err,
        DiscriminatorError::InvalidDiscriminator {
            field: "version".to_string(),
            reason: "value '1' is repeated in: Created, Deleted".to_string(),
        }
    );
}

#[test]
fn test_union_nested_in_array() {
    let registry = shapes();
    let events = Schema::array_of(Schema::discriminated(&registry, &["Created", "Deleted"]).unwrap());

    let problems = events
        .conform(Some(&json!([
            {"event": "created", "version": 1, "id": "a"},
            {"event": "deleted", "version": 2, "id": "a"}
        ])))
        .into_result()
        .unwrap_err();

    assert_eq!(problems.len(), 1);
    assert_eq!(
        problems.first().unwrap().path,
        JsonPath::from_index(1).push_key("version")
    );
}

#[test]
fn test_union_is_shareable() {
    let registry = shapes();
    let union = Schema::discriminated(&registry, &["Created", "Deleted"])
        .unwrap()
        .shared();
    let tuple = Schema::tuple(vec![union.clone(), union]);
    assert!(tuple
        .conform(Some(&json!([
            {"event": "created", "version": 1, "id": "a"},
            {"event": "deleted", "version": 1, "id": "a"}
        ])))
        .is_success());
}
