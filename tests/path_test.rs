//! Integration tests for JsonPath.

use conformer::{JsonPath, PathSegment, Problem, Problems};
use serde_json::json;

#[test]
fn test_path_construction_and_display() {
    // Root path
    assert_eq!(JsonPath::root().to_string(), "");

    // Simple key
    assert_eq!(JsonPath::root().push_key("name").to_string(), "name");

    // Simple index
    assert_eq!(JsonPath::root().push_index(0).to_string(), "[0]");

    // Complex nested path
    let path = JsonPath::root()
        .push_key("users")
        .push_index(0)
        .push_key("address")
        .push_key("city");
    assert_eq!(path.to_string(), "users[0].address.city");
}

#[test]
fn test_paths_grow_from_the_outside_in() {
    let leaf = Problems::at(JsonPath::from_key("city"), "No value");

    let reported = leaf
        .prefix_path(&JsonPath::from_key("address"))
        .prefix_path(&JsonPath::from_index(0))
        .prefix_path(&JsonPath::from_key("users"));

    assert_eq!(
        reported.first().unwrap().path.to_string(),
        "users[0].address.city"
    );
}

#[test]
fn test_path_from_segments() {
    let path: JsonPath = vec![PathSegment::key("a"), PathSegment::index(1)].into();
    assert_eq!(path.len(), 2);
    assert_eq!(path, JsonPath::from_iter(["a"]).push_index(1));
}

#[test]
fn test_map_keys_as_segments() {
    let path: JsonPath = [json!("name"), json!(3), json!({"k": 1})].iter().collect();
    assert_eq!(
        path.segments().cloned().collect::<Vec<_>>(),
        vec![
            PathSegment::key("name"),
            PathSegment::index(3),
            PathSegment::key(r#"{"k":1}"#),
        ]
    );
}

#[test]
fn test_problem_display() {
    assert_eq!(Problem::at_root("bad").to_string(), "(root): bad");
    assert_eq!(
        Problem::new(JsonPath::from_key("a").push_index(2), "bad").to_string(),
        "a[2]: bad"
    );
}
