//! Conforming a value nested inside objects.

use std::sync::Arc;

use serde_json::Value;
use stillwater::Validation;

use crate::error::Problems;
use crate::path::JsonPath;

use super::traits::{type_description, Conformed, SchemaLike, SchemaRef};

/// Conforms the value found at `path` and returns it in place of the input.
///
/// Each step of the path descends into an object. A missing key makes the
/// rest of the path absent, so the inner schema decides whether that is
/// acceptable. Stepping into anything other than an object is a problem at the
/// path walked so far.
///
/// # Example
///
/// ```rust
/// use conformer::{Schema, SchemaLike};
/// use serde_json::json;
///
/// let city = Schema::select(&["address", "city"], Schema::string());
///
/// let input = json!({"address": {"city": "Oslo"}, "name": "x"});
/// assert_eq!(city.conform(Some(&input)).into_result().unwrap(), Some(json!("Oslo")));
///
/// let problems = city.conform(Some(&json!({"address": {"city": 7}}))).into_result().unwrap_err();
/// assert_eq!(problems.first().unwrap().path.to_string(), "address.city");
/// ```
#[derive(Clone)]
pub struct SelectSchema {
    path: Vec<String>,
    inner: SchemaRef,
}

impl SelectSchema {
    pub fn new<S: SchemaLike + 'static>(path: &[&str], inner: S) -> Self {
        Self {
            path: path.iter().map(|key| key.to_string()).collect(),
            inner: Arc::new(inner),
        }
    }

    pub fn path(&self) -> JsonPath {
        self.path.iter().map(String::as_str).collect()
    }
}

impl SchemaLike for SelectSchema {
    fn conform(&self, value: Option<&Value>) -> Conformed {
        let mut current = value;
        let mut walked = JsonPath::root();

        for key in &self.path {
            current = match current {
                None => None,
                Some(Value::Object(map)) => map.get(key),
                Some(other) => {
                    return Validation::Failure(Problems::at(
                        walked,
                        format!("expected an object but got {}", type_description(Some(other))),
                    ));
                }
            };
            walked = walked.push_key(key.as_str());
        }

        match self.inner.conform(current) {
            Validation::Failure(problems) => Validation::Failure(problems.prefix_path(&walked)),
            success => success,
        }
    }
}
