//! Named record shapes.
//!
//! This module provides the [`ShapeRegistry`] type that stores named object
//! schemas. Discriminator detection and discriminated unions look shapes up
//! here by name.

use indexmap::IndexMap;
use parking_lot::RwLock;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::schema::{Conformed, ObjectSchema, SchemaLike};

/// Type alias for the shape storage map.
type ShapeMap = Arc<RwLock<IndexMap<String, Arc<ObjectSchema>>>>;

/// A thread-safe registry of named object schemas ("shapes").
///
/// Shapes are kept in registration order.
///
/// # Thread Safety
///
/// The registry uses `Arc<RwLock<...>>` for thread-safe access:
/// - Multiple threads can look shapes up concurrently (read-only access)
/// - Registration operations are serialized (write access)
///
/// Clones share the same storage.
///
/// # Example
///
/// ```rust
/// use conformer::{Pattern, Schema, ShapeRegistry};
/// use serde_json::json;
///
/// let registry = ShapeRegistry::new();
/// registry
///     .register("Circle", Schema::object(Pattern::new().item("type", "circle").item("r", Schema::number())))
///     .unwrap();
///
/// let result = registry.conform("Circle", &json!({"type": "circle", "r": 1})).unwrap();
/// assert!(result.is_success());
/// ```
#[derive(Clone, Default)]
pub struct ShapeRegistry {
    shapes: ShapeMap,
}

impl ShapeRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a shape with the given name.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateName` if the name is already registered.
    ///
    /// # Example
    ///
    /// ```rust
    /// use conformer::{Pattern, Schema, ShapeRegistry};
    ///
    /// let registry = ShapeRegistry::new();
    /// registry.register("Empty", Schema::object(Pattern::new())).unwrap();
    ///
    /// // Duplicate registration fails
    /// assert!(registry.register("Empty", Schema::object(Pattern::new())).is_err());
    /// ```
    pub fn register(&self, name: impl Into<String>, shape: ObjectSchema) -> Result<(), RegistryError> {
        let name = name.into();
        let mut shapes = self.shapes.write();

        if shapes.contains_key(&name) {
            return Err(RegistryError::DuplicateName(name));
        }

        tracing::debug!(shape = %name, fields = ?shape.field_names(), "registered shape");
        shapes.insert(name, Arc::new(shape));
        Ok(())
    }

    /// Retrieves a shape by name.
    pub fn get(&self, name: &str) -> Option<Arc<ObjectSchema>> {
        self.shapes.read().get(name).cloned()
    }

    /// Retrieves a shape by name, failing if it is not registered.
    pub fn resolve(&self, name: &str) -> Result<Arc<ObjectSchema>, RegistryError> {
        self.get(name)
            .ok_or_else(|| RegistryError::UnknownShape(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.shapes.read().contains_key(name)
    }

    /// The registered names, in registration order.
    pub fn names(&self) -> Vec<String> {
        self.shapes.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.shapes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.read().is_empty()
    }

    /// The named shape with every key optional.
    ///
    /// # Example
    ///
    /// ```rust
    /// use conformer::{Pattern, Schema, SchemaLike, ShapeRegistry};
    /// use serde_json::json;
    ///
    /// let registry = ShapeRegistry::new();
    /// registry.register("User", Schema::object(Pattern::new().item("name", Schema::string()))).unwrap();
    ///
    /// let patch = registry.partial("User").unwrap();
    /// assert!(patch.conform(Some(&json!({}))).is_success());
    /// ```
    pub fn partial(&self, name: &str) -> Result<ObjectSchema, RegistryError> {
        Ok(self.resolve(name)?.partial())
    }

    /// The named shape with every key, recursively, also accepting `null`.
    pub fn deep_nullable(&self, name: &str) -> Result<ObjectSchema, RegistryError> {
        Ok(self.resolve(name)?.deep_nullable())
    }

    /// Conforms `value` against the named shape.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::UnknownShape` if the name is not registered.
    pub fn conform(&self, name: &str, value: &Value) -> Result<Conformed, RegistryError> {
        Ok(self.resolve(name)?.conform(Some(value)))
    }

    /// Exports every shape as a JSON Schema document with `$defs`.
    pub fn to_json_schema(&self) -> Value {
        let shapes = self.shapes.read();
        let mut defs = serde_json::Map::new();

        for (name, shape) in shapes.iter() {
            defs.insert(name.clone(), shape.to_json_schema().unwrap_or(json!({})));
        }

        json!({
            "$schema": "https://json-schema.org/draft/2020-12/schema",
            "$defs": defs
        })
    }
}

/// Errors that can occur during registry operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Attempted to register a shape with a name that already exists.
    #[error("shape '{0}' already registered")]
    DuplicateName(String),

    /// Attempted to use a shape name that doesn't exist.
    #[error("shape '{0}' not found")]
    UnknownShape(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Pattern, Schema};

    fn registry() -> ShapeRegistry {
        let registry = ShapeRegistry::new();
        registry
            .register("A", Schema::object(Pattern::new().item("type", "A").item("a", json!(1))))
            .unwrap();
        registry
            .register("B", Schema::object(Pattern::new().item("type", "B")))
            .unwrap();
        registry
    }

    #[test]
    fn test_register_and_get() {
        let registry = registry();
        assert_eq!(registry.len(), 2);
        assert!(registry.contains("A"));
        assert_eq!(registry.get("A").unwrap().field_names(), vec!["type", "a"]);
        assert!(registry.get("C").is_none());
    }

    #[test]
    fn test_duplicate_name() {
        let registry = registry();
        assert_eq!(
            registry.register("A", Schema::object(Pattern::new())),
            Err(RegistryError::DuplicateName("A".to_string()))
        );
    }

    #[test]
    fn test_names_keep_registration_order() {
        let registry = registry();
        registry.register("0", Schema::object(Pattern::new())).unwrap();
        assert_eq!(registry.names(), vec!["A", "B", "0"]);
    }

    #[test]
    fn test_clones_share_storage() {
        let registry = registry();
        let clone = registry.clone();
        clone.register("C", Schema::object(Pattern::new())).unwrap();
        assert!(registry.contains("C"));
    }

    #[test]
    fn test_unknown_shape() {
        let registry = registry();
        assert_eq!(
            registry.conform("Z", &json!({})).unwrap_err(),
            RegistryError::UnknownShape("Z".to_string())
        );
        assert!(registry.partial("Z").is_err());
        assert!(registry.deep_nullable("Z").is_err());
    }

    #[test]
    fn test_conform_named_shape() {
        let registry = registry();
        assert!(registry.conform("A", &json!({"type": "A", "a": 1})).unwrap().is_success());
        assert!(registry.conform("A", &json!({"type": "B"})).unwrap().is_failure());
    }

    #[test]
    fn test_partial_and_deep_nullable_views() {
        let registry = registry();

        let partial = registry.partial("A").unwrap();
        assert!(partial.conform(Some(&json!({"a": 1}))).is_success());

        let nullable = registry.deep_nullable("A").unwrap();
        assert!(nullable.conform(Some(&json!({"type": null, "a": null}))).is_success());
        assert!(nullable.conform(Some(&json!({"type": null}))).is_failure());
    }

    #[test]
    fn test_json_schema_export() {
        let registry = registry();
        let doc = registry.to_json_schema();
        assert_eq!(doc["$defs"]["B"]["properties"]["type"], json!({"const": "B"}));
    }
}
