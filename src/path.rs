//! Structural paths locating a problem inside the value being conformed.
//!
//! Paths are built from the outside in: a container conforms its items, and
//! then prefixes its own key onto every problem the item reported. The
//! [`JsonPath::prepend`] operation is therefore the primary way paths grow.

use std::fmt::{self, Display};

use serde_json::Value;

/// A segment of a path: a string key or an integer index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// An object or map key (e.g. `user`, `email`).
    Key(String),
    /// A tuple, array or map position (e.g. `[0]`).
    Index(usize),
}

impl PathSegment {
    /// Creates a key segment.
    pub fn key(name: impl Into<String>) -> Self {
        PathSegment::Key(name.into())
    }

    /// Creates an index segment.
    pub fn index(idx: usize) -> Self {
        PathSegment::Index(idx)
    }
}

impl From<&str> for PathSegment {
    fn from(name: &str) -> Self {
        PathSegment::Key(name.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(name: String) -> Self {
        PathSegment::Key(name)
    }
}

impl From<usize> for PathSegment {
    fn from(idx: usize) -> Self {
        PathSegment::Index(idx)
    }
}

/// Map keys may be any JSON value.
///
/// Strings become keys and non-negative integers become indices. Anything
/// else is rendered as JSON text and used as a key.
impl From<&Value> for PathSegment {
    fn from(key: &Value) -> Self {
        match key {
            Value::String(s) => PathSegment::Key(s.clone()),
            Value::Number(n) => match n.as_u64().and_then(|n| usize::try_from(n).ok()) {
                Some(idx) => PathSegment::Index(idx),
                None => PathSegment::Key(n.to_string()),
            },
            other => PathSegment::Key(other.to_string()),
        }
    }
}

impl From<Value> for PathSegment {
    fn from(key: Value) -> Self {
        PathSegment::from(&key)
    }
}

impl Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(name) => write!(f, "{}", name),
            PathSegment::Index(idx) => write!(f, "[{}]", idx),
        }
    }
}

/// A root-to-leaf path of [`PathSegment`]s.
///
/// # Example
///
/// ```rust
/// use conformer::JsonPath;
///
/// let inner = JsonPath::from_key("email");
/// let path = inner.prepend(&JsonPath::from_index(0)).prepend(&JsonPath::from_key("users"));
///
/// assert_eq!(path.to_string(), "users[0].email");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct JsonPath {
    segments: Vec<PathSegment>,
}

impl JsonPath {
    /// The empty path, pointing at the value being conformed.
    pub fn root() -> Self {
        Self::default()
    }

    /// A path with a single key segment.
    pub fn from_key(name: impl Into<String>) -> Self {
        Self {
            segments: vec![PathSegment::Key(name.into())],
        }
    }

    /// A path with a single index segment.
    pub fn from_index(idx: usize) -> Self {
        Self {
            segments: vec![PathSegment::Index(idx)],
        }
    }

    /// Returns a new path with a key segment appended.
    pub fn push_key(&self, name: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Key(name.into()));
        Self { segments }
    }

    /// Returns a new path with an index segment appended.
    pub fn push_index(&self, index: usize) -> Self {
        let mut segments = self.segments.clone();
        segments.push(PathSegment::Index(index));
        Self { segments }
    }

    /// Returns a new path with `prefix` in front of this path's segments.
    pub fn prepend(&self, prefix: &JsonPath) -> Self {
        let mut segments = Vec::with_capacity(prefix.len() + self.len());
        segments.extend(prefix.segments.iter().cloned());
        segments.extend(self.segments.iter().cloned());
        Self { segments }
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> impl Iterator<Item = &PathSegment> {
        self.segments.iter()
    }

    /// The path without its last segment, or `None` at the root.
    pub fn parent(&self) -> Option<Self> {
        let (_, init) = self.segments.split_last()?;
        Some(Self {
            segments: init.to_vec(),
        })
    }

    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }
}

impl<S: Into<PathSegment>> FromIterator<S> for JsonPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<PathSegment> for JsonPath {
    fn from(segment: PathSegment) -> Self {
        Self {
            segments: vec![segment],
        }
    }
}

impl From<Vec<PathSegment>> for JsonPath {
    fn from(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }
}

impl Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 && matches!(segment, PathSegment::Key(_)) {
                write!(f, ".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_root_path_is_empty() {
        let path = JsonPath::root();
        assert!(path.is_root());
        assert_eq!(path.len(), 0);
        assert_eq!(path.to_string(), "");
    }

    #[test]
    fn test_display_mixes_keys_and_indices() {
        let path = JsonPath::root()
            .push_key("body")
            .push_index(42)
            .push_key("items")
            .push_index(0)
            .push_index(1);
        assert_eq!(path.to_string(), "body[42].items[0][1]");
    }

    #[test]
    fn test_prepend_puts_prefix_first() {
        let leaf = JsonPath::from_index(0);
        let path = leaf.prepend(&JsonPath::from_key("a"));
        assert_eq!(path, JsonPath::from_iter(vec![PathSegment::key("a"), PathSegment::index(0)]));
    }

    #[test]
    fn test_prepend_root_is_identity() {
        let path = JsonPath::from_key("a").push_index(3);
        assert_eq!(path.prepend(&JsonPath::root()), path);
        assert_eq!(JsonPath::root().prepend(&path), path);
    }

    #[test]
    fn test_segment_from_json_keys() {
        assert_eq!(PathSegment::from(&json!("name")), PathSegment::key("name"));
        assert_eq!(PathSegment::from(&json!(7)), PathSegment::index(7));
        assert_eq!(PathSegment::from(&json!(-1)), PathSegment::key("-1"));
        assert_eq!(PathSegment::from(&json!(true)), PathSegment::key("true"));
    }

    #[test]
    fn test_parent_and_last() {
        let path = JsonPath::from_key("users").push_index(0);
        assert_eq!(path.last(), Some(&PathSegment::Index(0)));
        assert_eq!(path.parent(), Some(JsonPath::from_key("users")));
        assert!(JsonPath::root().parent().is_none());
    }
}
