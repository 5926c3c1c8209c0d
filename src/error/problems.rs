//! Validation problems.
//!
//! This module provides [`Problem`] for a single validation failure and
//! [`Problems`] for the ordered, mergeable collection every schema returns
//! when a value does not conform.

use std::fmt::{self, Display};

use stillwater::prelude::*;

use crate::path::JsonPath;

/// A single validation failure, located relative to the conformed root.
///
/// # Example
///
/// ```rust
/// use conformer::{JsonPath, Problem};
///
/// let problem = Problem::new(JsonPath::from_key("email"), "No value");
/// assert_eq!(problem.to_string(), "email: No value");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Problem {
    /// Where in the conformed value the failure occurred.
    pub path: JsonPath,
    /// Human-readable description of the failure.
    pub message: String,
}

impl Problem {
    pub fn new(path: JsonPath, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
        }
    }

    /// A problem at the root path.
    pub fn at_root(message: impl Into<String>) -> Self {
        Self::new(JsonPath::root(), message)
    }

    /// Returns the same problem with `prefix` in front of its path.
    pub fn prefix_path(self, prefix: &JsonPath) -> Self {
        Self {
            path: self.path.prepend(prefix),
            message: self.message,
        }
    }
}

impl Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_root() {
            write!(f, "(root): {}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

impl std::error::Error for Problem {}

/// An ordered collection of [`Problem`]s.
///
/// `Problems` has value semantics: [`merge`](Problems::merge) and
/// [`prefix_path`](Problems::prefix_path) consume their receiver and return a
/// new collection. The empty collection is the identity of `merge`, and a
/// non-empty collection is what a failed conform returns.
///
/// # Example
///
/// ```rust
/// use conformer::{JsonPath, Problems};
///
/// let inner = Problems::failure("expected 1 but got number: 2");
/// let outer = inner.prefix_path(&JsonPath::from_index(0)).prefix_path(&JsonPath::from_index(3));
///
/// assert_eq!(outer.first().unwrap().path.to_string(), "[3][0]");
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Problems(Vec<Problem>);

impl Problems {
    /// The empty collection.
    pub fn none() -> Self {
        Self(Vec::new())
    }

    pub fn single(problem: Problem) -> Self {
        Self(vec![problem])
    }

    /// One problem at the root path.
    pub fn failure(message: impl Into<String>) -> Self {
        Self::single(Problem::at_root(message))
    }

    /// One problem at `path`.
    pub fn at(path: impl Into<JsonPath>, message: impl Into<String>) -> Self {
        Self::single(Problem::new(path.into(), message))
    }

    pub fn from_vec(problems: Vec<Problem>) -> Self {
        Self(problems)
    }

    /// Concatenates `other` after `self`, preserving order.
    pub fn merge(mut self, other: Problems) -> Self {
        self.0.extend(other.0);
        self
    }

    /// Prepends `prefix` to the path of every contained problem.
    pub fn prefix_path(self, prefix: &JsonPath) -> Self {
        if prefix.is_root() {
            return self;
        }
        Self(self.0.into_iter().map(|p| p.prefix_path(prefix)).collect())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// An empty collection signals success.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Problem> {
        self.0.iter()
    }

    pub fn first(&self) -> Option<&Problem> {
        self.0.first()
    }

    /// Returns all problems located exactly at `path`.
    pub fn at_path(&self, path: &JsonPath) -> Vec<&Problem> {
        self.0.iter().filter(|p| &p.path == path).collect()
    }

    pub fn messages(&self) -> Vec<&str> {
        self.0.iter().map(|p| p.message.as_str()).collect()
    }

    pub fn into_vec(self) -> Vec<Problem> {
        self.0
    }
}

impl Semigroup for Problems {
    fn combine(self, other: Self) -> Self {
        self.merge(other)
    }
}

impl From<Problem> for Problems {
    fn from(problem: Problem) -> Self {
        Self::single(problem)
    }
}

impl FromIterator<Problem> for Problems {
    fn from_iter<I: IntoIterator<Item = Problem>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Display for Problems {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Conforming failed with {} problem(s):", self.len())?;
        for (i, problem) in self.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, problem)?;
        }
        Ok(())
    }
}

impl std::error::Error for Problems {}

impl IntoIterator for Problems {
    type Item = Problem;
    type IntoIter = std::vec::IntoIter<Problem>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Problems {
    type Item = &'a Problem;
    type IntoIter = std::slice::Iter<'a, Problem>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// Schemas are shared across threads, and so are the reports they produce.
const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Problems>();
    assert_sync::<Problems>();
};


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::path::PathSegment;
    use proptest::prelude::*;

    fn segment() -> impl Strategy<Value = PathSegment> {
        prop_oneof![
            "[a-z]{1,6}".prop_map(PathSegment::Key),
            (0usize..16).prop_map(PathSegment::Index),
        ]
    }

    fn path() -> impl Strategy<Value = JsonPath> {
        prop::collection::vec(segment(), 0..4).prop_map(JsonPath::from)
    }

    fn problems() -> impl Strategy<Value = Problems> {
        prop::collection::vec((path(), "[a-z ]{0,12}"), 0..5).prop_map(|items| {
            items
                .into_iter()
                .map(|(path, message)| Problem::new(path, message))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn merge_with_empty_is_identity(p in problems()) {
            prop_assert_eq!(p.clone().merge(Problems::none()), p.clone());
            prop_assert_eq!(Problems::none().merge(p.clone()), p);
        }

        #[test]
        fn merge_is_associative(a in problems(), b in problems(), c in problems()) {
            let left = a.clone().merge(b.clone()).merge(c.clone());
            let right = a.merge(b.merge(c));
            prop_assert_eq!(left, right);
        }

        #[test]
        fn prefixing_twice_prefixes_outer_first(p in problems(), a in path(), b in path()) {
            let twice = p.clone().prefix_path(&a).prefix_path(&b);
            let once = p.prefix_path(&a.prepend(&b));
            prop_assert_eq!(twice, once);
        }
    }
}
