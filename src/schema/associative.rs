//! The associative conforming engine.
//!
//! Objects, tuples and maps are all key-indexed containers. [`Associative`]
//! captures the handful of operations the engine needs, and
//! [`conform_in_place`] is the one algorithm that conforms any of them against
//! a list of per-key schemas under the configured item policies.

use serde_json::{Map, Value};
use stillwater::Validation;

use crate::behaviour::{MissingItemBehaviour, UnexpectedItemBehaviour};
use crate::error::Problems;
use crate::path::{JsonPath, PathSegment};

use super::traits::{literal_eq, non_empty, type_description, SchemaLike, SchemaRef};

/// A key-indexed container the engine can read and rewrite.
pub trait Associative<K> {
    fn get(&self, key: &K) -> Option<&Value>;

    /// Inserts or replaces the value at `key`.
    fn set(&mut self, key: K, value: Value);

    fn has(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Removes the value at `key`, returning whether one was present.
    fn delete(&mut self, key: &K) -> bool;

    /// The keys currently present, in container order.
    fn keys(&self) -> Vec<K>;

    /// Whether `a` and `b` name the same item.
    fn same_key(&self, a: &K, b: &K) -> bool
    where
        K: PartialEq,
    {
        a == b
    }
}

/// Conforms `target` against `item_schemas`, writing conformed values back.
///
/// For each `(key, schema)` in order, the schema conforms the value at `key`.
/// A key that is absent and fails is reported as `"No value"`, unless the
/// schema is optional or `missing` is [`MissingItemBehaviour::Ignore`]. Any
/// other failure is reported with `key` prefixed to its paths. A success that
/// produced a value is written back with [`Associative::set`], so `target` is
/// normalized in place.
///
/// Keys on `target` that no schema covered are then handled according to
/// `unexpected`. The set of such keys is taken before anything is conformed,
/// so deleting them cannot disturb the iteration.
///
/// # Example
///
/// ```rust
/// use conformer::{
///     conform_in_place, MissingItemBehaviour, Schema, SchemaExt, UnexpectedItemBehaviour,
/// };
/// use serde_json::{json, Map, Value};
///
/// let schemas = vec![("a".to_string(), Schema::eq(1).shared())];
/// let mut target: Map<String, Value> = json!({"a": 1, "b": 2}).as_object().unwrap().clone();
///
/// let result = conform_in_place(
///     UnexpectedItemBehaviour::Delete,
///     MissingItemBehaviour::Problem,
///     &mut target,
///     schemas.iter().map(|(k, s)| (k.clone(), s)),
/// );
///
/// assert!(result.is_success());
/// assert_eq!(Value::Object(target), json!({"a": 1}));
/// ```
pub fn conform_in_place<'a, K, A, I>(
    unexpected: UnexpectedItemBehaviour,
    missing: MissingItemBehaviour,
    target: &mut A,
    item_schemas: I,
) -> Validation<(), Problems>
where
    K: Clone + PartialEq + Into<PathSegment>,
    A: Associative<K> + ?Sized,
    I: IntoIterator<Item = (K, &'a SchemaRef)>,
{
    let mut problems = Problems::none();
    let mut unmatched = target.keys();

    for (key, schema) in item_schemas {
        let conformed = schema.conform(target.get(&key));

        if conformed.is_failure() && !target.has(&key) {
            if !schema.is_optional() && missing != MissingItemBehaviour::Ignore {
                problems = problems.merge(Problems::at(key_path(&key), "No value"));
            }
            continue;
        }
        unmatched.retain(|k| !target.same_key(k, &key));

        match conformed {
            Validation::Failure(p) => {
                problems = problems.merge(non_empty(p).prefix_path(&key_path(&key)))
            }
            Validation::Success(Some(value)) => target.set(key, value),
            Validation::Success(None) => {}
        }
    }

    for key in unmatched {
        match unexpected {
            UnexpectedItemBehaviour::Ignore => {}
            UnexpectedItemBehaviour::Delete => {
                let path = key_path(&key);
                if target.delete(&key) {
                    tracing::trace!(item = %path, "deleted unexpected item");
                }
            }
            UnexpectedItemBehaviour::Problem => {
                problems = problems.merge(Problems::at(key_path(&key), "Unexpected item"));
            }
        }
    }

    if problems.is_empty() {
        Validation::Success(())
    } else {
        Validation::Failure(problems)
    }
}

fn key_path<K: Clone + Into<PathSegment>>(key: &K) -> JsonPath {
    JsonPath::from(key.clone().into())
}

impl Associative<String> for Map<String, Value> {
    fn get(&self, key: &String) -> Option<&Value> {
        Map::get(self, key)
    }

    fn set(&mut self, key: String, value: Value) {
        self.insert(key, value);
    }

    fn has(&self, key: &String) -> bool {
        self.contains_key(key)
    }

    fn delete(&mut self, key: &String) -> bool {
        self.remove(key).is_some()
    }

    fn keys(&self) -> Vec<String> {
        Map::keys(self).cloned().collect()
    }
}

/// Tuple items, indexed by position.
///
/// Deleting an item leaves a hole rather than shifting later items, so
/// positions stay stable while the engine works. [`TupleSlots::into_vec`]
/// drops trailing holes and turns interior holes into `null`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TupleSlots {
    slots: Vec<Option<Value>>,
}

impl TupleSlots {
    pub fn into_vec(self) -> Vec<Value> {
        let mut slots = self.slots;
        while matches!(slots.last(), Some(None)) {
            slots.pop();
        }
        slots
            .into_iter()
            .map(|slot| slot.unwrap_or(Value::Null))
            .collect()
    }
}

impl From<Vec<Value>> for TupleSlots {
    fn from(items: Vec<Value>) -> Self {
        Self {
            slots: items.into_iter().map(Some).collect(),
        }
    }
}

impl Associative<usize> for TupleSlots {
    fn get(&self, key: &usize) -> Option<&Value> {
        self.slots.get(*key).and_then(Option::as_ref)
    }

    fn set(&mut self, key: usize, value: Value) {
        if key >= self.slots.len() {
            self.slots.resize(key + 1, None);
        }
        self.slots[key] = Some(value);
    }

    fn delete(&mut self, key: &usize) -> bool {
        self.slots
            .get_mut(*key)
            .map(|slot| slot.take().is_some())
            .unwrap_or(false)
    }

    fn keys(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(|(i, _)| i)
            .collect()
    }
}

/// Map entries with arbitrary JSON keys, kept in insertion order.
///
/// In JSON a map is written as an array of `[key, value]` pairs, which lets
/// keys be numbers, booleans or even objects.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapEntries {
    entries: Vec<(Value, Value)>,
}

impl MapEntries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `[[key, value], ...]`.
    ///
    /// Items that are not pairs, and keys seen before, are reported at their
    /// index.
    pub fn from_pairs(items: &[Value]) -> Result<Self, Problems> {
        let mut entries = MapEntries::new();
        let mut problems = Problems::none();

        for (i, item) in items.iter().enumerate() {
            match item.as_array().map(Vec::as_slice) {
                Some([key, _]) if entries.has(key) => {
                    problems = problems.merge(Problems::at(
                        JsonPath::from_index(i),
                        format!("duplicate key {}", key),
                    ));
                }
                Some([key, value]) => entries.entries.push((key.clone(), value.clone())),
                _ => {
                    problems = problems.merge(Problems::at(
                        JsonPath::from_index(i),
                        format!("expected a [key, value] pair but got {}", type_description(Some(item))),
                    ));
                }
            }
        }

        if problems.is_empty() {
            Ok(entries)
        } else {
            Err(problems)
        }
    }

    /// Writes the entries back out as `[[key, value], ...]`.
    pub fn into_pairs(self) -> Vec<Value> {
        self.entries
            .into_iter()
            .map(|(k, v)| Value::Array(vec![k, v]))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(Value, Value)> for MapEntries {
    fn from_iter<I: IntoIterator<Item = (Value, Value)>>(iter: I) -> Self {
        let mut entries = MapEntries::new();
        for (k, v) in iter {
            entries.set(k, v);
        }
        entries
    }
}

impl Associative<Value> for MapEntries {
    fn get(&self, key: &Value) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| literal_eq(k, key))
            .map(|(_, v)| v)
    }

    fn set(&mut self, key: Value, value: Value) {
        match self.entries.iter_mut().find(|(k, _)| literal_eq(k, &key)) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key, value)),
        }
    }

    fn delete(&mut self, key: &Value) -> bool {
        match self.entries.iter().position(|(k, _)| literal_eq(k, key)) {
            Some(i) => {
                self.entries.remove(i);
                true
            }
            None => false,
        }
    }

    fn keys(&self) -> Vec<Value> {
        self.entries.iter().map(|(k, _)| k.clone()).collect()
    }

    fn same_key(&self, a: &Value, b: &Value) -> bool {
        literal_eq(a, b)
    }
}
