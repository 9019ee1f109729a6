//! Positional helpers for ordered key-value collections.
//!
//! Every function here takes its collection by value and hands back a fresh
//! one, nothing is modified behind the caller's back. Keys passed in go through
//! [`Key::normalize`], so `"11"` finds the entry stored under `11`.
//!
//! Integer keys follow ordered-array conventions: slicing renumbers them from
//! 0 in each half and merging renumbers them across the result, while names
//! always keep their key.

use std::fmt::Display;

use thiserror::Error;

use crate::Split;

mod key;
mod map;

pub use key::Key;
pub use map::OrderedMap;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CollectionError {
  #[error("no index left to append under, i64::MAX is taken")]
  IndexExhausted,
}

pub type Result<T> = std::result::Result<T, CollectionError>;

pub const DEFAULT_SEPARATOR: &str = ", ";
pub const DEFAULT_CONJUNCTION: &str = " and ";

/// Number of entries in front of `key`, or `None` when `key` is not in the
/// collection.
pub fn key_offset<V>(key: impl Into<Key>, subject: &OrderedMap<V>) -> Option<usize> {
  subject.get_index_of(&key.into())
}

/// Splits `subject` into `(head, tail)` around the entry at `offset`.
///
/// With [`Split::After`] the entry at `offset` ends the head, with
/// [`Split::Before`] it starts the tail. Offsets past the end give back the
/// whole collection as the head and an empty tail.
///
/// ```
/// use the_util::{collection::split_at_offset, OrderedMap, Split};
///
/// let (head, tail) = split_at_offset(OrderedMap::from_values(["a", "b", "c"]), 0, Split::After);
/// assert_eq!(head, OrderedMap::from_values(["a"]));
/// assert_eq!(tail, OrderedMap::from_values(["b", "c"]));
/// ```
pub fn split_at_offset<V>(
  mut subject: OrderedMap<V>,
  offset: usize,
  place: Split,
) -> (OrderedMap<V>, OrderedMap<V>) {
  let cut = match place {
    Split::Before => offset,
    Split::After => offset.saturating_add(1),
  };
  let tail = subject.split_off(cut);
  (subject.renumber(), tail.renumber())
}

/// Splits `subject` into `(head, tail)` around `key`. A missing key gives
/// back `subject` untouched and an empty tail, whatever `place` says.
pub fn split_at_key<V>(
  subject: OrderedMap<V>,
  key: impl Into<Key>,
  place: Split,
) -> (OrderedMap<V>, OrderedMap<V>) {
  match key_offset(key, &subject) {
    Some(offset) => split_at_offset(subject, offset, place),
    None => (subject, OrderedMap::new()),
  }
}

/// Inserts `value` right after `key`, or appends it under the next free index
/// when `key` is missing. On success the result has one more entry than
/// `subject`.
///
/// Appending fails with [`CollectionError::IndexExhausted`] when `subject`
/// already uses `i64::MAX` as a key. Inserting after a present key renumbers
/// and never fails.
pub fn insert_after_key<V>(
  mut subject: OrderedMap<V>,
  key: impl Into<Key>,
  value: V,
) -> Result<OrderedMap<V>> {
  let Some(offset) = key_offset(key, &subject) else {
    subject
      .try_push(value)
      .map_err(|_| CollectionError::IndexExhausted)?;
    return Ok(subject);
  };

  let (head, tail) = split_at_offset(subject, offset, Split::After);
  Ok(head.merge(OrderedMap::from_values([value])).merge(tail))
}

/// Merges `values` in right after `key`, or onto the end when `key` is
/// missing. See [`OrderedMap::merge`] for how colliding keys are resolved.
pub fn merge_after_key<V>(
  subject: OrderedMap<V>,
  key: impl Into<Key>,
  values: OrderedMap<V>,
) -> OrderedMap<V> {
  let Some(offset) = key_offset(key, &subject) else {
    return subject.merge(values);
  };

  let (head, tail) = split_at_offset(subject, offset, Split::After);
  head.merge(values).merge(tail)
}

/// Keeps only the entries whose key is listed in `keys`. Listed keys that are
/// not in `subject` are ignored.
pub fn pick_keys<V, K: Into<Key>>(
  mut subject: OrderedMap<V>,
  keys: impl IntoIterator<Item = K>,
) -> OrderedMap<V> {
  let keys = collect_keys(keys);
  subject.retain(|key, _| keys.contains(key));
  subject
}

/// Removes the entries whose key is listed in `keys`.
pub fn drop_keys<V, K: Into<Key>>(
  mut subject: OrderedMap<V>,
  keys: impl IntoIterator<Item = K>,
) -> OrderedMap<V> {
  let keys = collect_keys(keys);
  subject.retain(|key, _| !keys.contains(key));
  subject
}

fn collect_keys<K: Into<Key>>(keys: impl IntoIterator<Item = K>) -> indexmap::IndexSet<Key> {
  keys.into_iter().map(Into::into).collect()
}

/// Buckets `values` by the key `key_fn` derives from each of them.
///
/// Groups appear in the order their key is first seen, and each group keeps
/// the input order of its values.
///
/// ```
/// use the_util::collection::group;
///
/// let grouped = group([1, 3, 4, 7, 8, 2], |v| if v % 2 == 0 { "even" } else { "odd" });
/// assert_eq!(grouped["odd"], [1, 3, 7]);
/// assert_eq!(grouped["even"], [4, 8, 2]);
/// ```
pub fn group<V, K: Into<Key>>(
  values: impl IntoIterator<Item = V>,
  mut key_fn: impl FnMut(&V) -> K,
) -> OrderedMap<Vec<V>> {
  let mut groups: OrderedMap<Vec<V>> = OrderedMap::new();
  for value in values {
    let key = key_fn(&value).into();
    match groups.get_mut(&key) {
      Some(group) => group.push(value),
      None => {
        groups.insert(key, vec![value]);
      },
    }
  }
  groups
}

/// Joins `items` into a phrase such as `"red, green and blue"`.
pub fn natural_join<T: Display>(items: &[T]) -> String {
  natural_join_with(items, DEFAULT_SEPARATOR, DEFAULT_CONJUNCTION)
}

/// Like [`natural_join`] with a custom separator and conjunction.
///
/// Up to two items are joined by `conjunction` alone, so an empty slice gives
/// an empty string and a single item gives just that item.
pub fn natural_join_with<T: Display>(items: &[T], separator: &str, conjunction: &str) -> String {
  let mut joined = String::new();
  let Some((last, rest)) = items.split_last() else {
    return joined;
  };

  for (i, item) in rest.iter().enumerate() {
    if i > 0 {
      joined.push_str(separator);
    }
    joined.push_str(&item.to_string());
  }
  if !rest.is_empty() {
    joined.push_str(conjunction);
  }
  joined.push_str(&last.to_string());
  joined
}
