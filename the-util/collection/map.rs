use std::{
  fmt,
  ops::Index,
};

use indexmap::{
  IndexMap,
  map,
};

use super::Key;

/// An insertion-ordered map with unique [`Key`]s.
///
/// Iteration order is insertion order. Replacing the value of an existing key
/// keeps its position. Appending with [`OrderedMap::try_push`] picks the next
/// free index, one past the largest index key ever inserted (0 for a map
/// without index keys). Once `i64::MAX` has been used as a key there is no
/// next index and appending fails.
///
/// Equality is order-sensitive: two maps are equal when they hold the same
/// entries in the same order.
#[derive(Clone)]
pub struct OrderedMap<V> {
  entries:    IndexMap<Key, V>,
  next_index: Option<i64>,
}

impl<V> OrderedMap<V> {
  pub fn new() -> Self {
    Self::with_capacity(0)
  }

  pub fn with_capacity(capacity: usize) -> Self {
    Self {
      entries:    IndexMap::with_capacity(capacity),
      next_index: Some(0),
    }
  }

  /// Builds a list-like map, values keyed `0, 1, 2, ...`.
  pub fn from_values(values: impl IntoIterator<Item = V>) -> Self {
    renumbered(values.into_iter().map(|value| (Key::Index(0), value)), 0)
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn get(&self, key: impl Into<Key>) -> Option<&V> {
    self.entries.get(&key.into())
  }

  pub fn get_mut(&mut self, key: impl Into<Key>) -> Option<&mut V> {
    self.entries.get_mut(&key.into())
  }

  pub fn contains_key(&self, key: impl Into<Key>) -> bool {
    self.entries.contains_key(&key.into())
  }

  /// Position of `key` in iteration order.
  pub fn get_index_of(&self, key: &Key) -> Option<usize> {
    self.entries.get_index_of(key)
  }

  pub fn get_index(&self, offset: usize) -> Option<(&Key, &V)> {
    self.entries.get_index(offset)
  }

  pub fn iter(&self) -> map::Iter<'_, Key, V> {
    self.entries.iter()
  }

  pub fn keys(&self) -> map::Keys<'_, Key, V> {
    self.entries.keys()
  }

  pub fn values(&self) -> map::Values<'_, Key, V> {
    self.entries.values()
  }

  pub fn into_values(self) -> map::IntoValues<Key, V> {
    self.entries.into_values()
  }

  /// The index [`OrderedMap::try_push`] would use next, `None` when the index
  /// space is used up.
  pub fn next_index(&self) -> Option<i64> {
    self.next_index
  }

  /// Appends `value` under the next free index and returns that key. Hands
  /// `value` back when there is no next index.
  pub fn try_push(&mut self, value: V) -> Result<Key, V> {
    let Some(index) = self.next_index else {
      return Err(value);
    };
    let key = Key::Index(index);
    self.insert(key.clone(), value);
    Ok(key)
  }

  /// Sets the value of `key`. An existing key keeps its position and the old
  /// value is returned, a new key is appended.
  pub fn insert(&mut self, key: impl Into<Key>, value: V) -> Option<V> {
    let key = key.into();
    if let Key::Index(index) = key {
      self.next_index = self
        .next_index
        .zip(index.checked_add(1))
        .map(|(next, after)| next.max(after));
    }
    self.entries.insert(key, value)
  }

  /// Removes `key`, shifting the following entries down by one position.
  pub fn shift_remove(&mut self, key: impl Into<Key>) -> Option<V> {
    self.entries.shift_remove(&key.into())
  }

  pub fn retain(&mut self, mut keep: impl FnMut(&Key, &V) -> bool) {
    self.entries.retain(|key, value| keep(key, value));
  }

  /// Concatenates two maps.
  ///
  /// Index keys of both maps are renumbered from 0 in result order. A name
  /// that appears in both keeps its first position and takes the value from
  /// `other`.
  pub fn merge(self, other: OrderedMap<V>) -> OrderedMap<V> {
    let capacity = self.len() + other.len();
    renumbered(self.entries.into_iter().chain(other.entries), capacity)
  }

  /// Reassigns index keys to `0, 1, 2, ...` in iteration order. Names are
  /// left alone.
  pub fn renumber(self) -> OrderedMap<V> {
    let capacity = self.len();
    renumbered(self.entries, capacity)
  }

  /// Splits off every entry from position `at` onwards. `at` past the end
  /// leaves `self` untouched and returns an empty map.
  pub(crate) fn split_off(&mut self, at: usize) -> OrderedMap<V> {
    let at = at.min(self.len());
    let tail = self.entries.split_off(at);
    let next_index = max_next_index(tail.keys());
    OrderedMap {
      entries: tail,
      next_index,
    }
  }
}

fn max_next_index<'a>(keys: impl Iterator<Item = &'a Key>) -> Option<i64> {
  keys
    .filter_map(Key::as_index)
    .try_fold(0, |next: i64, index| Some(next.max(index.checked_add(1)?)))
}

/// Collects `entries`, giving index keys `0, 1, 2, ...` in order. A repeated
/// name keeps its first position and takes the last value.
fn renumbered<V>(entries: impl IntoIterator<Item = (Key, V)>, capacity: usize) -> OrderedMap<V> {
  let mut renumbered = IndexMap::with_capacity(capacity);
  let mut next = 0;
  for (key, value) in entries {
    match key {
      Key::Index(_) => {
        renumbered.insert(Key::Index(next), value);
        next += 1;
      },
      name @ Key::Name(_) => {
        renumbered.insert(name, value);
      },
    }
  }
  OrderedMap {
    entries:    renumbered,
    next_index: Some(next),
  }
}

impl<V> Default for OrderedMap<V> {
  fn default() -> Self {
    Self::new()
  }
}

impl<V: fmt::Debug> fmt::Debug for OrderedMap<V> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_map().entries(self.entries.iter()).finish()
  }
}

impl<V: PartialEq> PartialEq for OrderedMap<V> {
  fn eq(&self, other: &Self) -> bool {
    self.len() == other.len() && self.entries.iter().eq(other.entries.iter())
  }
}

impl<V: Eq> Eq for OrderedMap<V> {}

impl<K, V> Index<K> for OrderedMap<V>
where
  K: Into<Key>,
{
  type Output = V;

  fn index(&self, key: K) -> &V {
    let key = key.into();
    match self.entries.get(&key) {
      Some(value) => value,
      None => panic!("key {key} not found in OrderedMap"),
    }
  }
}

impl<K: Into<Key>, V> FromIterator<(K, V)> for OrderedMap<V> {
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    let mut map = OrderedMap::new();
    map.extend(iter);
    map
  }
}

impl<K: Into<Key>, V> Extend<(K, V)> for OrderedMap<V> {
  fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
    for (key, value) in iter {
      self.insert(key, value);
    }
  }
}

impl<V> IntoIterator for OrderedMap<V> {
  type IntoIter = map::IntoIter<Key, V>;
  type Item = (Key, V);

  fn into_iter(self) -> Self::IntoIter {
    self.entries.into_iter()
  }
}

impl<'a, V> IntoIterator for &'a OrderedMap<V> {
  type IntoIter = map::Iter<'a, Key, V>;
  type Item = (&'a Key, &'a V);

  fn into_iter(self) -> Self::IntoIter {
    self.entries.iter()
  }
}
