use std::{
  borrow::Cow,
  fmt,
};

/// A key in an [`OrderedMap`](super::OrderedMap).
///
/// Keys are either integer indices or names. Strings are normalized on the
/// way in: a string holding a canonical decimal integer is the same key as
/// that integer, so `Key::from("11") == Key::from(11)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
  Index(i64),
  Name(String),
}

impl Key {
  /// Turns a string into a key. This is the only place string keys are
  /// interpreted, every lookup and insert goes through it.
  ///
  /// `"42"` and `"-7"` become indices. `"042"`, `"+1"`, `"-0"`, `"1.5"`,
  /// `" 1"` and integers that overflow `i64` stay names.
  pub fn normalize(name: &str) -> Key {
    match canonical_index(name) {
      Some(index) => Key::Index(index),
      None => Key::Name(name.to_owned()),
    }
  }

  pub fn as_index(&self) -> Option<i64> {
    match self {
      Key::Index(index) => Some(*index),
      Key::Name(_) => None,
    }
  }

  pub fn as_name(&self) -> Option<&str> {
    match self {
      Key::Index(_) => None,
      Key::Name(name) => Some(name),
    }
  }

  pub fn is_index(&self) -> bool {
    matches!(self, Key::Index(_))
  }
}

fn canonical_index(name: &str) -> Option<i64> {
  let digits = name.strip_prefix('-').unwrap_or(name);
  if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
    return None;
  }
  // leading zeros and negative zero are not canonical
  if (digits.len() > 1 && digits.starts_with('0')) || name == "-0" {
    return None;
  }
  name.parse().ok()
}

impl fmt::Display for Key {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Key::Index(index) => write!(f, "{index}"),
      Key::Name(name) => f.write_str(name),
    }
  }
}

macro_rules! impl_from_int {
  ($($ty:ty),*) => {
    $(
      impl From<$ty> for Key {
        fn from(index: $ty) -> Self {
          Key::Index(i64::from(index))
        }
      }
    )*
  };
}

/// Integers that may not fit an index key. Those that don't become names,
/// the same way an out of range numeric string does.
macro_rules! impl_from_wide_int {
  ($($ty:ty),*) => {
    $(
      impl From<$ty> for Key {
        fn from(index: $ty) -> Self {
          match i64::try_from(index) {
            Ok(index) => Key::Index(index),
            Err(_) => Key::Name(index.to_string()),
          }
        }
      }
    )*
  };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);
impl_from_wide_int!(u64, usize, isize, i128, u128);

impl From<bool> for Key {
  fn from(value: bool) -> Self {
    Key::Index(value as i64)
  }
}

impl From<&str> for Key {
  fn from(name: &str) -> Self {
    Key::normalize(name)
  }
}

impl From<String> for Key {
  fn from(name: String) -> Self {
    match canonical_index(&name) {
      Some(index) => Key::Index(index),
      None => Key::Name(name),
    }
  }
}

impl From<Cow<'_, str>> for Key {
  fn from(name: Cow<'_, str>) -> Self {
    Key::from(name.into_owned())
  }
}

impl From<char> for Key {
  fn from(name: char) -> Self {
    Key::normalize(name.encode_utf8(&mut [0; 4]))
  }
}

impl From<&Key> for Key {
  fn from(key: &Key) -> Self {
    key.clone()
  }
}
