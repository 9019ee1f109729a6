//! Small stateless helpers for ordered key-value collections, text, numbers
//! and locked file I/O.

use smartstring::{
  LazyCompact,
  SmartString,
};

pub mod collection;
pub mod debug;
pub mod file;
pub mod func;
pub mod num;
pub mod stream;
pub mod text;

pub use collection::{
  Key,
  OrderedMap,
};

pub type Tendril = SmartString<LazyCompact>;

/// Which side of a split point the split point itself ends up on.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Split {
  /// Cut in front of the split point, so it starts the tail.
  Before,
  /// Cut behind the split point, so it ends the head.
  #[default]
  After,
}
