use std::iter::FusedIterator;

use super::{
  Result,
  lock::{
    self,
    LockKind,
  },
};
use crate::stream::Handle;

/// A lazy sequence of records read from an open file.
///
/// Every item comes from calling the producer against the handle, which
/// returns `None` once there is nothing left. The handle and its lock are
/// released as soon as the sequence ends, when a producer error is yielded,
/// on [`Records::close`], or on drop, whichever comes first.
pub struct Records<F> {
  handle: Option<Handle>,
  lock:   Option<LockKind>,
  next:   F,
}

impl<F> Records<F> {
  pub(crate) fn new(handle: Handle, lock: Option<LockKind>, next: F) -> Result<Self> {
    if let Some(kind) = lock {
      lock::lock(handle.as_file(), kind)?;
    }
    Ok(Self {
      handle: Some(handle),
      lock,
      next,
    })
  }

  /// Whether the file is still held open.
  pub fn is_open(&self) -> bool {
    self.handle.is_some()
  }

  /// Stops early, releasing the lock and closing the file.
  pub fn close(mut self) -> Result<()> {
    self.finish()
  }

  fn finish(&mut self) -> Result<()> {
    let Some(handle) = self.handle.take() else {
      return Ok(());
    };
    if self.lock.take().is_some() {
      lock::unlock(handle.as_file())?;
    }
    Ok(())
  }
}

impl<F, T> Iterator for Records<F>
where
  F: FnMut(&mut Handle) -> Option<Result<T>>,
{
  type Item = Result<T>;

  fn next(&mut self) -> Option<Self::Item> {
    let handle = self.handle.as_mut()?;
    match (self.next)(handle) {
      Some(Ok(item)) => Some(Ok(item)),
      Some(Err(err)) => {
        if let Err(unlock) = self.finish() {
          log::warn!("{unlock}");
        }
        Some(Err(err))
      },
      None => self.finish().err().map(Err),
    }
  }
}

impl<F, T> FusedIterator for Records<F> where F: FnMut(&mut Handle) -> Option<Result<T>> {}

impl<F> Drop for Records<F> {
  fn drop(&mut self) {
    if let Err(err) = self.finish() {
      log::warn!("{err}");
    }
  }
}

impl<F> std::fmt::Debug for Records<F> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Records")
      .field("handle", &self.handle)
      .field("lock", &self.lock)
      .finish_non_exhaustive()
  }
}
