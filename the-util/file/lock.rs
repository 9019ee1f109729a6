//! Advisory file locks.
//!
//! Locks only coordinate with other code that takes them too, nothing stops an
//! uncooperative process from touching a locked file. Acquiring blocks until
//! the lock is granted.

use std::{
  fmt,
  fs::File,
  ops::{
    Deref,
    DerefMut,
  },
};

use super::{
  FileError,
  Result,
};
use crate::stream::Handle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockKind {
  /// Any number of holders, for reading.
  Shared,
  /// A single holder, for writing.
  Exclusive,
}

impl fmt::Display for LockKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      LockKind::Shared => "shared",
      LockKind::Exclusive => "exclusive",
    })
  }
}

/// A handle held under a lock. Derefs to the handle and unlocks it when
/// dropped.
pub struct Locked<'a> {
  handle: &'a mut Handle,
  kind:   LockKind,
  held:   bool,
}

impl<'a> Locked<'a> {
  pub fn acquire(handle: &'a mut Handle, kind: LockKind) -> Result<Self> {
    lock(handle.as_file(), kind)?;
    Ok(Self {
      handle,
      kind,
      held: true,
    })
  }

  pub fn kind(&self) -> LockKind {
    self.kind
  }

  /// Unlocks now, reporting a failure that dropping would only log.
  pub fn release(mut self) -> Result<()> {
    self.held = false;
    unlock(self.handle.as_file())
  }
}

impl Deref for Locked<'_> {
  type Target = Handle;

  fn deref(&self) -> &Handle {
    self.handle
  }
}

impl DerefMut for Locked<'_> {
  fn deref_mut(&mut self) -> &mut Handle {
    self.handle
  }
}

impl Drop for Locked<'_> {
  fn drop(&mut self) {
    if self.held
      && let Err(err) = unlock(self.handle.as_file())
    {
      log::warn!("{err}");
    }
  }
}

pub(crate) fn lock(file: &File, kind: LockKind) -> Result<()> {
  log::trace!("acquiring {kind} lock on {file:?}");
  sys::lock(file, kind).map_err(|source| FileError::Lock { kind, source })
}

pub(crate) fn unlock(file: &File) -> Result<()> {
  log::trace!("releasing lock on {file:?}");
  sys::unlock(file).map_err(FileError::Unlock)
}

#[cfg(unix)]
mod sys {
  use std::{
    fs::File,
    io,
  };

  use rustix::fs::{
    FlockOperation,
    flock,
  };

  use super::LockKind;

  pub fn lock(file: &File, kind: LockKind) -> io::Result<()> {
    let operation = match kind {
      LockKind::Shared => FlockOperation::LockShared,
      LockKind::Exclusive => FlockOperation::LockExclusive,
    };
    Ok(flock(file, operation)?)
  }

  pub fn unlock(file: &File) -> io::Result<()> {
    Ok(flock(file, FlockOperation::Unlock)?)
  }

  #[cfg(test)]
  pub fn try_lock(file: &File, kind: LockKind) -> io::Result<bool> {
    let operation = match kind {
      LockKind::Shared => FlockOperation::NonBlockingLockShared,
      LockKind::Exclusive => FlockOperation::NonBlockingLockExclusive,
    };
    match flock(file, operation) {
      Ok(()) => Ok(true),
      Err(rustix::io::Errno::WOULDBLOCK) => Ok(false),
      Err(err) => Err(err.into()),
    }
  }
}

#[cfg(not(unix))]
mod sys {
  use std::{
    fs::File,
    io,
  };

  use super::LockKind;

  pub fn lock(file: &File, kind: LockKind) -> io::Result<()> {
    match kind {
      LockKind::Shared => file.lock_shared(),
      LockKind::Exclusive => file.lock(),
    }
  }

  pub fn unlock(file: &File) -> io::Result<()> {
    file.unlock()
  }
}

/// Tries to take a lock without blocking. `Ok(false)` when someone else holds
/// a conflicting lock.
#[cfg(all(test, unix))]
pub(crate) fn try_lock(file: &File, kind: LockKind) -> std::io::Result<bool> {
  sys::try_lock(file, kind)
}
