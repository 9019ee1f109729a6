//! Scoped file access.
//!
//! Every operation opens its file, hands the open [`Handle`] to a callback,
//! optionally under an advisory lock, and releases both the lock and the
//! handle on every way out. A file that cannot be opened is reported through
//! the return value (`None` or `false`) and logged at debug level. `Err` is
//! reserved for callback and lock failures.
//!
//! Paths other than [`write`] targets have to exist. Anything that is not a
//! directory qualifies, so devices and named pipes work too. A pipe gives a
//! handle that cannot seek.

use std::{
  fs,
  io,
  path::Path,
};

use thiserror::Error;

use crate::stream::{
  self,
  Handle,
  Mode,
  StreamError,
};

pub mod lock;
mod records;

pub use lock::{
  LockKind,
  Locked,
};
pub use records::Records;

#[derive(Debug, Error)]
pub enum FileError {
  #[error("failed to acquire {kind} lock: {source}")]
  Lock {
    kind:   LockKind,
    #[source]
    source: io::Error,
  },
  #[error("failed to release lock: {0}")]
  Unlock(#[source] io::Error),
  #[error(transparent)]
  Stream(#[from] StreamError),
  #[error(transparent)]
  Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, FileError>;

/// Reads `path` through `callback`, under a shared lock if `use_lock` is set.
///
/// Returns `Ok(None)` when the file does not exist or cannot be opened for
/// reading.
pub fn read<T>(
  path: impl AsRef<Path>,
  use_lock: bool,
  callback: impl FnOnce(&mut Handle) -> Result<T>,
) -> Result<Option<T>> {
  let Some(mut handle) = open_existing(path.as_ref(), Mode::Read) else {
    return Ok(None);
  };
  with_lock(&mut handle, use_lock.then_some(LockKind::Shared), callback).map(Some)
}

/// Truncates or creates `path` and lets `callback` write to it, under an
/// exclusive lock if `use_lock` is set.
///
/// Returns `Ok(false)` when the file cannot be opened for writing.
pub fn write(
  path: impl AsRef<Path>,
  use_lock: bool,
  callback: impl FnOnce(&mut Handle) -> Result<()>,
) -> Result<bool> {
  let Some(mut handle) = open(path.as_ref(), Mode::Write) else {
    return Ok(false);
  };
  with_lock(&mut handle, use_lock.then_some(LockKind::Exclusive), callback)?;
  Ok(true)
}

/// Like [`write`], but `path` has to exist already and writes land at its
/// end.
pub fn append(
  path: impl AsRef<Path>,
  use_lock: bool,
  callback: impl FnOnce(&mut Handle) -> Result<()>,
) -> Result<bool> {
  let Some(mut handle) = open_existing(path.as_ref(), Mode::Append) else {
    return Ok(false);
  };
  with_lock(&mut handle, use_lock.then_some(LockKind::Exclusive), callback)?;
  Ok(true)
}

/// Lazily reads `path` as a sequence of records.
///
/// `producer` is called once per record and returns `None` when there are no
/// more. The file stays open, and locked if `use_lock` is set, until the
/// returned [`Records`] is exhausted, closed or dropped.
pub fn read_as_iterator<T, F>(
  path: impl AsRef<Path>,
  use_lock: bool,
  producer: F,
) -> Result<Option<Records<F>>>
where
  F: FnMut(&mut Handle) -> Option<Result<T>>,
{
  let Some(handle) = open_existing(path.as_ref(), Mode::Read) else {
    return Ok(None);
  };
  Records::new(handle, use_lock.then_some(LockKind::Shared), producer).map(Some)
}

/// Like [`read_as_iterator`], calling `callback` for one record at a time
/// until the end of the file.
///
/// ```no_run
/// use std::io::BufRead;
///
/// let lines = the_util::file::read_to_end("notes.txt", true, |handle| {
///   let mut line = String::new();
///   handle.read_line(&mut line)?;
///   Ok(line)
/// })?;
/// for line in lines.into_iter().flatten() {
///   print!("{}", line?);
/// }
/// # Ok::<(), the_util::file::FileError>(())
/// ```
pub fn read_to_end<T>(
  path: impl AsRef<Path>,
  use_lock: bool,
  mut callback: impl FnMut(&mut Handle) -> Result<T>,
) -> Result<Option<Records<impl FnMut(&mut Handle) -> Option<Result<T>>>>> {
  read_as_iterator(path, use_lock, move |handle: &mut Handle| {
    match handle.is_eof() {
      Ok(true) => None,
      Ok(false) => Some(callback(handle)),
      Err(err) => Some(Err(err.into())),
    }
  })
}

/// Rewrites `path` in place under an exclusive lock.
///
/// `callback` is called against the open file until it is fully consumed,
/// and whatever it returns is staged in a temporary file. The staged content
/// then replaces the original, which is truncated to fit. On a callback error
/// the original is left untouched.
///
/// Returns `Ok(false)` when `path` or the temporary file cannot be opened.
pub fn transform<T: AsRef<[u8]>>(
  path: impl AsRef<Path>,
  callback: impl FnMut(&mut Handle) -> Result<T>,
) -> Result<bool> {
  let Some(mut handle) = open_existing(path.as_ref(), Mode::ReadUpdate) else {
    return Ok(false);
  };
  let mut staged = match Handle::temp() {
    Ok(staged) => staged,
    Err(err) => {
      log::debug!("failed to create temporary file: {err}");
      return Ok(false);
    },
  };

  using_lock(&mut handle, LockKind::Exclusive, |handle| {
    stream::copy_with_transform(handle, &mut staged, callback)?;
    Ok(stream::replace(handle, &mut staged)?)
  })
}

/// Streams `from` into `to` through `callback`. `to` is created or truncated.
///
/// Returns `Ok(false)` when either file cannot be opened. `to` is not touched
/// when `from` is unavailable.
pub fn copy_with_transform<T: AsRef<[u8]>>(
  from: impl AsRef<Path>,
  to: impl AsRef<Path>,
  callback: impl FnMut(&mut Handle) -> Result<T>,
) -> Result<bool> {
  let Some(mut source) = open_existing(from.as_ref(), Mode::Read) else {
    return Ok(false);
  };
  let Some(mut destination) = open(to.as_ref(), Mode::Write) else {
    return Ok(false);
  };
  stream::copy_with_transform(&mut source, &mut destination, callback)?;
  Ok(true)
}

/// Runs `callback` while holding a `kind` lock on `handle`.
///
/// The lock is released before returning, also when `callback` fails, in
/// which case the callback's error wins over a failure to unlock.
pub fn using_lock<T>(
  handle: &mut Handle,
  kind: LockKind,
  callback: impl FnOnce(&mut Handle) -> Result<T>,
) -> Result<T> {
  let mut locked = Locked::acquire(handle, kind)?;
  let result = callback(&mut locked);
  let released = locked.release();
  let value = result?;
  released?;
  Ok(value)
}

fn with_lock<T>(
  handle: &mut Handle,
  kind: Option<LockKind>,
  callback: impl FnOnce(&mut Handle) -> Result<T>,
) -> Result<T> {
  match kind {
    Some(kind) => using_lock(handle, kind, callback),
    None => callback(handle),
  }
}

fn open_existing(path: &Path, mode: Mode) -> Option<Handle> {
  match fs::metadata(path) {
    Ok(metadata) if !metadata.is_dir() => open(path, mode),
    Ok(_) => {
      log::debug!("{} is a directory", path.display());
      None
    },
    Err(err) => {
      log::debug!("cannot access {}: {err}", path.display());
      None
    },
  }
}

fn open(path: &Path, mode: Mode) -> Option<Handle> {
  Handle::open(path, mode)
    .inspect_err(|err| log::debug!("failed to open {} as '{mode}': {err}", path.display()))
    .ok()
}
