//! Open modes, the [`Handle`] stream type and stream-to-stream copying.

use std::{
  fmt,
  fs::{
    File,
    OpenOptions,
  },
  io::{
    self,
    BufRead,
    BufReader,
    Read,
    Seek,
    SeekFrom,
    Write,
  },
  path::Path,
  str::FromStr,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StreamError {
  #[error("invalid stream mode {0:?}")]
  InvalidMode(String),
  #[error(transparent)]
  Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, StreamError>;

/// How a stream was opened, in `fopen` terms.
///
/// | mode | reads | writes | creates | truncates | position  |
/// |------|-------|--------|---------|-----------|-----------|
/// | `r`  | yes   |        |         |           | start     |
/// | `r+` | yes   | yes    |         |           | start     |
/// | `w`  |       | yes    | yes     | yes       | start     |
/// | `w+` | yes   | yes    | yes     | yes       | start     |
/// | `a`  |       | yes    | yes     |           | end       |
/// | `a+` | yes   | yes    | yes     |           | end       |
/// | `x`  |       | yes    | only    |           | start     |
/// | `x+` | yes   | yes    | only    |           | start     |
/// | `c`  |       | yes    | yes     |           | start     |
/// | `c+` | yes   | yes    | yes     |           | start     |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
  Read,
  ReadUpdate,
  Write,
  WriteUpdate,
  Append,
  AppendUpdate,
  CreateNew,
  CreateNewUpdate,
  Create,
  CreateUpdate,
}

impl Mode {
  const READING: &[Mode] = &[
    Mode::Read,
    Mode::ReadUpdate,
    Mode::WriteUpdate,
    Mode::AppendUpdate,
    Mode::CreateNewUpdate,
    Mode::CreateUpdate,
  ];
  const WRITING: &[Mode] = &[
    Mode::ReadUpdate,
    Mode::Write,
    Mode::WriteUpdate,
    Mode::Append,
    Mode::AppendUpdate,
    Mode::CreateNew,
    Mode::CreateNewUpdate,
    Mode::Create,
    Mode::CreateUpdate,
  ];

  pub const fn as_str(self) -> &'static str {
    match self {
      Mode::Read => "r",
      Mode::ReadUpdate => "r+",
      Mode::Write => "w",
      Mode::WriteUpdate => "w+",
      Mode::Append => "a",
      Mode::AppendUpdate => "a+",
      Mode::CreateNew => "x",
      Mode::CreateNewUpdate => "x+",
      Mode::Create => "c",
      Mode::CreateUpdate => "c+",
    }
  }

  pub fn is_readable(self) -> bool {
    Self::READING.contains(&self)
  }

  pub fn is_writable(self) -> bool {
    Self::WRITING.contains(&self)
  }

  pub fn open_options(self) -> OpenOptions {
    let mut options = OpenOptions::new();
    options.read(self.is_readable());
    match self {
      Mode::Read => {},
      Mode::ReadUpdate => {
        options.write(true);
      },
      Mode::Write | Mode::WriteUpdate => {
        options.write(true).create(true).truncate(true);
      },
      Mode::Append | Mode::AppendUpdate => {
        options.append(true).create(true);
      },
      Mode::CreateNew | Mode::CreateNewUpdate => {
        options.write(true).create_new(true);
      },
      Mode::Create | Mode::CreateUpdate => {
        options.write(true).create(true);
      },
    }
    options
  }
}

impl FromStr for Mode {
  type Err = StreamError;

  /// Parses `fopen` mode strings. Binary and text flags (`b`, `t`) are
  /// accepted anywhere after the first character and ignored.
  fn from_str(s: &str) -> Result<Self> {
    let mut flags = s.chars().filter(|c| !matches!(c, 'b' | 't'));
    let mode = match (s.chars().next(), flags.nth(1), flags.next()) {
      (Some('r'), None, None) => Mode::Read,
      (Some('r'), Some('+'), None) => Mode::ReadUpdate,
      (Some('w'), None, None) => Mode::Write,
      (Some('w'), Some('+'), None) => Mode::WriteUpdate,
      (Some('a'), None, None) => Mode::Append,
      (Some('a'), Some('+'), None) => Mode::AppendUpdate,
      (Some('x'), None, None) => Mode::CreateNew,
      (Some('x'), Some('+'), None) => Mode::CreateNewUpdate,
      (Some('c'), None, None) => Mode::Create,
      (Some('c'), Some('+'), None) => Mode::CreateUpdate,
      _ => return Err(StreamError::InvalidMode(s.to_owned())),
    };
    Ok(mode)
  }
}

impl fmt::Display for Mode {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// An open file owned by a single operation.
///
/// Reads are buffered, writes go straight to the file. Before writing, any
/// read-ahead is dropped and the file position moved back to where reading
/// stopped, so mixing reads and writes on an update-mode handle behaves like
/// a plain file descriptor.
pub struct Handle {
  reader:   BufReader<File>,
  mode:     Mode,
  seekable: bool,
}

impl Handle {
  pub fn open(path: impl AsRef<Path>, mode: Mode) -> io::Result<Self> {
    let file = mode.open_options().open(path)?;
    Ok(Self::from_file(file, mode))
  }

  /// An anonymous scratch file, deleted once the handle is dropped.
  pub fn temp() -> io::Result<Self> {
    Ok(Self::from_file(tempfile::tempfile()?, Mode::WriteUpdate))
  }

  pub fn from_file(file: File, mode: Mode) -> Self {
    let seekable = (&file).stream_position().is_ok();
    Self {
      reader: BufReader::new(file),
      mode,
      seekable,
    }
  }

  pub fn mode(&self) -> Mode {
    self.mode
  }

  pub fn is_seekable(&self) -> bool {
    self.seekable
  }

  pub fn is_readable(&self) -> bool {
    self.mode.is_readable()
  }

  pub fn is_writable(&self) -> bool {
    self.mode.is_writable()
  }

  /// Whether the stream has nothing more to read. May block to fill the read
  /// buffer.
  pub fn is_eof(&mut self) -> io::Result<bool> {
    Ok(self.reader.fill_buf()?.is_empty())
  }

  /// Reads one line, including its line ending. Returns an empty string at
  /// the end of the stream.
  pub fn read_line_string(&mut self) -> io::Result<String> {
    let mut line = String::new();
    self.reader.read_line(&mut line)?;
    Ok(line)
  }

  pub fn set_len(&mut self, len: u64) -> io::Result<()> {
    self.sync_position()?;
    self.reader.get_ref().set_len(len)
  }

  pub fn as_file(&self) -> &File {
    self.reader.get_ref()
  }

  fn sync_position(&mut self) -> io::Result<()> {
    if self.seekable && !self.reader.buffer().is_empty() {
      self.reader.seek(SeekFrom::Current(0))?;
    }
    Ok(())
  }
}

impl fmt::Debug for Handle {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Handle")
      .field("file", self.reader.get_ref())
      .field("mode", &self.mode)
      .field("seekable", &self.seekable)
      .finish()
  }
}

impl Read for Handle {
  fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
    self.reader.read(buf)
  }
}

impl BufRead for Handle {
  fn fill_buf(&mut self) -> io::Result<&[u8]> {
    self.reader.fill_buf()
  }

  fn consume(&mut self, amt: usize) {
    self.reader.consume(amt)
  }
}

impl Write for Handle {
  fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
    self.sync_position()?;
    self.reader.get_mut().write(buf)
  }

  fn flush(&mut self) -> io::Result<()> {
    self.reader.get_mut().flush()
  }
}

impl Seek for Handle {
  fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
    self.reader.seek(pos)
  }
}

/// Feeds `source` through `transform` into `destination` until `source` runs
/// dry.
///
/// `transform` decides how much of the source it consumes per call, one line
/// for instance, and returns the bytes to write for it. A call that consumes
/// nothing is called again with the same input.
pub fn copy_with_transform<R, W, T, E>(
  source: &mut R,
  destination: &mut W,
  mut transform: impl FnMut(&mut R) -> std::result::Result<T, E>,
) -> std::result::Result<(), E>
where
  R: BufRead + ?Sized,
  W: Write + ?Sized,
  T: AsRef<[u8]>,
  E: From<io::Error>,
{
  while !source.fill_buf()?.is_empty() {
    let chunk = transform(source)?;
    destination.write_all(chunk.as_ref())?;
  }
  destination.flush()?;
  Ok(())
}

/// Overwrites `destination` with the whole of `source`.
///
/// Both streams are rewound first where possible. After copying,
/// `destination` is cut down to the copied length so no stale bytes survive.
/// Returns `Ok(false)` when the copy itself fails.
pub fn replace(destination: &mut Handle, source: &mut Handle) -> Result<bool> {
  if destination.is_seekable() {
    destination.rewind()?;
  }
  if source.is_seekable() {
    source.rewind()?;
  }

  let written = match io::copy(source, destination) {
    Ok(written) => written,
    Err(err) => {
      log::debug!("stream copy failed: {err}");
      return Ok(false);
    },
  };

  destination.set_len(written)?;
  Ok(true)
}

#[cfg(test)]
mod test {
  use super::*;

  fn temp_with(content: &str) -> Handle {
    let mut handle = Handle::temp().unwrap();
    handle.write_all(content.as_bytes()).unwrap();
    handle.rewind().unwrap();
    handle
  }

  fn contents(handle: &mut Handle) -> String {
    let mut buf = String::new();
    handle.rewind().unwrap();
    handle.read_to_string(&mut buf).unwrap();
    buf
  }

  #[test]
  fn parse_modes() {
    assert_eq!("r".parse::<Mode>().unwrap(), Mode::Read);
    assert_eq!("rb".parse::<Mode>().unwrap(), Mode::Read);
    assert_eq!("r+b".parse::<Mode>().unwrap(), Mode::ReadUpdate);
    assert_eq!("rb+".parse::<Mode>().unwrap(), Mode::ReadUpdate);
    assert_eq!("wt".parse::<Mode>().unwrap(), Mode::Write);
    assert_eq!("c+".parse::<Mode>().unwrap(), Mode::CreateUpdate);
    for invalid in ["", "+", "q", "r++", "rw", "b"] {
      assert!(
        matches!(invalid.parse::<Mode>(), Err(StreamError::InvalidMode(_))),
        "{invalid:?}"
      );
    }
  }

  #[test]
  fn mode_round_trips_through_str() {
    for mode in Mode::WRITING.iter().chain([Mode::Read].iter()) {
      assert_eq!(mode.as_str().parse::<Mode>().unwrap(), *mode);
    }
  }

  #[test]
  fn readable_and_writable_modes() {
    let readable = ["r", "r+", "w+", "a+", "x+", "c+"];
    let writable = ["r+", "w", "w+", "a", "a+", "x", "x+", "c", "c+"];
    for name in ["r", "r+", "w", "w+", "a", "a+", "x", "x+", "c", "c+"] {
      let mode: Mode = name.parse().unwrap();
      assert_eq!(mode.is_readable(), readable.contains(&name), "{name}");
      assert_eq!(mode.is_writable(), writable.contains(&name), "{name}");
    }
  }

  #[test]
  fn temp_handle_capabilities() {
    let handle = Handle::temp().unwrap();
    assert!(handle.is_seekable());
    assert!(handle.is_readable());
    assert!(handle.is_writable());
    assert_eq!(handle.mode(), Mode::WriteUpdate);
  }

  #[test]
  fn write_after_partial_read_lands_at_read_position() {
    let mut handle = temp_with("one\ntwo\n");
    assert_eq!(handle.read_line_string().unwrap(), "one\n");
    handle.write_all(b"TWO\n").unwrap();
    assert_eq!(contents(&mut handle), "one\nTWO\n");
  }

  #[test]
  fn copy_line_by_line() {
    let mut source = temp_with("one\ntwo\nthree");
    let mut destination = Vec::new();
    copy_with_transform(&mut source, &mut destination, |source| {
      Ok::<_, io::Error>(format!("* {}", source.read_line_string()?))
    })
    .unwrap();
    assert_eq!(String::from_utf8(destination).unwrap(), "* one\n* two\n* three");
  }

  #[test]
  fn copy_from_empty_source_never_calls_transform() {
    let mut source = temp_with("");
    let mut destination = Vec::new();
    copy_with_transform(&mut source, &mut destination, |_: &mut Handle| -> io::Result<String> {
      panic!("transform called on empty source")
    })
    .unwrap();
    assert!(destination.is_empty());
  }

  #[test]
  fn copy_stops_on_transform_error() {
    let mut source = temp_with("a\nb\n");
    let mut destination = Vec::new();
    let result = copy_with_transform(&mut source, &mut destination, |source: &mut Handle| -> Result<String> {
      let line = source.read_line_string()?;
      if line == "b\n" {
        return Err(StreamError::InvalidMode(line));
      }
      Ok(line)
    });
    assert!(matches!(result, Err(StreamError::InvalidMode(_))));
    assert_eq!(destination, b"a\n");
  }

  #[test]
  fn replace_truncates_to_copied_length() {
    let mut destination = temp_with("a much longer original text");
    let mut source = temp_with("short");
    // leave both streams somewhere in the middle
    destination.seek(SeekFrom::Start(4)).unwrap();
    source.seek(SeekFrom::End(0)).unwrap();

    assert!(replace(&mut destination, &mut source).unwrap());
    assert_eq!(contents(&mut destination), "short");
  }

  #[test]
  fn replace_with_empty_source_empties_destination() {
    let mut destination = temp_with("content");
    let mut source = temp_with("");
    assert!(replace(&mut destination, &mut source).unwrap());
    assert_eq!(contents(&mut destination), "");
  }
}
