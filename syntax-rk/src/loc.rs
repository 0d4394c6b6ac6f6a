use serde::Deserialize;
use serde::Serialize;
use std::cmp::{max, min};
use std::fmt;
use std::fmt::Display;
use std::fmt::Formatter;
use std::ops::{Add, AddAssign};

/// A location within the current source file expressed as UTF-8 byte offsets.
///
/// Serialized as a two-element array `[start, end]`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub struct Loc(pub usize, pub usize);

impl Loc {
  /// Returns the starting offset as `u32`, clamping to `u32::MAX` if necessary.
  pub fn start_u32(&self) -> u32 {
    clamp_to_u32(self.0)
  }

  /// Returns the ending offset as `u32`, clamping to `u32::MAX` if necessary.
  pub fn end_u32(&self) -> u32 {
    clamp_to_u32(self.1)
  }

  /// A location spanning `len` bytes from `start`.
  pub fn at(start: usize, len: usize) -> Loc {
    Loc(start, start.saturating_add(len))
  }

  pub fn is_empty(&self) -> bool {
    self.0 >= self.1
  }

  pub fn len(&self) -> usize {
    self.1.saturating_sub(self.0)
  }

  pub fn extend(&mut self, other: Loc) {
    self.0 = min(self.0, other.0);
    self.1 = max(self.1, other.1);
  }

  pub fn add_option(self, rhs: Option<Loc>) -> Loc {
    let mut new = self;
    if let Some(rhs) = rhs {
      new.extend(rhs);
    };
    new
  }
}

impl Add for Loc {
  type Output = Loc;

  fn add(self, rhs: Self) -> Self::Output {
    let mut new = self;
    new.extend(rhs);
    new
  }
}

impl AddAssign for Loc {
  fn add_assign(&mut self, rhs: Self) {
    self.extend(rhs);
  }
}

fn clamp_to_u32(value: usize) -> u32 {
  u32::try_from(value).unwrap_or(u32::MAX)
}

/// A 1-based line and byte column.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct Pos {
  pub line: u32,
  pub col: u32,
}

impl Display for Pos {
  fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
    write!(f, "{}:{}", self.line, self.col)
  }
}

/// Maps byte offsets of one source file to [`Pos`] values.
///
/// Offsets past the end of the text land on the last line, so an index built
/// from an empty string still answers every query (line 1, column
/// `offset + 1`), which is what callers without source text get.
#[derive(Clone, Debug)]
pub struct LineIndex {
  line_starts: Vec<usize>,
  len: usize,
}

impl LineIndex {
  pub fn new(text: &str) -> LineIndex {
    let bytes = text.as_bytes();
    let mut line_starts = vec![0];
    line_starts.extend(memchr::memchr_iter(b'\n', bytes).map(|nl| nl + 1));
    LineIndex {
      line_starts,
      len: bytes.len(),
    }
  }

  pub fn line_count(&self) -> usize {
    self.line_starts.len()
  }

  /// Zero-based line containing `offset`.
  pub fn line_of(&self, offset: usize) -> usize {
    self
      .line_starts
      .partition_point(|&start| start <= offset)
      .saturating_sub(1)
  }

  /// Byte offset where the zero-based `line` starts, if it exists.
  pub fn line_start(&self, line: usize) -> Option<usize> {
    self.line_starts.get(line).copied()
  }

  /// Byte range of the zero-based `line`, excluding its terminating newline.
  pub fn line_range(&self, line: usize) -> Option<(usize, usize)> {
    let start = self.line_start(line)?;
    let end = match self.line_starts.get(line + 1) {
      Some(next) => next - 1,
      None => self.len,
    };
    Some((start, end.max(start)))
  }

  pub fn pos(&self, offset: usize) -> Pos {
    let line = self.line_of(offset);
    let col = offset - self.line_starts[line];
    Pos {
      line: clamp_to_u32(line + 1),
      col: clamp_to_u32(col + 1),
    }
  }
}
