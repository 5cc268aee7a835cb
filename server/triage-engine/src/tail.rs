//! Read the trailing window of a log file.
//!
//! The file is read backwards in fixed blocks until enough line breaks have
//! been seen, so cost follows the window size rather than the file size.

use std::fs::File;
use std::io::{self, ErrorKind, Read, Seek, SeekFrom};
use std::path::Path;

use tracing::debug;

use crate::error::EngineError;

const BLOCK_SIZE: u64 = 8 * 1024;

/// Last `lines` lines of the file at `path`.
///
/// `Ok(None)` when the file does not exist. Invalid UTF-8 is replaced.
pub fn read_tail(path: &Path, lines: usize) -> Result<Option<String>, EngineError> {
  let mut file = match File::open(path) {
    Ok(f) => f,
    Err(e) if e.kind() == ErrorKind::NotFound => {
      debug!(path = %path.display(), "log file not found");
      return Ok(None);
    }
    Err(e) => return Err(EngineError::io(path, e)),
  };

  let meta = file.metadata().map_err(|e| EngineError::io(path, e))?;
  if meta.is_dir() {
    return Err(EngineError::io(path, io::Error::other("is a directory")));
  }

  let size = meta.len();
  let mut pos = size;
  let mut blocks: Vec<Vec<u8>> = Vec::new();
  let mut newlines = 0usize;

  // One break more than the window guarantees the first kept line is whole.
  while pos > 0 && newlines <= lines {
    let step = BLOCK_SIZE.min(pos);
    pos -= step;
    let mut block = vec![0u8; step as usize];
    file
      .seek(SeekFrom::Start(pos))
      .and_then(|_| file.read_exact(&mut block))
      .map_err(|e| EngineError::io(path, e))?;
    newlines += block.iter().filter(|&&b| b == b'\n').count();
    blocks.push(block);
  }

  let buf: Vec<u8> = blocks.into_iter().rev().flatten().collect();
  let window = match (pos > 0, buf.iter().position(|&b| b == b'\n')) {
    // Drop the partial line cut by the first block boundary.
    (true, Some(i)) => &buf[i + 1..],
    _ => &buf[..],
  };

  let content = String::from_utf8_lossy(window);
  let all: Vec<&str> = content.lines().collect();
  let start = all.len().saturating_sub(lines);
  debug!(
    path = %path.display(),
    size,
    bytes_read = buf.len(),
    kept = all.len() - start,
    "read log tail"
  );
  Ok(Some(all[start..].join("\n")))
}
