//! Front-matter extraction
//!
//! A header block is recognised only when the very first line of a file is
//! exactly `---`. It runs until the next line that is exactly `---`:
//!
//! ```text
//! ---
//! title: Week 1
//! weight: 10
//! ---
//! body...
//! ```
//!
//! The detection works on raw bytes, so binary files never need decoding.

use std::fs;
use std::path::Path;

use crate::core::error::{Result, WeaveError};
use crate::core::model::Metadata;

/// Header delimiter line
pub const MARKER: &str = "---";

/// Read a file and decode its front matter, if it has any
pub fn read_front_matter(path: &Path) -> Result<Option<Metadata>> {
    let content = fs::read(path).map_err(|e| WeaveError::filesystem(path, e))?;
    parse_front_matter(&content).map_err(|message| WeaveError::decode(path, message))
}

/// Decode the front matter of in-memory content
///
/// Returns `Ok(None)` when the content has no header or an empty one.
pub fn parse_front_matter(content: &[u8]) -> std::result::Result<Option<Metadata>, String> {
    let header = match header_block(content)? {
        Some(h) => h,
        None => return Ok(None),
    };

    let text = std::str::from_utf8(header)
        .map_err(|e| format!("front matter is not valid UTF-8: {}", e))?;

    let value: serde_yaml::Value = serde_yaml::from_str(text).map_err(|e| e.to_string())?;
    match value {
        serde_yaml::Value::Null => Ok(None),
        serde_yaml::Value::Mapping(map) => Ok(Some(map)),
        other => Err(format!(
            "front matter must be a mapping, found {}",
            describe(&other)
        )),
    }
}

/// Locate the bytes between the opening and closing markers
fn header_block(content: &[u8]) -> std::result::Result<Option<&[u8]>, String> {
    let mut lines = Lines::new(content);

    match lines.next() {
        Some((_, line)) if is_marker(line) => {}
        _ => return Ok(None),
    }
    let start = lines.offset();

    for (line_start, line) in lines {
        if is_marker(line) {
            return Ok(Some(&content[start..line_start]));
        }
    }

    Err(format!("front matter opened with '{}' but never closed", MARKER))
}

fn is_marker(line: &[u8]) -> bool {
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    line == MARKER.as_bytes()
}

/// Short description of a YAML value kind, for error messages
pub fn describe(value: &serde_yaml::Value) -> &'static str {
    match value {
        serde_yaml::Value::Null => "null",
        serde_yaml::Value::Bool(_) => "a boolean",
        serde_yaml::Value::Number(_) => "a number",
        serde_yaml::Value::String(_) => "a string",
        serde_yaml::Value::Sequence(_) => "a sequence",
        serde_yaml::Value::Mapping(_) => "a mapping",
        serde_yaml::Value::Tagged(_) => "a tagged value",
    }
}

/// Byte-line iterator yielding `(start_offset, line_without_newline)`
struct Lines<'a> {
    content: &'a [u8],
    pos: usize,
}

impl<'a> Lines<'a> {
    fn new(content: &'a [u8]) -> Self {
        Self { content, pos: 0 }
    }

    fn offset(&self) -> usize {
        self.pos
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = (usize, &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.content.len() {
            return None;
        }
        let start = self.pos;
        let rest = &self.content[start..];
        match rest.iter().position(|&b| b == b'\n') {
            Some(i) => {
                self.pos = start + i + 1;
                Some((start, &rest[..i]))
            }
            None => {
                self.pos = self.content.len();
                Some((start, rest))
            }
        }
    }
}
