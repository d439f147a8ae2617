//! # Front-Matter Extraction
//!
//! Isolates the YAML block of a markdown thought entry. Every line whose
//! trimmed content is exactly `---` toggles an "inside" flag; lines seen
//! while the flag is set are collected with their terminators intact.
//! The delimiter lines themselves are never collected. A line ends at
//! `\n`, `\r\n` or a lone `\r`.
//!
//! An unbalanced file (odd number of delimiters) leaves the flag set at
//! end-of-file, so everything after the last delimiter is collected. A
//! file with several delimiter pairs contributes every enclosed block.

use std::path::Path;

use crate::error::SchemaError;

/// The delimiter that opens and closes a front-matter block.
pub const DELIMITER: &str = "---";

/// Split `text` into lines, each keeping its terminator.
///
/// `\r\n` is one terminator; a `\r` not followed by `\n` is another.
pub(crate) fn lines_inclusive(text: &str) -> impl Iterator<Item = &str> + '_ {
    let mut rest = text;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        let end = match rest.find(['\n', '\r']) {
            Some(i) if rest[i..].starts_with("\r\n") => i + 2,
            Some(i) => i + 1,
            None => rest.len(),
        };
        let (line, tail) = rest.split_at(end);
        rest = tail;
        Some(line)
    })
}

/// Extract the front-matter text from markdown content.
pub fn extract_front_matter(content: &str) -> String {
    let mut inside = false;
    let mut collected = String::new();

    for line in lines_inclusive(content) {
        if line.trim() == DELIMITER {
            inside = !inside;
            continue;
        }
        if inside {
            collected.push_str(line);
        }
    }

    collected
}

/// Read a markdown file and extract its front matter.
///
/// The file is read in full and closed before returning.
pub fn read_front_matter(path: &Path) -> Result<String, SchemaError> {
    let content = std::fs::read_to_string(path).map_err(|e| SchemaError::io(path, e))?;
    Ok(extract_front_matter(&content))
}
