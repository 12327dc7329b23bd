//! A single participant name.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One trimmed, non-empty name read from the names file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NameRecord {
    /// The name as it will be drawn
    pub text: String,

    /// 1-based line number in the source file (0 if not read from a file)
    pub line: usize,
}

impl NameRecord {
    /// Create a record from raw text.
    ///
    /// Returns `None` if the text is empty after trimming.
    pub fn new(text: impl AsRef<str>) -> Option<Self> {
        Self::at_line(text, 0)
    }

    /// Create a record remembering the source line it came from.
    pub fn at_line(text: impl AsRef<str>, line: usize) -> Option<Self> {
        let trimmed = text.as_ref().trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self {
            text: trimmed.to_string(),
            line,
        })
    }

    /// Get the name text.
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for NameRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl AsRef<str> for NameRecord {
    fn as_ref(&self) -> &str {
        &self.text
    }
}
