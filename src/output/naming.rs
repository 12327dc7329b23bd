//! Deriving output file names from participant names.

use crate::model::NameRecord;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Longest file stem produced by sanitization, in bytes.
const MAX_STEM_LEN: usize = 120;

/// Device names Windows refuses as file names regardless of extension.
const RESERVED_STEMS: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// How a name is turned into a file stem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamingMode {
    /// Filesystem-safe stem derived from the name
    #[default]
    Sanitized,
    /// Name with spaces replaced by underscores, nothing else changed
    Verbatim,
    /// `certificate_0001`, `certificate_0002`, ...
    Indexed,
}

/// What happens when two names map to the same file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    /// Append `_2`, `_3`, ... to later occurrences
    #[default]
    Suffix,
    /// Later occurrences replace earlier files
    Overwrite,
}

/// Make a filesystem-safe file stem from arbitrary text.
///
/// Whitespace runs become `_`; anything other than letters, digits, `-`, `_`
/// and `.` is removed. Returns an empty string if nothing usable remains.
pub fn sanitize_file_stem(text: &str) -> String {
    FileNamer::new().sanitize(text)
}

/// Allocates unique file stems for a batch.
///
/// Stems are handed out in input order, so the mapping from names to files
/// does not depend on the order certificates are rendered in.
#[derive(Debug, Clone)]
pub struct FileNamer {
    mode: NamingMode,
    duplicates: DuplicatePolicy,
    prefix: String,
    whitespace: Regex,
    disallowed: Regex,
    seen: HashMap<String, usize>,
}

impl FileNamer {
    /// Create a namer with sanitized names and suffixed duplicates.
    pub fn new() -> Self {
        Self {
            mode: NamingMode::default(),
            duplicates: DuplicatePolicy::default(),
            prefix: String::new(),
            whitespace: Regex::new(r"\s+").unwrap(),
            disallowed: Regex::new(r"[^\p{L}\p{N}_.\-]+").unwrap(),
            seen: HashMap::new(),
        }
    }

    /// Set the naming mode.
    pub fn with_mode(mut self, mode: NamingMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the duplicate policy.
    pub fn with_duplicates(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicates = policy;
        self
    }

    /// Prepend a fixed prefix to every stem.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Allocate the stem for the `ordinal`-th (1-based) name of the batch.
    pub fn next_stem(&mut self, ordinal: usize, name: &NameRecord) -> String {
        let base = match self.mode {
            NamingMode::Sanitized => {
                let stem = self.sanitize(name.as_str());
                if stem.is_empty() {
                    indexed_stem(ordinal)
                } else {
                    stem
                }
            }
            NamingMode::Verbatim => name.as_str().replace(' ', "_"),
            NamingMode::Indexed => indexed_stem(ordinal),
        };
        let base = format!("{}{}", self.prefix, base);

        if self.duplicates == DuplicatePolicy::Overwrite {
            return base;
        }

        // Case-insensitive filesystems would treat "Ann" and "ann" as one file
        let mut candidate = base.clone();
        let mut n = 1;
        while self.seen.contains_key(&candidate.to_lowercase()) {
            n += 1;
            candidate = format!("{}_{}", base, n);
        }
        self.seen.insert(candidate.to_lowercase(), ordinal);
        candidate
    }

    fn sanitize(&self, text: &str) -> String {
        let joined = self.whitespace.replace_all(text.trim(), "_");
        let cleaned = self.disallowed.replace_all(&joined, "");
        let trimmed = cleaned.trim_matches(|c| c == '.' || c == '_');

        let mut stem = truncate(trimmed, MAX_STEM_LEN)
            .trim_end_matches(|c| c == '.' || c == '_')
            .to_string();

        // Windows ignores everything after the first dot when matching device names
        let device_len = stem.find('.').unwrap_or(stem.len());
        if RESERVED_STEMS
            .iter()
            .any(|r| r.eq_ignore_ascii_case(&stem[..device_len]))
        {
            stem.insert(device_len, '_');
        }
        stem
    }
}

impl Default for FileNamer {
    fn default() -> Self {
        Self::new()
    }
}

fn indexed_stem(ordinal: usize) -> String {
    format!("certificate_{:04}", ordinal)
}

fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
