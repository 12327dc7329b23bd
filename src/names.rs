//! Reading participant names from a plain-text list.
//!
//! One name per line. Surrounding whitespace is trimmed, blank lines are
//! dropped, and order is preserved. Duplicates are kept: each occurrence
//! becomes its own certificate.

use crate::error::{Error, Result};
use crate::model::NameRecord;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use unicode_normalization::UnicodeNormalization;

const BOM: char = '\u{feff}';

/// Case transformation applied to each name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NameCase {
    /// Keep names exactly as written
    #[default]
    AsIs,
    /// Capitalize each word, lowercase the rest ("aDA  lovelace" -> "Ada Lovelace")
    Title,
    /// Uppercase everything
    Upper,
}

impl NameCase {
    /// Apply this case transformation.
    pub fn apply(self, name: &str) -> String {
        match self {
            NameCase::AsIs => name.to_string(),
            NameCase::Upper => name.to_uppercase(),
            NameCase::Title => name
                .split_whitespace()
                .map(capitalize)
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Options for reading a names file.
#[derive(Debug, Clone, Default)]
pub struct ReadOptions {
    /// Case transformation applied after trimming
    pub case: NameCase,
}

impl ReadOptions {
    /// Create new read options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the case transformation.
    pub fn with_case(mut self, case: NameCase) -> Self {
        self.case = case;
        self
    }
}

/// Read names from a UTF-8 text file.
///
/// # Errors
///
/// * [`Error::MissingInput`] if the file does not exist
/// * [`Error::Decode`] if the contents are not valid UTF-8
///
/// # Example
///
/// ```no_run
/// use certbatch::names::{read_names, ReadOptions};
///
/// let names = read_names("names.txt", &ReadOptions::default())?;
/// for name in &names {
///     println!("{} (line {})", name, name.line);
/// }
/// # Ok::<(), certbatch::Error>(())
/// ```
pub fn read_names<P: AsRef<Path>>(path: P, options: &ReadOptions) -> Result<Vec<NameRecord>> {
    let path = path.as_ref();
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(Error::MissingInput(path.to_path_buf()));
        }
        Err(e) => return Err(Error::Io(e)),
    };

    let text = String::from_utf8(bytes).map_err(|e| {
        Error::Decode(format!(
            "{} is not valid UTF-8 (byte offset {})",
            path.display(),
            e.utf8_error().valid_up_to()
        ))
    })?;

    let names = parse_names(&text, options);
    log::info!("Read {} names from {}", names.len(), path.display());
    Ok(names)
}

/// Parse names from already-loaded text.
pub fn parse_names(text: &str, options: &ReadOptions) -> Vec<NameRecord> {
    let text = text.strip_prefix(BOM).unwrap_or(text);

    text.lines()
        .enumerate()
        .filter_map(|(idx, line)| {
            let normalized: String = line.trim().nfc().collect();
            NameRecord::at_line(options.case.apply(&normalized), idx + 1)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(records: &[NameRecord]) -> Vec<&str> {
        records.iter().map(|r| r.as_str()).collect()
    }

    #[test]
    fn test_blank_lines_dropped() {
        let names = parse_names("Alice Smith\n\nBob Lee\n  \nCara Diaz", &ReadOptions::default());
        assert_eq!(texts(&names), vec!["Alice Smith", "Bob Lee", "Cara Diaz"]);
        assert_eq!(names[1].line, 3);
        assert_eq!(names[2].line, 5);
    }

    #[test]
    fn test_crlf_and_bom() {
        let names = parse_names("\u{feff}Ada\r\n  Grace \r\n\r\n", &ReadOptions::default());
        assert_eq!(texts(&names), vec!["Ada", "Grace"]);
    }

    #[test]
    fn test_duplicates_preserved() {
        let names = parse_names("Sam\nSam\nsam", &ReadOptions::default());
        assert_eq!(names.len(), 3);
    }

    #[test]
    fn test_nfc_normalization() {
        // "e" + combining acute accent
        let names = parse_names("Rene\u{301}", &ReadOptions::default());
        assert_eq!(names[0].as_str(), "Ren\u{e9}");
    }

    #[test]
    fn test_title_case() {
        let options = ReadOptions::new().with_case(NameCase::Title);
        let names = parse_names("aDA   lovelace\nJOHN o'neil", &options);
        assert_eq!(texts(&names), vec!["Ada Lovelace", "John O'neil"]);
    }

    #[test]
    fn test_upper_case() {
        assert_eq!(NameCase::Upper.apply("Émile Zola"), "ÉMILE ZOLA");
        assert_eq!(NameCase::AsIs.apply("mixed Case"), "mixed Case");
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_names("", &ReadOptions::default()).is_empty());
        assert!(parse_names("\n \n\t\n", &ReadOptions::default()).is_empty());
    }
}
