//! Persisting rendered certificates.

mod format;
mod naming;
mod writer;

pub use format::{OutputFormat, DEFAULT_JPEG_QUALITY};
pub use naming::{sanitize_file_stem, DuplicatePolicy, FileNamer, NamingMode};
pub use writer::OutputWriter;
