//! Source discovery: finds detection and macro files on disk and reads them
//! into a [`DocumentSet`] for the compiler.
//!
//! The compiler itself never touches the filesystem; it takes the set this
//! module produces (or one built in memory).

mod core;
mod documents;

#[cfg(test)]
mod tests;

pub use self::core::SourceLoader;
pub use self::documents::{DocumentSet, SourceDocument, SourceKind};

use std::path::PathBuf;

/// Outcome of looking at a single file during discovery.
#[derive(Debug)]
pub struct LoadResult {
    /// Path to the file that was inspected.
    pub path: PathBuf,
    /// Status of the load attempt.
    pub status: LoadStatus,
}

/// Status of a single file during discovery.
#[derive(Debug, PartialEq)]
pub enum LoadStatus {
    /// File was read into the document set under this id.
    Loaded { source_id: String, kind: SourceKind },
    /// File was skipped (dotfile, unsupported extension, ...).
    Skipped { reason: String },
}
