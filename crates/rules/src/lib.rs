//! Detection compiler: structured YAML detections and hand-written stanzas
//! in, ordered saved-search and macro configuration text out.
//!
//! This crate provides:
//! - YAML detection schema with a single validation pass into typed values
//! - `%placeholder%` resolution against a per-detection render context
//! - Normalization of a detection into one flat saved-search stanza
//! - Macro merging across flat files and inline declarations
//! - Filesystem discovery and the ordered, fail-fast compilation pipeline

pub mod compiler;
pub mod error;
pub mod loader;
pub mod macros;
pub mod normalize;
pub mod schema;
pub mod templates;
pub mod validation;

pub use compiler::{compile, Artifacts, CompileOptions, FailurePolicy, SkippedDocument};
pub use error::{CompileError, Result};
pub use loader::{DocumentSet, LoadResult, LoadStatus, SourceKind, SourceLoader};
