//! Error types for a compilation run.
//!
//! Every variant names the source it came from so an author can fix the
//! input without reading generated output.

use detforge_core::ConfError;

use crate::schema::FragmentKey;
use crate::validation::ValidationError;

/// Errors that abort a compilation run.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// Filesystem I/O error while discovering or reading sources.
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Directory traversal error.
    #[error("walk error: {0}")]
    Walk(#[from] walkdir::Error),

    /// YAML parse/deserialization error in a structured detection.
    #[error("{source_id}: YAML parse error: {source}")]
    Yaml {
        source_id: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// Syntax error in a flat `.conf` input.
    #[error("{source_id}: {source}")]
    Conf {
        source_id: String,
        #[source]
        source: ConfError,
    },

    /// Missing or invalid required field(s) in a detection document.
    #[error("{source_id}: invalid detection: {}", join_errors(.errors))]
    Schema {
        source_id: String,
        errors: Vec<ValidationError>,
    },

    /// Notable domain outside the accepted set.
    #[error(
        "{source_id}: alert_action.notable.domain '{value}' is not one of {}{}",
        crate::schema::NotableDomain::ALL.join(", "),
        did_you_mean(.suggestion)
    )]
    Domain {
        source_id: String,
        value: String,
        suggestion: Option<String>,
    },

    /// Two sources produce the same stanza header.
    #[error("stanza [{header}] is produced by both {first} and {second}")]
    HeaderCollision {
        header: String,
        first: String,
        second: String,
    },

    /// Two structured detections share a name.
    #[error("detection name '{name}' is used by both {first} and {second}")]
    DuplicateName {
        name: String,
        first: String,
        second: String,
    },

    /// Two declarations of one fragment identity disagree.
    #[error(
        "macro {key} is declared differently in {first} and {second}: \
         '{first_definition}' vs '{second_definition}'"
    )]
    FragmentConflict {
        key: FragmentKey,
        first: String,
        second: String,
        first_definition: String,
        second_definition: String,
    },

    /// Unknown `%placeholder%` while strict placeholder checking is on.
    #[error("{source_id}: {path}: unknown placeholder '%{placeholder}%'")]
    Placeholder {
        source_id: String,
        path: String,
        placeholder: String,
    },

    /// JSON encoding of a structured value failed.
    #[error("{source_id}: failed to encode {path}: {source}")]
    Json {
        source_id: String,
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl CompileError {
    /// The source document this error belongs to, when it belongs to one.
    pub fn source_id(&self) -> Option<&str> {
        match self {
            CompileError::Yaml { source_id, .. }
            | CompileError::Conf { source_id, .. }
            | CompileError::Schema { source_id, .. }
            | CompileError::Domain { source_id, .. }
            | CompileError::Placeholder { source_id, .. }
            | CompileError::Json { source_id, .. } => Some(source_id),
            CompileError::Io { .. }
            | CompileError::Walk(_)
            | CompileError::HeaderCollision { .. }
            | CompileError::DuplicateName { .. }
            | CompileError::FragmentConflict { .. } => None,
        }
    }

    /// Whether the error is confined to a single document, so that a
    /// skip-invalid run may drop that document and continue.
    pub fn is_document_local(&self) -> bool {
        matches!(
            self,
            CompileError::Yaml { .. }
                | CompileError::Schema { .. }
                | CompileError::Domain { .. }
                | CompileError::Placeholder { .. }
        )
    }
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

fn did_you_mean(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(" (did you mean '{s}'?)"),
        None => String::new(),
    }
}

/// Result alias for compiler operations.
pub type Result<T> = std::result::Result<T, CompileError>;
