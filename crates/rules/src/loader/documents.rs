//! In-memory input to a compilation run.

use std::fmt;

/// How a source file is routed through the compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Structured YAML detection, normalized into a stanza.
    Detection,
    /// Hand-written saved-search stanzas, passed through.
    FlatDetection,
    /// Hand-written macro stanzas, merged with inline macros.
    FlatMacros,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Detection => write!(f, "detection"),
            SourceKind::FlatDetection => write!(f, "flat-detection"),
            SourceKind::FlatMacros => write!(f, "flat-macros"),
        }
    }
}

/// One input file: an identifier (its relative path), its kind and its text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    pub id: String,
    pub kind: SourceKind,
    pub text: String,
}

/// The full set of inputs for one compilation.
///
/// Accessors always return documents sorted by id, whatever order they were
/// added in, so filesystem iteration order never leaks into output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentSet {
    documents: Vec<SourceDocument>,
}

impl DocumentSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, id: impl Into<String>, kind: SourceKind, text: impl Into<String>) {
        self.documents.push(SourceDocument {
            id: id.into(),
            kind,
            text: text.into(),
        });
    }

    /// Builder-style [`push`](Self::push).
    pub fn with(mut self, id: impl Into<String>, kind: SourceKind, text: impl Into<String>) -> Self {
        self.push(id, kind, text);
        self
    }

    /// Documents of one kind, sorted by id.
    pub fn of_kind(&self, kind: SourceKind) -> Vec<&SourceDocument> {
        let mut docs: Vec<&SourceDocument> =
            self.documents.iter().filter(|d| d.kind == kind).collect();
        docs.sort_by(|a, b| a.id.cmp(&b.id));
        docs
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
