//! Reusable-fragment (macro) collection and merging.
//!
//! Fragments arrive from flat `.conf` files and from `macros:` sections
//! inside detections. Both feed one namespace keyed by [`FragmentKey`]
//! (name + argument count). Each declaration carries its provenance so a
//! conflict names both sources.

mod merge;


use detforge_core::{continue_lines, ConfError, Stanza, StanzaBuilder};
use indexmap::IndexMap;

use crate::schema::{Fragment, FragmentKey};

pub use merge::FragmentSet;

/// Where a fragment declaration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provenance {
    /// A standalone flat macro file.
    File(String),
    /// The `macros:` section of a structured detection.
    Inline(String),
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provenance::File(id) => write!(f, "{id}"),
            Provenance::Inline(id) => write!(f, "{id} (inline)"),
        }
    }
}

/// One fragment declaration event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentDecl {
    pub fragment: Fragment,
    pub provenance: Provenance,
}

impl Fragment {
    /// Read a fragment from a flat macro stanza.
    ///
    /// The identity comes from the header (`name` or `name(N)`); `args` is a
    /// comma-separated list. Keys other than `definition`, `args` and
    /// `description` are carried along untouched.
    pub fn from_stanza(stanza: &Stanza) -> Self {
        let mut extra = IndexMap::new();
        let mut definition = String::new();
        let mut description = None;
        let mut arguments = Vec::new();

        for (key, value) in stanza.entries() {
            match key {
                "definition" => definition = value.to_string(),
                "description" => description = Some(value.to_string()).filter(|d| !d.is_empty()),
                "args" => {
                    arguments = value
                        .split(',')
                        .map(|a| a.trim().to_string())
                        .filter(|a| !a.is_empty())
                        .collect()
                }
                _ => {
                    extra.insert(key.to_string(), value.to_string());
                }
            }
        }

        Self {
            key: FragmentKey::from_header(stanza.header()),
            definition,
            description,
            arguments,
            extra,
        }
    }

    /// Render as a stanza: `definition`, then `description`, then `args`,
    /// then any carried keys in their original order.
    pub fn to_stanza(&self) -> Result<Stanza, ConfError> {
        let mut b = StanzaBuilder::new(self.key.to_string());
        b.push("definition", continue_lines(&self.definition))?;
        if let Some(desc) = &self.description {
            b.push("description", continue_lines(desc))?;
        }
        if !self.arguments.is_empty() {
            b.push("args", self.arguments.join(", "))?;
        }
        for (k, v) in &self.extra {
            b.push(k.as_str(), v.as_str())?;
        }
        Ok(b.build())
    }

    /// Whether two declarations of the same identity say the same thing.
    ///
    /// Text is compared in its emitted form, so a flat value written with
    /// backslash continuations matches the same lines written in YAML.
    pub fn agrees_with(&self, other: &Fragment) -> bool {
        emitted(&self.definition) == emitted(&other.definition)
            && self.description.as_deref().map(emitted) == other.description.as_deref().map(emitted)
            && self.arguments == other.arguments
            && self.extra == other.extra
    }
}

fn emitted(text: &str) -> String {
    continue_lines(text.trim())
}
