//! Reusable search fragments (macros).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Inline macro declaration inside a detection document.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FragmentSpec {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub definition: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub arguments: Vec<String>,
}

/// Identity of a fragment: its name plus argument count.
///
/// `foo` and `foo(1)` are different fragments in the target format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FragmentKey {
    pub name: String,
    pub arity: usize,
}

impl FragmentKey {
    /// Parse a stanza header such as `foo` or `foo(2)`.
    ///
    /// A parenthesised suffix that is not a plain number is treated as part
    /// of the name.
    pub fn from_header(header: &str) -> Self {
        let header = header.trim();
        if let Some(open) = header.rfind('(') {
            if let Some(inner) = header[open + 1..].strip_suffix(')') {
                if let Ok(arity) = inner.trim().parse::<usize>() {
                    return Self {
                        name: header[..open].trim_end().to_string(),
                        arity,
                    };
                }
            }
        }
        Self {
            name: header.to_string(),
            arity: 0,
        }
    }
}

impl fmt::Display for FragmentKey {
    /// The target format's header form: `name` or `name(argc)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.arity == 0 {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}({})", self.name, self.arity)
        }
    }
}

/// A fragment ready for merging and emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub key: FragmentKey,
    pub definition: String,
    pub description: Option<String>,
    pub arguments: Vec<String>,
    /// Further keys carried from a flat macro file (`iseval`, `validation`,
    /// `errormsg`, ...), in file order.
    pub extra: IndexMap<String, String>,
}

impl Fragment {
    /// Build from an inline declaration. The arity is the argument count.
    pub fn from_spec(spec: &FragmentSpec) -> Self {
        Self {
            key: FragmentKey {
                name: spec.name.trim().to_string(),
                arity: spec.arguments.len(),
            },
            definition: spec.definition.clone(),
            description: spec.description.clone().filter(|d| !d.is_empty()),
            arguments: spec.arguments.clone(),
            extra: IndexMap::new(),
        }
    }
}
