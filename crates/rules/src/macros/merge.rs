//! Deduplication and conflict detection across all fragment declarations.

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{CompileError, Result};
use crate::schema::{Fragment, FragmentKey};

use super::{FragmentDecl, Provenance};

/// The merged fragment namespace.
///
/// Built in one pass from every declaration, then only read. Emission order
/// is the order in which each identity was first declared, so callers decide
/// ordering by the order they feed declarations in.
#[derive(Debug, Clone, Default)]
pub struct FragmentSet {
    entries: IndexMap<FragmentKey, (Fragment, Provenance)>,
}

impl FragmentSet {
    /// Merge declarations. Identical repeats collapse to the first one; a
    /// repeat that disagrees fails with [`CompileError::FragmentConflict`].
    pub fn merge<I>(decls: I) -> Result<Self>
    where
        I: IntoIterator<Item = FragmentDecl>,
    {
        let mut entries: IndexMap<FragmentKey, (Fragment, Provenance)> = IndexMap::new();

        for decl in decls {
            let key = decl.fragment.key.clone();
            match entries.get(&key) {
                None => {
                    entries.insert(key, (decl.fragment, decl.provenance));
                }
                Some((existing, first)) if existing.agrees_with(&decl.fragment) => {
                    debug!(
                        macro_key = %key,
                        first = %first,
                        again = %decl.provenance,
                        "identical macro declared twice, keeping first"
                    );
                }
                Some((existing, first)) => {
                    return Err(CompileError::FragmentConflict {
                        key,
                        first: first.to_string(),
                        second: decl.provenance.to_string(),
                        first_definition: existing.definition.clone(),
                        second_definition: decl.fragment.definition,
                    });
                }
            }
        }

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &FragmentKey) -> Option<&Fragment> {
        self.entries.get(key).map(|(f, _)| f)
    }

    /// Where the kept declaration of `key` came from.
    pub fn provenance(&self, key: &FragmentKey) -> Option<&Provenance> {
        self.entries.get(key).map(|(_, p)| p)
    }

    /// Fragments in emission order.
    pub fn iter(&self) -> impl Iterator<Item = &Fragment> {
        self.entries.values().map(|(f, _)| f)
    }

    pub fn into_fragments(self) -> Vec<Fragment> {
        self.entries.into_values().map(|(f, _)| f).collect()
    }
}
