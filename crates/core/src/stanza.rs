use indexmap::IndexMap;
use serde::Serialize;

use crate::error::ConfError;

/// One section of the target format: a header plus ordered key/value pairs.
///
/// Stanzas are immutable once built. Use [`StanzaBuilder`] to assemble one;
/// it rejects a second value for an existing key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stanza {
    header: String,
    entries: IndexMap<String, String>,
}

impl Stanza {
    pub fn builder(header: impl Into<String>) -> StanzaBuilder {
        StanzaBuilder::new(header)
    }

    /// Section name without the surrounding brackets.
    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Entries in emission order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Accumulates entries for a [`Stanza`] in insertion order.
#[derive(Debug, Clone)]
pub struct StanzaBuilder {
    header: String,
    entries: IndexMap<String, String>,
}

impl StanzaBuilder {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            entries: IndexMap::new(),
        }
    }

    /// Append an entry. A key that is already present is a
    /// [`ConfError::DuplicateKey`].
    pub fn push(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<&mut Self, ConfError> {
        let key = key.into();
        if self.entries.contains_key(&key) {
            return Err(ConfError::DuplicateKey {
                stanza: self.header.clone(),
                key,
            });
        }
        self.entries.insert(key, value.into());
        Ok(self)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn build(self) -> Stanza {
        Stanza {
            header: self.header,
            entries: self.entries,
        }
    }

    /// Build with entries reordered alphabetically by key.
    pub fn build_sorted(mut self) -> Stanza {
        self.entries.sort_keys();
        self.build()
    }
}
