use thiserror::Error;

/// Errors raised while reading or assembling target-format stanzas.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfError {
    #[error("line {line}: key '{key}' appears before any [stanza] header")]
    KeyOutsideStanza { line: usize, key: String },

    #[error("line {line}: expected '[stanza]' or 'key = value', got '{text}'")]
    Syntax { line: usize, text: String },

    #[error("line {line}: stanza header is empty")]
    EmptyHeader { line: usize },

    #[error("line {line}: key '{key}' is defined twice in [{stanza}]")]
    RepeatedKey {
        line: usize,
        stanza: String,
        key: String,
    },

    /// A builder received the same key twice. This is a bug in the caller,
    /// never a problem with authored content.
    #[error("internal error: duplicate key '{key}' emitted for [{stanza}]")]
    DuplicateKey { stanza: String, key: String },
}
