//! Reader for hand-written target-format files.
//!
//! Accepts `[header]` lines, `key = value` lines, blank lines and `#`/`;`
//! comments. A value ending in `\` continues on the next physical line; the
//! backslash and line break are kept so the value re-emits unchanged.
//!
//! Values survive; layout does not. Comment and blank lines are dropped,
//! whitespace around keys and at the ends of values is trimmed, and
//! rendering writes every entry back as `key = value`.

use crate::error::ConfError;
use crate::stanza::{Stanza, StanzaBuilder};

/// Parse a `.conf` document into stanzas, in file order.
pub fn parse_conf(text: &str) -> Result<Vec<Stanza>, ConfError> {
    let mut stanzas = Vec::new();
    let mut current: Option<StanzaBuilder> = None;
    // (line number, key, value so far) while a continuation is open.
    let mut pending: Option<(usize, String, String)> = None;

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim_end_matches('\r');

        if let Some((start, key, mut value)) = pending.take() {
            value.push('\n');
            value.push_str(line);
            if line.ends_with('\\') {
                pending = Some((start, key, value));
            } else {
                push_entry(&mut current, start, key, value)?;
            }
            continue;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
            continue;
        }

        if trimmed.starts_with('[') && trimmed.ends_with(']') {
            let header = &trimmed[1..trimmed.len() - 1];
            if header.trim().is_empty() {
                return Err(ConfError::EmptyHeader { line: line_no });
            }
            if let Some(done) = current.take() {
                stanzas.push(done.build());
            }
            current = Some(StanzaBuilder::new(header));
            continue;
        }

        let Some((key, value)) = trimmed.split_once('=') else {
            return Err(ConfError::Syntax {
                line: line_no,
                text: trimmed.to_string(),
            });
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(ConfError::Syntax {
                line: line_no,
                text: trimmed.to_string(),
            });
        }
        if current.is_none() {
            return Err(ConfError::KeyOutsideStanza {
                line: line_no,
                key: key.to_string(),
            });
        }

        let value = value.trim_start().to_string();
        if value.ends_with('\\') {
            pending = Some((line_no, key.to_string(), value));
        } else {
            push_entry(&mut current, line_no, key.to_string(), value)?;
        }
    }

    // A continuation left open at end of input keeps what it has.
    if let Some((start, key, value)) = pending.take() {
        push_entry(&mut current, start, key, value)?;
    }
    if let Some(done) = current.take() {
        stanzas.push(done.build());
    }
    Ok(stanzas)
}

fn push_entry(
    current: &mut Option<StanzaBuilder>,
    line: usize,
    key: String,
    value: String,
) -> Result<(), ConfError> {
    let Some(builder) = current.as_mut() else {
        return Err(ConfError::KeyOutsideStanza { line, key });
    };
    if builder.contains_key(&key) {
        return Err(ConfError::RepeatedKey {
            line,
            stanza: builder.header().to_string(),
            key,
        });
    }
    builder.push(key, value)?;
    Ok(())
}
