//! Stanza Emitter: renders stanzas as `[header]` blocks of `key = value` lines.
//!
//! Output is UTF-8 with LF line endings, one blank line between stanzas and a
//! single trailing newline. Identical input always renders identical bytes.

use std::fmt::Write;

use crate::stanza::Stanza;

/// Render stanzas in the order given.
pub fn render<'a, I>(stanzas: I) -> String
where
    I: IntoIterator<Item = &'a Stanza>,
{
    let mut out = String::new();
    for (i, stanza) in stanzas.into_iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        render_stanza(stanza, &mut out);
    }
    out
}

fn render_stanza(stanza: &Stanza, out: &mut String) {
    // Writing into a String cannot fail.
    let _ = writeln!(out, "[{}]", stanza.header());
    for (key, value) in stanza.entries() {
        let _ = writeln!(out, "{key} = {value}");
    }
}

/// Encode a multi-line value with the target format's trailing-backslash
/// continuation so each physical line stays inside the same value.
///
/// Trailing newlines are dropped. Single-line values are returned unchanged,
/// and lines that already end in a backslash are not marked twice.
pub fn continue_lines(value: &str) -> String {
    let trimmed = value.trim_end_matches(['\n', '\r']);
    if !trimmed.contains('\n') {
        return trimmed.to_string();
    }
    let mut out = String::with_capacity(trimmed.len() + 8);
    let mut lines = trimmed.lines().peekable();
    while let Some(line) = lines.next() {
        out.push_str(line);
        if lines.peek().is_some() {
            if line.ends_with('\\') {
                out.push('\n');
            } else {
                out.push_str(" \\\n");
            }
        }
    }
    out
}
