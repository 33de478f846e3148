//! Compile-time `%placeholder%` substitution.
//!
//! A [`RenderContext`] is built once per detection and never changes while
//! it is used. Resolution is a single left-to-right scan: substituted text is
//! never rescanned, so a value containing `%name%` stays literal. Placeholders
//! the context does not know (`like(x, "%admin%")`) are left exactly as
//! written for the search engine to interpret at run time.

use crate::schema::Detection;

pub const NAME: &str = "name";
pub const DESCRIPTION: &str = "description";
pub const ORIGINAL_DETECTION_SEARCH: &str = "original_detection_search";

/// Values available to placeholders in one detection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderContext {
    name: String,
    description: String,
    original_search: String,
}

impl RenderContext {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        original_search: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            original_search: original_search.into(),
        }
    }

    /// Context for a detection: its name, joined description and raw search.
    pub fn for_detection(detection: &Detection) -> Self {
        Self::new(
            detection.name.clone(),
            detection.description_text(),
            detection.search.clone(),
        )
    }

    /// Value bound to a placeholder identifier, if it is one of ours.
    pub fn lookup(&self, ident: &str) -> Option<&str> {
        match ident {
            NAME => Some(&self.name),
            DESCRIPTION => Some(&self.description),
            ORIGINAL_DETECTION_SEARCH => Some(&self.original_search),
            _ => None,
        }
    }

    /// Replace known placeholders; unknown ones pass through.
    pub fn resolve(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        scan(text, &mut out, |ident, out| match self.lookup(ident) {
            Some(v) => {
                out.push_str(v);
                true
            }
            None => false,
        });
        out
    }

    /// Like [`resolve`](Self::resolve) but fails on the first
    /// identifier-shaped placeholder the context does not know.
    pub fn resolve_strict(&self, text: &str) -> Result<String, String> {
        let mut out = String::with_capacity(text.len());
        let mut unknown: Option<String> = None;
        scan(text, &mut out, |ident, out| match self.lookup(ident) {
            Some(v) => {
                out.push_str(v);
                true
            }
            None => {
                if unknown.is_none() {
                    unknown = Some(ident.to_string());
                }
                false
            }
        });
        match unknown {
            Some(ident) => Err(ident),
            None => Ok(out),
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Walk `text`, calling `substitute` for every `%ident%`. When it returns
/// false the placeholder is copied through unchanged.
fn scan<F>(text: &str, out: &mut String, mut substitute: F)
where
    F: FnMut(&str, &mut String) -> bool,
{
    let mut rest = text;
    while let Some(start) = rest.find('%') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('%') {
            Some(end)
                if end > 0 && after[..end].chars().all(is_ident_char) =>
            {
                let ident = &after[..end];
                if !substitute(ident, out) {
                    out.push('%');
                    out.push_str(ident);
                    out.push('%');
                }
                rest = &after[end + 1..];
            }
            _ => {
                // Lone '%': emit it and keep scanning from the next char, so
                // "50% of %name%" still resolves the placeholder.
                out.push('%');
                rest = after;
            }
        }
    }
    out.push_str(rest);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> RenderContext {
        RenderContext::new(
            "Suspicious Login",
            "Detects odd logins. From new places.",
            "index=auth action=success",
        )
    }

    #[test]
    fn resolves_name() {
        assert_eq!(ctx().resolve("%name%"), "Suspicious Login");
    }

    #[test]
    fn resolves_all_known_placeholders() {
        let out = ctx().resolve("%name%: %description% | %original_detection_search% | head 10");
        assert_eq!(
            out,
            "Suspicious Login: Detects odd logins. From new places. | index=auth action=success | head 10"
        );
    }

    #[test]
    fn unknown_placeholders_pass_through() {
        let text = r#"| where like(process, "%powershell%") AND user="%name%""#;
        assert_eq!(
            ctx().resolve(text),
            r#"| where like(process, "%powershell%") AND user="Suspicious Login""#
        );
    }

    #[test]
    fn runtime_tokens_are_untouched() {
        let text = "| eval user=$user$ | search dest=\"$dest$\"";
        assert_eq!(ctx().resolve(text), text);
    }

    #[test]
    fn lone_percent_does_not_swallow_placeholder() {
        assert_eq!(ctx().resolve("50% of %name%"), "50% of Suspicious Login");
        assert_eq!(ctx().resolve("100%"), "100%");
        assert_eq!(ctx().resolve("%%name%"), "%Suspicious Login");
    }

    #[test]
    fn resolution_is_not_recursive() {
        let c = RenderContext::new("%description%", "boom", "s");
        assert_eq!(c.resolve("%name%"), "%description%");
    }

    #[test]
    fn strict_reports_unknown() {
        assert_eq!(ctx().resolve_strict("%name% %nope%"), Err("nope".to_string()));
        assert_eq!(ctx().resolve_strict("%name% 50%").unwrap(), "Suspicious Login 50%");
    }

    #[test]
    fn text_without_placeholders_is_unchanged() {
        assert_eq!(ctx().resolve("index=main | stats count"), "index=main | stats count");
        assert_eq!(ctx().resolve(""), "");
    }
}
