//! Lenient scalar fields: YAML authors write `schedule_window: 5` as often as
//! `schedule_window: "5"`, and a single description line without a list.

use serde::{Deserialize, Deserializer, Serialize};

/// A field that accepts either one string or a list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextLines {
    One(String),
    Many(Vec<String>),
}

impl TextLines {
    /// All lines joined by a single space.
    pub fn joined(&self) -> String {
        match self {
            TextLines::One(s) => s.clone(),
            TextLines::Many(lines) => lines.join(" "),
        }
    }

    pub fn into_lines(self) -> Vec<String> {
        match self {
            TextLines::One(s) => vec![s],
            TextLines::Many(lines) => lines,
        }
    }
}

/// Deserialize an optional string, number or boolean into its text form.
pub fn opt_scalar<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let value = Option::<serde_yaml::Value>::deserialize(deserializer)?;
    match value {
        None | Some(serde_yaml::Value::Null) => Ok(None),
        Some(serde_yaml::Value::String(s)) => Ok(Some(s)),
        Some(serde_yaml::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(serde_yaml::Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected a string or number, got {other:?}"
        ))),
    }
}
