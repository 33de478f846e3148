//! Detection validation with structured errors and warnings.
//!
//! One pass over a [`DetectionSpec`] collects every problem it can find,
//! then either produces the typed [`Detection`] or fails with all of them at
//! once. Errors block compilation; warnings are logged and advisory.

mod detection_checks;
mod schedule_checks;

pub mod fuzzy;

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{CompileError, Result};
use crate::schema::*;

// ── Result types ────────────────────────────────────────────────────

/// Overall validation outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

/// A blocking validation error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Field path inside the document, e.g. `"rba.risk_objects[1].field"`.
    pub path: String,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// A non-blocking advisory warning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationResult {
    pub(crate) fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub(crate) fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.valid = false;
        self.errors.push(ValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    pub(crate) fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ValidationWarning {
            path: path.into(),
            message: message.into(),
        });
    }
}

// ── Public API ──────────────────────────────────────────────────────

/// Check a parsed [`DetectionSpec`] without converting it.
pub fn check_detection(spec: &DetectionSpec) -> ValidationResult {
    let mut result = ValidationResult::new();
    detection_checks::validate_required(spec, &mut result);
    detection_checks::validate_notable(spec, &mut result);
    detection_checks::validate_rba(spec, &mut result);
    detection_checks::validate_drilldowns(spec, &mut result);
    detection_checks::validate_annotations(spec, &mut result);
    detection_checks::validate_macros(spec, &mut result);
    schedule_checks::validate_scheduling(spec, &mut result);
    result
}

/// Validate a [`DetectionSpec`] and convert it into a typed [`Detection`].
///
/// Field problems fail with [`CompileError::Schema`] listing all of them; an
/// unknown notable domain fails with [`CompileError::Domain`]. Warnings are
/// logged against `source_id`.
pub fn validate_detection(spec: DetectionSpec, source_id: &str) -> Result<Detection> {
    let result = check_detection(&spec);
    for w in &result.warnings {
        warn!(source = %source_id, path = %w.path, "{}", w.message);
    }
    if !result.valid {
        return Err(CompileError::Schema {
            source_id: source_id.to_string(),
            errors: result.errors,
        });
    }

    let notable = spec
        .alert_action
        .and_then(|a| a.notable)
        .map(|n| convert_notable(n, source_id))
        .transpose()?;

    Ok(Detection {
        name: spec.name.unwrap_or_default().trim().to_string(),
        description: spec.description.map(TextLines::into_lines).unwrap_or_default(),
        search: spec.search.unwrap_or_default(),
        detection_type: spec
            .detection_type
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DETECTION_TYPE.to_string()),
        enabled_by_default: spec.enabled_by_default,
        scheduling: spec.scheduling,
        notable,
        rba: spec.rba,
        drilldown_searches: spec.drilldown_searches,
        annotations: spec
            .annotations
            .into_iter()
            .map(|(framework, ids)| (framework, ids.into_lines()))
            .collect(),
        macros: spec.macros,
    })
}

fn convert_notable(n: NotableSpec, source_id: &str) -> Result<Notable> {
    let domain = match n.domain.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
        None => None,
        Some(raw) => Some(raw.parse::<NotableDomain>().map_err(|_| CompileError::Domain {
            source_id: source_id.to_string(),
            value: raw.to_string(),
            suggestion: fuzzy::fuzzy_match(raw, &NotableDomain::ALL).map(str::to_string),
        })?),
    };

    Ok(Notable {
        enabled: n.enabled,
        rule_title: n.rule_title,
        rule_description: n.rule_description,
        severity: n
            .severity
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_SEVERITY.to_string()),
        domain,
        field: n.field.filter(|f| !f.trim().is_empty()),
        field_type: n
            .field_type
            .unwrap_or_else(|| DEFAULT_OBJECT_TYPE.to_string()),
        score: n.score.unwrap_or(0),
    })
}

#[cfg(test)]
mod tests;
