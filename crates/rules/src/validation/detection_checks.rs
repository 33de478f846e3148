//! Field checks: required fields, notable, risk, drilldowns, annotations, macros.

use crate::schema::*;
use super::fuzzy::is_fragment_name;
use super::ValidationResult;

fn is_blank(s: Option<&str>) -> bool {
    s.map(|s| s.trim().is_empty()).unwrap_or(true)
}

// ── Required fields ─────────────────────────────────────────────────

pub(super) fn validate_required(spec: &DetectionSpec, result: &mut ValidationResult) {
    if is_blank(spec.name.as_deref()) {
        result.error("name", "is required and must not be empty");
    } else if let Some(name) = &spec.name {
        if name.contains(['[', ']']) {
            result.error("name", "must not contain '[' or ']'");
        }
        if name.contains(['\n', '\r']) {
            result.error("name", "must be a single line");
        }
    }

    if is_blank(spec.search.as_deref()) {
        result.error("search", "is required and must not be empty");
    }
}

// ── Notable ─────────────────────────────────────────────────────────

pub(super) fn validate_notable(spec: &DetectionSpec, result: &mut ValidationResult) {
    let Some(notable) = spec.alert_action.as_ref().and_then(|a| a.notable.as_ref()) else {
        return;
    };
    if !notable.enabled {
        return;
    }

    if is_blank(notable.field.as_deref()) && notable.field_type.is_some() {
        result.warn(
            "alert_action.notable.type",
            "type is set without a field and will be ignored",
        );
    }
    if is_blank(notable.domain.as_deref()) {
        result.warn(
            "alert_action.notable.domain",
            format!(
                "no domain set, notable will be filed under '{}'",
                NotableDomain::DEFAULT
            ),
        );
    }
}

// ── Risk ────────────────────────────────────────────────────────────

pub(super) fn validate_rba(spec: &DetectionSpec, result: &mut ValidationResult) {
    let Some(rba) = &spec.rba else {
        return;
    };

    for (i, ro) in rba.risk_objects.iter().enumerate() {
        if ro.field.trim().is_empty() {
            result.error(format!("rba.risk_objects[{i}].field"), "is required");
        }
    }
    for (i, to) in rba.threat_objects.iter().enumerate() {
        if to.field.trim().is_empty() {
            result.error(format!("rba.threat_objects[{i}].field"), "is required");
        }
    }

    if rba.enabled && rba.risk_objects.is_empty() {
        result.warn("rba.risk_objects", "risk is enabled but no risk objects are listed");
    }
    if rba.enabled && rba.message.is_none() {
        result.warn("rba.message", "risk is enabled without a message");
    }
}

// ── Drilldowns ──────────────────────────────────────────────────────

pub(super) fn validate_drilldowns(spec: &DetectionSpec, result: &mut ValidationResult) {
    for (i, dd) in spec.drilldown_searches.iter().enumerate() {
        if dd.search.trim().is_empty() {
            result.error(format!("drilldown_searches[{i}].search"), "is required");
        }
        if dd.name.trim().is_empty() {
            result.warn(format!("drilldown_searches[{i}].name"), "drilldown has no name");
        }
    }
}

// ── Annotations ─────────────────────────────────────────────────────

pub(super) fn validate_annotations(spec: &DetectionSpec, result: &mut ValidationResult) {
    for framework in spec.annotations.keys() {
        if framework.trim().is_empty() {
            result.error("annotations", "framework name must not be empty");
        }
    }
}

// ── Inline macros ───────────────────────────────────────────────────

pub(super) fn validate_macros(spec: &DetectionSpec, result: &mut ValidationResult) {
    for (i, m) in spec.macros.iter().enumerate() {
        let path = format!("macros[{i}]");
        if m.name.trim().is_empty() {
            result.error(format!("{path}.name"), "is required");
        } else if !is_fragment_name(m.name.trim()) {
            result.error(
                format!("{path}.name"),
                format!("'{}' may only use letters, digits, '_', '-' and '.'", m.name),
            );
        }
        if m.definition.trim().is_empty() {
            result.error(format!("{path}.definition"), "is required");
        }
        for (j, arg) in m.arguments.iter().enumerate() {
            if arg.trim().is_empty() || arg.contains(',') {
                result.error(
                    format!("{path}.arguments[{j}]"),
                    "argument names must be non-empty and must not contain ','",
                );
            }
        }
    }
}
