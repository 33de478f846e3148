//! Detection document types: the authored YAML shape and its validated form.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::scalar::{opt_scalar, TextLines};
use super::{FragmentSpec, NotableDomain};

// ── Authored shape ───────────────────────────────────────────────────

/// One detection as written in a `.yml` file.
///
/// Unknown keys (authoring metadata such as `id`, `author`, `references`)
/// are accepted and ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DetectionSpec {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<TextLines>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default, rename = "type")]
    pub detection_type: Option<String>,
    #[serde(default)]
    pub enabled_by_default: bool,
    #[serde(default)]
    pub scheduling: Option<Scheduling>,
    #[serde(default)]
    pub alert_action: Option<AlertAction>,
    #[serde(default)]
    pub rba: Option<RiskSpec>,
    #[serde(default)]
    pub drilldown_searches: Vec<DrilldownSpec>,
    #[serde(default)]
    pub annotations: IndexMap<String, TextLines>,
    #[serde(default)]
    pub macros: Vec<FragmentSpec>,
}

/// Cron-driven execution settings. Absent means the search is never scheduled.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Scheduling {
    #[serde(default)]
    pub cron_schedule: Option<String>,
    #[serde(default, deserialize_with = "opt_scalar")]
    pub earliest_time: Option<String>,
    #[serde(default, deserialize_with = "opt_scalar")]
    pub latest_time: Option<String>,
    /// Passed through verbatim, including `auto`.
    #[serde(default, deserialize_with = "opt_scalar")]
    pub schedule_window: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AlertAction {
    #[serde(default)]
    pub notable: Option<NotableSpec>,
}

/// Notable-event settings as authored; `domain` is checked against
/// [`NotableDomain`] during validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct NotableSpec {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub rule_title: Option<String>,
    #[serde(default)]
    pub rule_description: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub field: Option<String>,
    #[serde(default, rename = "type")]
    pub field_type: Option<String>,
    #[serde(default)]
    pub score: Option<u32>,
}

/// Risk-based alerting settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RiskSpec {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub message: Option<TextLines>,
    #[serde(default)]
    pub risk_objects: Vec<RiskObject>,
    #[serde(default)]
    pub threat_objects: Vec<ThreatObject>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RiskObject {
    #[serde(default)]
    pub field: String,
    #[serde(default, rename = "type")]
    pub object_type: Option<String>,
    #[serde(default)]
    pub score: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ThreatObject {
    #[serde(default)]
    pub field: String,
    #[serde(default, rename = "type")]
    pub object_type: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DrilldownSpec {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub earliest_offset: Option<String>,
    #[serde(default)]
    pub latest_offset: Option<String>,
}

// ── Validated shape ──────────────────────────────────────────────────

/// Default `action.correlationsearch.detection_type`.
pub const DEFAULT_DETECTION_TYPE: &str = "ebd";
/// Default notable severity.
pub const DEFAULT_SEVERITY: &str = "medium";
/// Default type of a risk, threat or notable entity field.
pub const DEFAULT_OBJECT_TYPE: &str = "other";
pub const DEFAULT_EARLIEST_OFFSET: &str = "$info_min_time$";
pub const DEFAULT_LATEST_OFFSET: &str = "$info_max_time$";

/// A detection that passed validation. Required fields are present and
/// non-empty; the notable domain is one of the known values.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub name: String,
    pub description: Vec<String>,
    pub search: String,
    pub detection_type: String,
    pub enabled_by_default: bool,
    pub scheduling: Option<Scheduling>,
    pub notable: Option<Notable>,
    pub rba: Option<RiskSpec>,
    pub drilldown_searches: Vec<DrilldownSpec>,
    pub annotations: IndexMap<String, Vec<String>>,
    pub macros: Vec<FragmentSpec>,
}

impl Detection {
    /// Description lines joined by a single space.
    pub fn description_text(&self) -> String {
        self.description.join(" ")
    }

    /// The notable section, only when it is switched on.
    pub fn enabled_notable(&self) -> Option<&Notable> {
        self.notable.as_ref().filter(|n| n.enabled)
    }

    /// The risk section, only when it is switched on.
    pub fn enabled_rba(&self) -> Option<&RiskSpec> {
        self.rba.as_ref().filter(|r| r.enabled)
    }
}

/// Validated notable settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Notable {
    pub enabled: bool,
    pub rule_title: Option<String>,
    pub rule_description: Option<String>,
    pub severity: String,
    pub domain: Option<NotableDomain>,
    pub field: Option<String>,
    pub field_type: String,
    pub score: u32,
}
