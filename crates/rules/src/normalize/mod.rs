//! Detection Normalizer: one validated [`Detection`] in, one flat
//! saved-search [`Stanza`] out, plus the detection's inline macros.
//!
//! Keys are emitted in alphabetical order. A failure anywhere leaves no
//! stanza behind; the whole detection is rejected.

use detforge_core::{continue_lines, Stanza, StanzaBuilder};
use serde::Serialize;
use tracing::debug;

use crate::error::{CompileError, Result};
use crate::schema::*;
use crate::templates::RenderContext;

/// App that opens results of correlation searches.
pub const UI_DISPATCH_APP: &str = "SplunkEnterpriseSecuritySuite";
pub const DEFAULT_CRON_SCHEDULE: &str = "0 * * * *";
pub const DEFAULT_EARLIEST_TIME: &str = "-24h";
pub const DEFAULT_LATEST_TIME: &str = "now";

/// Output of normalizing one detection.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub stanza: Stanza,
    /// Inline macros, in declaration order. Not part of the stanza.
    pub fragments: Vec<Fragment>,
}

/// Stanza header for a detection: `<Domain> - <Name> - Rule`.
///
/// The domain comes from an enabled notable section; otherwise it is
/// [`NotableDomain::DEFAULT`].
pub fn stanza_header(detection: &Detection) -> String {
    let domain = detection
        .enabled_notable()
        .and_then(|n| n.domain)
        .unwrap_or(NotableDomain::DEFAULT);
    format!("{} - {} - Rule", domain.title(), detection.name)
}

/// Normalize a detection. `strict_placeholders` turns unknown
/// `%placeholder%` tokens in templated fields into errors.
pub fn normalize(detection: &Detection, source_id: &str, strict_placeholders: bool) -> Result<Normalized> {
    let header = stanza_header(detection);
    let renderer = Renderer {
        ctx: RenderContext::for_detection(detection),
        source_id,
        strict: strict_placeholders,
    };
    let mut kv = Entries {
        builder: StanzaBuilder::new(header),
        source_id,
    };

    correlation_keys(detection, &mut kv, source_id)?;
    notable_keys(detection, &renderer, &mut kv)?;
    drilldown_keys(detection, &renderer, &mut kv)?;
    risk_keys(detection, &renderer, &mut kv)?;
    schedule_keys(detection, &mut kv)?;

    kv.push("description", detection.description_text())?;
    kv.push("disabled", if detection.enabled_by_default { "0" } else { "1" })?;
    kv.push("request.ui_dispatch_app", UI_DISPATCH_APP)?;
    kv.push("search", detection.search.as_str())?;

    let stanza = kv.builder.build_sorted();
    debug!(source = %source_id, header = %stanza.header(), keys = stanza.len(), "normalized detection");

    Ok(Normalized {
        stanza,
        fragments: detection.macros.iter().map(Fragment::from_spec).collect(),
    })
}

// ── Helpers ─────────────────────────────────────────────────────────

struct Entries<'a> {
    builder: StanzaBuilder,
    source_id: &'a str,
}

impl Entries<'_> {
    fn push(&mut self, key: &str, value: impl AsRef<str>) -> Result<()> {
        self.builder
            .push(key, continue_lines(value.as_ref()))
            .map_err(|source| CompileError::Conf {
                source_id: self.source_id.to_string(),
                source,
            })?;
        Ok(())
    }
}

struct Renderer<'a> {
    ctx: RenderContext,
    source_id: &'a str,
    strict: bool,
}

impl Renderer<'_> {
    fn resolve(&self, path: &str, text: &str) -> Result<String> {
        if !self.strict {
            return Ok(self.ctx.resolve(text));
        }
        self.ctx
            .resolve_strict(text)
            .map_err(|placeholder| CompileError::Placeholder {
                source_id: self.source_id.to_string(),
                path: path.to_string(),
                placeholder,
            })
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T, source_id: &str, path: &str) -> Result<String> {
    serde_json::to_string(value).map_err(|source| CompileError::Json {
        source_id: source_id.to_string(),
        path: path.to_string(),
        source,
    })
}

#[derive(Serialize)]
struct RiskEntity<'a> {
    risk_object_field: &'a str,
    risk_object_type: &'a str,
    risk_score: u32,
}

#[derive(Serialize)]
struct ThreatEntity<'a> {
    threat_object_field: &'a str,
    threat_object_type: &'a str,
}

#[derive(Serialize)]
#[serde(untagged)]
enum RiskEntry<'a> {
    Risk(RiskEntity<'a>),
    Threat(ThreatEntity<'a>),
}

#[derive(Serialize)]
struct DrilldownEntry<'a> {
    name: String,
    search: String,
    earliest_offset: &'a str,
    latest_offset: &'a str,
}

// ── Sections ────────────────────────────────────────────────────────

fn correlation_keys(d: &Detection, kv: &mut Entries<'_>, source_id: &str) -> Result<()> {
    if !d.annotations.is_empty() {
        let json = to_json(&d.annotations, source_id, "annotations")?;
        kv.push("action.correlationsearch.annotations", json)?;
    }
    kv.push("action.correlationsearch.detection_type", d.detection_type.as_str())?;
    kv.push("action.correlationsearch.enabled", "1")?;
    kv.push("action.correlationsearch.label", d.name.as_str())
}

fn notable_keys(d: &Detection, r: &Renderer<'_>, kv: &mut Entries<'_>) -> Result<()> {
    let Some(notable) = d.enabled_notable() else {
        return kv.push("action.notable", "0");
    };
    kv.push("action.notable", "1")?;

    let entities: Vec<RiskEntity<'_>> = notable
        .field
        .as_deref()
        .map(|field| RiskEntity {
            risk_object_field: field,
            risk_object_type: notable.field_type.as_str(),
            risk_score: notable.score,
        })
        .into_iter()
        .collect();
    kv.push(
        "action.notable.param._entities",
        to_json(&entities, r.source_id, "alert_action.notable.field")?,
    )?;

    let description = notable.rule_description.as_deref().unwrap_or(&d.name);
    kv.push(
        "action.notable.param.rule_description",
        r.resolve("alert_action.notable.rule_description", description)?,
    )?;
    let title = notable.rule_title.as_deref().unwrap_or(&d.name);
    kv.push(
        "action.notable.param.rule_title",
        r.resolve("alert_action.notable.rule_title", title)?,
    )?;
    kv.push(
        "action.notable.param.security_domain",
        notable.domain.unwrap_or(NotableDomain::DEFAULT).as_str(),
    )?;
    kv.push("action.notable.param.severity", notable.severity.as_str())
}

fn drilldown_keys(d: &Detection, r: &Renderer<'_>, kv: &mut Entries<'_>) -> Result<()> {
    if d.drilldown_searches.is_empty() {
        return Ok(());
    }
    let mut entries = Vec::with_capacity(d.drilldown_searches.len());
    for (i, dd) in d.drilldown_searches.iter().enumerate() {
        entries.push(DrilldownEntry {
            name: r.resolve(&format!("drilldown_searches[{i}].name"), &dd.name)?,
            search: r.resolve(&format!("drilldown_searches[{i}].search"), &dd.search)?,
            earliest_offset: dd.earliest_offset.as_deref().unwrap_or(DEFAULT_EARLIEST_OFFSET),
            latest_offset: dd.latest_offset.as_deref().unwrap_or(DEFAULT_LATEST_OFFSET),
        });
    }
    kv.push(
        "action.notable.param.drilldown_searches",
        to_json(&entries, r.source_id, "drilldown_searches")?,
    )
}

fn risk_keys(d: &Detection, r: &Renderer<'_>, kv: &mut Entries<'_>) -> Result<()> {
    let Some(rba) = d.enabled_rba() else {
        return kv.push("action.risk", "0");
    };
    kv.push("action.risk", "1")?;

    // Risk objects first, then threat objects; order inside each list is
    // display precedence and must survive.
    let entries: Vec<RiskEntry<'_>> = rba
        .risk_objects
        .iter()
        .map(|ro| {
            RiskEntry::Risk(RiskEntity {
                risk_object_field: ro.field.as_str(),
                risk_object_type: ro.object_type.as_deref().unwrap_or(DEFAULT_OBJECT_TYPE),
                risk_score: ro.score,
            })
        })
        .chain(rba.threat_objects.iter().map(|to| {
            RiskEntry::Threat(ThreatEntity {
                threat_object_field: to.field.as_str(),
                threat_object_type: to.object_type.as_deref().unwrap_or(DEFAULT_OBJECT_TYPE),
            })
        }))
        .collect();
    kv.push("action.risk.param._risk", to_json(&entries, r.source_id, "rba")?)?;

    let message = rba.message.as_ref().map(TextLines::joined).unwrap_or_default();
    kv.push(
        "action.risk.param._risk_message",
        r.resolve("rba.message", &message)?,
    )
}

fn schedule_keys(d: &Detection, kv: &mut Entries<'_>) -> Result<()> {
    let Some(sched) = &d.scheduling else {
        // Unscheduled: a saved search that only runs on demand.
        return Ok(());
    };
    kv.push(
        "cron_schedule",
        sched.cron_schedule.as_deref().unwrap_or(DEFAULT_CRON_SCHEDULE),
    )?;
    kv.push(
        "dispatch.earliest_time",
        sched.earliest_time.as_deref().unwrap_or(DEFAULT_EARLIEST_TIME),
    )?;
    kv.push(
        "dispatch.latest_time",
        sched.latest_time.as_deref().unwrap_or(DEFAULT_LATEST_TIME),
    )?;
    kv.push("enableSched", "1")?;
    kv.push("run_on_startup", "True")?;
    if let Some(window) = &sched.schedule_window {
        kv.push("schedule_window", window.as_str())?;
    }
    Ok(())
}
