//! Scheduling validation: cron shape and time bounds.

use crate::schema::DetectionSpec;
use super::ValidationResult;

/// Number of whitespace-separated fields in a standard cron expression.
const CRON_FIELDS: usize = 5;

pub(super) fn validate_scheduling(spec: &DetectionSpec, result: &mut ValidationResult) {
    let Some(sched) = &spec.scheduling else {
        return;
    };

    if let Some(cron) = &sched.cron_schedule {
        let fields = cron.split_whitespace().count();
        if fields != CRON_FIELDS {
            result.error(
                "scheduling.cron_schedule",
                format!("expected {CRON_FIELDS} cron fields, got {fields} in '{cron}'"),
            );
        }
    }

    for (path, value) in [
        ("scheduling.earliest_time", &sched.earliest_time),
        ("scheduling.latest_time", &sched.latest_time),
        ("scheduling.schedule_window", &sched.schedule_window),
    ] {
        if value.as_deref().map(|v| v.trim().is_empty()).unwrap_or(false) {
            result.error(path, "must not be empty when present");
        }
    }
}
