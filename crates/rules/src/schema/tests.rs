//! Tests for schema types.

use super::*;

const FULL_DETECTION_YAML: &str = r#"
name: Suspicious Login
id: 6f1c2b7e-0000-4000-8000-000000000001
author: SOC Team
description:
  - Detects logins from new locations.
  - Tuned for VPN users.
search: |
  index=auth action=success
  | stats count by user, src
type: TTP
enabled_by_default: true
scheduling:
  cron_schedule: "*/15 * * * *"
  earliest_time: -20m
  latest_time: now
  schedule_window: auto
alert_action:
  notable:
    enabled: true
    rule_title: "%name%"
    rule_description: "%description%"
    severity: high
    domain: threat
    field: user
    type: user
    score: 40
rba:
  enabled: true
  message: [Login for $user$ from $src$]
  risk_objects:
    - field: user
      type: user
      score: 40
    - field: src
      type: system
      score: 20
  threat_objects:
    - field: src
      type: ip_address
drilldown_searches:
  - name: View logins for $user$
    search: '%original_detection_search% | search user=$user$'
    earliest_offset: $info_min_time$
annotations:
  mitre_attack: [T1078, T1133]
  cve: CVE-2024-0001
macros:
  - name: auth_filter
    definition: index=auth
  - name: user_filter
    definition: user=$u$
    arguments: [u]
    description: Narrow to one user
"#;

#[test]
fn parse_full_detection() {
    let spec: DetectionSpec = serde_yaml::from_str(FULL_DETECTION_YAML).unwrap();

    assert_eq!(spec.name.as_deref(), Some("Suspicious Login"));
    assert_eq!(
        spec.description.as_ref().unwrap().joined(),
        "Detects logins from new locations. Tuned for VPN users."
    );
    assert!(spec.search.as_ref().unwrap().starts_with("index=auth"));
    assert_eq!(spec.detection_type.as_deref(), Some("TTP"));
    assert!(spec.enabled_by_default);

    let sched = spec.scheduling.as_ref().unwrap();
    assert_eq!(sched.cron_schedule.as_deref(), Some("*/15 * * * *"));
    assert_eq!(sched.earliest_time.as_deref(), Some("-20m"));
    assert_eq!(sched.schedule_window.as_deref(), Some("auto"));

    let notable = spec.alert_action.as_ref().unwrap().notable.as_ref().unwrap();
    assert!(notable.enabled);
    assert_eq!(notable.domain.as_deref(), Some("threat"));
    assert_eq!(notable.field_type.as_deref(), Some("user"));
    assert_eq!(notable.score, Some(40));

    let rba = spec.rba.as_ref().unwrap();
    assert_eq!(rba.risk_objects.len(), 2);
    assert_eq!(rba.risk_objects[1].field, "src");
    assert_eq!(rba.threat_objects[0].object_type.as_deref(), Some("ip_address"));

    assert_eq!(spec.drilldown_searches.len(), 1);
    assert_eq!(spec.drilldown_searches[0].latest_offset, None);

    let frameworks: Vec<&str> = spec.annotations.keys().map(String::as_str).collect();
    assert_eq!(frameworks, vec!["mitre_attack", "cve"]);
    assert_eq!(
        spec.annotations["cve"],
        TextLines::One("CVE-2024-0001".to_string())
    );

    assert_eq!(spec.macros.len(), 2);
    assert_eq!(spec.macros[1].arguments, vec!["u"]);
}

#[test]
fn minimal_detection_defaults() {
    let spec: DetectionSpec = serde_yaml::from_str("name: X\nsearch: index=main\n").unwrap();
    assert!(spec.scheduling.is_none());
    assert!(spec.alert_action.is_none());
    assert!(spec.rba.is_none());
    assert!(!spec.enabled_by_default);
    assert!(spec.drilldown_searches.is_empty());
    assert!(spec.annotations.is_empty());
    assert!(spec.macros.is_empty());
}

#[test]
fn numeric_schedule_window_is_text() {
    let yaml = "name: X\nsearch: s\nscheduling:\n  schedule_window: 5\n";
    let spec: DetectionSpec = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(
        spec.scheduling.unwrap().schedule_window.as_deref(),
        Some("5")
    );
}

#[test]
fn unknown_scheduling_key_is_rejected() {
    let yaml = "name: X\nsearch: s\nscheduling:\n  cron: '* * * * *'\n";
    assert!(serde_yaml::from_str::<DetectionSpec>(yaml).is_err());
}

#[test]
fn domain_round_trip_and_title() {
    for raw in NotableDomain::ALL {
        let d: NotableDomain = raw.parse().unwrap();
        assert_eq!(d.as_str(), raw);
    }
    assert_eq!("Threat".parse::<NotableDomain>().unwrap(), NotableDomain::Threat);
    assert_eq!(NotableDomain::Endpoint.title(), "Endpoint");
    assert!("finance".parse::<NotableDomain>().is_err());
}

#[test]
fn fragment_key_from_header() {
    assert_eq!(
        FragmentKey::from_header("foo"),
        FragmentKey { name: "foo".into(), arity: 0 }
    );
    assert_eq!(
        FragmentKey::from_header("foo(2)"),
        FragmentKey { name: "foo".into(), arity: 2 }
    );
    // Not a number: part of the name.
    assert_eq!(
        FragmentKey::from_header("foo(x)"),
        FragmentKey { name: "foo(x)".into(), arity: 0 }
    );
}

#[test]
fn fragment_key_display() {
    assert_eq!(FragmentKey { name: "foo".into(), arity: 0 }.to_string(), "foo");
    assert_eq!(FragmentKey { name: "foo".into(), arity: 1 }.to_string(), "foo(1)");
}

#[test]
fn fragment_from_spec_uses_argument_count() {
    let spec = FragmentSpec {
        name: "user_filter".into(),
        definition: "user=$u$".into(),
        description: Some(String::new()),
        arguments: vec!["u".into()],
    };
    let f = Fragment::from_spec(&spec);
    assert_eq!(f.key.arity, 1);
    assert_eq!(f.description, None);
}
