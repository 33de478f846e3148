//! Tests for detection validation.

use super::*;

fn spec(yaml: &str) -> DetectionSpec {
    serde_yaml::from_str(yaml).expect("valid yaml")
}

#[test]
fn valid_minimal_detection() {
    let d = validate_detection(spec("name: X\nsearch: index=main\n"), "detections/x.yml").unwrap();
    assert_eq!(d.name, "X");
    assert_eq!(d.search, "index=main");
    assert_eq!(d.detection_type, DEFAULT_DETECTION_TYPE);
    assert!(d.description.is_empty());
    assert!(d.notable.is_none());
}

#[test]
fn missing_name_and_search_are_both_reported() {
    let err = validate_detection(spec("description: nothing here\n"), "detections/bad.yml").unwrap_err();
    match err {
        CompileError::Schema { source_id, errors } => {
            assert_eq!(source_id, "detections/bad.yml");
            let paths: Vec<&str> = errors.iter().map(|e| e.path.as_str()).collect();
            assert_eq!(paths, vec!["name", "search"]);
        }
        other => panic!("expected schema error, got {other:?}"),
    }
}

#[test]
fn blank_search_is_rejected() {
    let err = validate_detection(spec("name: X\nsearch: '   '\n"), "d.yml").unwrap_err();
    assert!(matches!(err, CompileError::Schema { .. }));
    assert!(err.to_string().contains("search: is required"));
}

#[test]
fn name_with_brackets_is_rejected() {
    let result = check_detection(&spec("name: 'a [b]'\nsearch: s\n"));
    assert!(!result.valid);
    assert_eq!(result.errors[0].path, "name");
}

#[test]
fn unknown_domain_is_domain_error_with_suggestion() {
    let yaml = "name: X\nsearch: s\nalert_action:\n  notable:\n    enabled: true\n    domain: thraet\n";
    let err = validate_detection(spec(yaml), "d.yml").unwrap_err();
    match &err {
        CompileError::Domain { value, suggestion, .. } => {
            assert_eq!(value, "thraet");
            assert_eq!(suggestion.as_deref(), Some("threat"));
        }
        other => panic!("expected domain error, got {other:?}"),
    }
    assert!(err.to_string().contains("did you mean 'threat'"));
}

#[test]
fn domain_is_checked_even_when_notable_disabled() {
    let yaml = "name: X\nsearch: s\nalert_action:\n  notable:\n    enabled: false\n    domain: finance\n";
    let err = validate_detection(spec(yaml), "d.yml").unwrap_err();
    assert!(matches!(err, CompileError::Domain { .. }));
}

#[test]
fn notable_defaults_are_filled() {
    let yaml = "name: X\nsearch: s\nalert_action:\n  notable:\n    enabled: true\n    domain: Endpoint\n";
    let d = validate_detection(spec(yaml), "d.yml").unwrap();
    let n = d.notable.unwrap();
    assert_eq!(n.domain, Some(NotableDomain::Endpoint));
    assert_eq!(n.severity, DEFAULT_SEVERITY);
    assert_eq!(n.field_type, DEFAULT_OBJECT_TYPE);
    assert_eq!(n.score, 0);
}

#[test]
fn risk_object_without_field_is_rejected() {
    let yaml = "name: X\nsearch: s\nrba:\n  enabled: true\n  risk_objects:\n    - type: user\n      score: 10\n";
    let result = check_detection(&spec(yaml));
    assert!(!result.valid);
    assert_eq!(result.errors[0].path, "rba.risk_objects[0].field");
}

#[test]
fn enabled_rba_without_objects_only_warns() {
    let yaml = "name: X\nsearch: s\nrba:\n  enabled: true\n  message: hi\n";
    let result = check_detection(&spec(yaml));
    assert!(result.valid);
    assert_eq!(result.warnings.len(), 1);
    assert_eq!(result.warnings[0].path, "rba.risk_objects");
}

#[test]
fn drilldown_requires_search() {
    let yaml = "name: X\nsearch: s\ndrilldown_searches:\n  - name: a\n    search: s\n  - name: b\n";
    let result = check_detection(&spec(yaml));
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].path, "drilldown_searches[1].search");
}

#[test]
fn inline_macro_checks() {
    let yaml = r#"
name: X
search: s
macros:
  - name: "bad name"
    definition: x
  - name: ok
  - name: args
    definition: y
    arguments: ["a,b"]
"#;
    let result = check_detection(&spec(yaml));
    let paths: Vec<&str> = result.errors.iter().map(|e| e.path.as_str()).collect();
    assert_eq!(
        paths,
        vec!["macros[0].name", "macros[1].definition", "macros[2].arguments[0]"]
    );
}

#[test]
fn cron_must_have_five_fields() {
    let yaml = "name: X\nsearch: s\nscheduling:\n  cron_schedule: '*/5 * * *'\n";
    let result = check_detection(&spec(yaml));
    assert!(!result.valid);
    assert_eq!(result.errors[0].path, "scheduling.cron_schedule");
}

#[test]
fn annotations_preserve_order_after_validation() {
    let yaml = "name: X\nsearch: s\nannotations:\n  mitre_attack: [T1078, T1021]\n  cve: [CVE-1]\n";
    let d = validate_detection(spec(yaml), "d.yml").unwrap();
    let frameworks: Vec<&str> = d.annotations.keys().map(String::as_str).collect();
    assert_eq!(frameworks, vec!["mitre_attack", "cve"]);
    assert_eq!(d.annotations["mitre_attack"], vec!["T1078", "T1021"]);
}

#[test]
fn validation_error_displays_path_and_message() {
    let result = check_detection(&spec("name: X\n"));
    assert_eq!(result.errors[0].to_string(), "search: is required and must not be empty");
}
