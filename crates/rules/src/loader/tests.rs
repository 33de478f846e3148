//! Tests for source discovery.

use std::fs;

use tempfile::TempDir;

use super::*;

fn temp_loader() -> (TempDir, SourceLoader) {
    let dir = TempDir::new().expect("create tempdir");
    let loader = SourceLoader::new(dir.path().join("detections"), dir.path().join("macros"));
    (dir, loader)
}

fn write(dir: &TempDir, rel: &str, text: &str) {
    let path = dir.path().join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, text).unwrap();
}

fn loaded_ids(results: &[LoadResult]) -> Vec<String> {
    results
        .iter()
        .filter_map(|r| match &r.status {
            LoadStatus::Loaded { source_id, .. } => Some(source_id.clone()),
            LoadStatus::Skipped { .. } => None,
        })
        .collect()
}

#[test]
fn missing_directories_load_nothing() {
    let (_dir, loader) = temp_loader();
    let (set, results) = loader.load_all().unwrap();
    assert!(set.is_empty());
    assert!(results.is_empty());
}

#[test]
fn classifies_files_by_directory_and_extension() {
    let (dir, loader) = temp_loader();
    write(&dir, "detections/login.yml", "name: a\nsearch: s\n");
    write(&dir, "detections/other.YAML", "name: b\nsearch: s\n");
    write(&dir, "detections/legacy.conf", "[Legacy]\nsearch = s\n");
    write(&dir, "macros/common.conf", "[m]\ndefinition = x\n");

    let (set, _) = loader.load_all().unwrap();
    assert_eq!(set.len(), 4);

    let detections: Vec<&str> = set
        .of_kind(SourceKind::Detection)
        .iter()
        .map(|d| d.id.as_str())
        .collect();
    assert_eq!(detections, ["detections/login.yml", "detections/other.YAML"]);

    let flat = set.of_kind(SourceKind::FlatDetection);
    assert_eq!(flat.len(), 1);
    assert_eq!(flat[0].id, "detections/legacy.conf");
    assert_eq!(flat[0].text, "[Legacy]\nsearch = s\n");

    let macros = set.of_kind(SourceKind::FlatMacros);
    assert_eq!(macros[0].id, "macros/common.conf");
}

#[test]
fn recurses_into_subdirectories_with_relative_ids() {
    let (dir, loader) = temp_loader();
    write(&dir, "detections/endpoint/proc.yml", "name: p\nsearch: s\n");
    write(&dir, "detections/auth.yml", "name: a\nsearch: s\n");

    let (_, results) = loader.load_all().unwrap();
    assert_eq!(
        loaded_ids(&results),
        ["detections/auth.yml", "detections/endpoint/proc.yml"]
    );
}

#[test]
fn unsupported_and_hidden_files_are_skipped() {
    let (dir, loader) = temp_loader();
    write(&dir, "detections/readme.md", "# notes");
    write(&dir, "detections/.draft.yml", "name: d\nsearch: s\n");
    write(&dir, "detections/.hidden/inner.yml", "name: h\nsearch: s\n");
    write(&dir, "macros/notes.yml", "name: n\n");
    write(&dir, "detections/real.yml", "name: r\nsearch: s\n");

    let (set, results) = loader.load_all().unwrap();
    assert_eq!(set.len(), 1);
    assert_eq!(loaded_ids(&results), ["detections/real.yml"]);

    let skipped: Vec<&str> = results
        .iter()
        .filter_map(|r| match &r.status {
            LoadStatus::Skipped { reason } => Some(reason.as_str()),
            LoadStatus::Loaded { .. } => None,
        })
        .collect();
    assert!(skipped.contains(&"unsupported file type 'md'"));
    assert!(skipped.contains(&"unsupported file type 'yml'"));
    assert!(skipped.contains(&"dotfile"));
}

#[test]
fn yaml_in_macros_dir_is_not_a_detection() {
    let (dir, loader) = temp_loader();
    write(&dir, "macros/stray.yml", "name: x\nsearch: s\n");
    let (set, _) = loader.load_all().unwrap();
    assert!(set.of_kind(SourceKind::Detection).is_empty());
}

#[test]
fn document_set_accessors_sort_by_id() {
    let set = DocumentSet::new()
        .with("detections/b.yml", SourceKind::Detection, "")
        .with("detections/a.yml", SourceKind::Detection, "")
        .with("macros/z.conf", SourceKind::FlatMacros, "");
    let ids: Vec<&str> = set
        .of_kind(SourceKind::Detection)
        .iter()
        .map(|d| d.id.as_str())
        .collect();
    assert_eq!(ids, ["detections/a.yml", "detections/b.yml"]);
    assert_eq!(set.len(), 3);
}

#[test]
fn hidden_entries_are_reported_at_every_depth() {
    let (dir, loader) = temp_loader();
    write(&dir, "detections/endpoint/.draft.yml", "name: d\nsearch: s\n");
    write(&dir, "detections/.hidden/inner.yml", "name: h\nsearch: s\n");
    write(&dir, "detections/endpoint/proc.yml", "name: p\nsearch: s\n");

    let (set, results) = loader.load_all().unwrap();
    assert_eq!(set.len(), 1);

    let skipped: Vec<(String, &str)> = results
        .iter()
        .filter_map(|r| match &r.status {
            LoadStatus::Skipped { reason } => {
                let name = r.path.file_name().unwrap().to_string_lossy().into_owned();
                Some((name, reason.as_str()))
            }
            LoadStatus::Loaded { .. } => None,
        })
        .collect();
    assert_eq!(
        skipped,
        [
            (".hidden".to_string(), "hidden directory"),
            (".draft.yml".to_string(), "dotfile"),
        ]
    );
}
