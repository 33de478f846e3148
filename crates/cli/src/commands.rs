use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use detforge_core::BuildConfig;
use detforge_rules::{Artifacts, CompileOptions, LoadStatus, SourceLoader};
use tracing::{info, warn};

use crate::config::AppManifest;
use crate::package::package;
use crate::version::{app_version, commit_count};

/// Discover sources and run the compiler over them.
fn compile_sources(config: &BuildConfig, options: &CompileOptions) -> Result<Artifacts> {
    let loader = SourceLoader::new(&config.detections_dir, &config.macros_dir);
    let (set, results) = loader.load_all().context("failed to discover sources")?;
    for result in &results {
        if let LoadStatus::Skipped { reason } = &result.status {
            info!(path = %result.path.display(), reason = %reason, "ignored file");
        }
    }

    let artifacts = detforge_rules::compile(&set, options).context("compilation failed")?;
    for skipped in &artifacts.skipped {
        warn!(source = %skipped.source_id, error = %skipped.error, "detection left out");
    }
    Ok(artifacts)
}

pub fn build(
    root: &Path,
    config: &BuildConfig,
    options: &CompileOptions,
    patch: Option<u64>,
    archive: bool,
) -> Result<()> {
    let manifest = AppManifest::load(&config.manifest)?;
    let patch = patch.unwrap_or_else(|| commit_count(root));
    let version = app_version(manifest.app.version.as_deref(), patch);
    info!(appid = %manifest.appid(), version = %version, "building app");

    // Compile first: a failed build must not touch dist/.
    let artifacts = compile_sources(config, options)?;
    let out = package(config, &manifest, &version, &artifacts, archive)?;

    println!(
        "Built {} {} ({} searches, {} macros)",
        manifest.appid(),
        version,
        artifacts.stanzas.len(),
        artifacts.fragments.len()
    );
    match &out.archive {
        Some(path) => println!("  {}", path.display()),
        None => println!("  {}", out.app_dir.display()),
    }
    Ok(())
}

pub fn compile(config: &BuildConfig, options: &CompileOptions, out: Option<&Path>) -> Result<()> {
    let artifacts = compile_sources(config, options)?;
    let Some(dir) = out else {
        print!("{}", artifacts.savedsearches);
        if !artifacts.macros.is_empty() {
            if !artifacts.savedsearches.is_empty() {
                println!();
            }
            print!("{}", artifacts.macros);
        }
        return Ok(());
    };

    fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
    for (name, text) in [
        ("savedsearches.conf", &artifacts.savedsearches),
        ("macros.conf", &artifacts.macros),
    ] {
        let path = dir.join(name);
        if text.is_empty() {
            continue;
        }
        fs::write(&path, text).with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), "wrote artifact");
    }
    Ok(())
}

pub fn check(config: &BuildConfig, options: &CompileOptions) -> Result<()> {
    let artifacts = compile_sources(config, options)?;
    println!(
        "OK: {} searches, {} macros, {} skipped",
        artifacts.stanzas.len(),
        artifacts.fragments.len(),
        artifacts.skipped.len()
    );
    for skipped in &artifacts.skipped {
        println!("  skipped {}: {}", skipped.source_id, skipped.error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn write(root: &Path, rel: &str, text: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }

    fn project() -> (TempDir, BuildConfig) {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "app_build.yml", "app:\n  appid: SA-Test\n  version: '1.0'\n");
        write(dir.path(), "detections/dup.yml", "name: Dup\nsearch: index=main\n");
        let config = BuildConfig::default().rooted_at(dir.path());
        (dir, config)
    }

    #[test]
    fn header_collision_writes_nothing() {
        let (dir, config) = project();
        write(dir.path(), "detections/legacy.conf", "[Threat - Dup - Rule]\nsearch = x\n");

        let err = build(dir.path(), &config, &CompileOptions::default(), Some(0), true).unwrap_err();
        assert!(format!("{err:#}").contains("Threat - Dup - Rule"));
        assert!(!config.dist_dir.exists());
    }

    #[test]
    fn failed_build_keeps_previous_output() {
        let (dir, config) = project();
        build(dir.path(), &config, &CompileOptions::default(), Some(0), true).unwrap();
        let saved = config.dist_dir.join("SA-Test_1.0.0/default/savedsearches.conf");
        let before = fs::read_to_string(&saved).unwrap();
        let archive = config.dist_dir.join("SA-Test_1.0.0.tgz");
        let archive_before = fs::read(&archive).unwrap();

        write(dir.path(), "detections/legacy.conf", "[Threat - Dup - Rule]\nsearch = x\n");
        assert!(build(dir.path(), &config, &CompileOptions::default(), Some(0), true).is_err());

        assert_eq!(fs::read_to_string(&saved).unwrap(), before);
        assert_eq!(fs::read(&archive).unwrap(), archive_before);
    }
}
