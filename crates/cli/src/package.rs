//! App packaging: lays out `dist/<appid>_<version>/`, writes the generated
//! configuration into it and archives it as a gzipped tarball.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use detforge_core::{render, BuildConfig, Stanza};
use detforge_rules::Artifacts;
use flate2::write::GzEncoder;
use flate2::Compression;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::AppManifest;

/// Template subdirectories copied as-is into the app root.
const TEMPLATE_DIRS: &[&str] = &["metadata", "static", "README", "lookups"];
const GITKEEP: &str = ".gitkeep";

/// Where a build landed.
#[derive(Debug)]
pub struct PackageOutput {
    pub app_dir: PathBuf,
    pub archive: Option<PathBuf>,
}

/// Lay out the app directory for an already compiled set of artifacts and,
/// when `archive` is set, pack it.
pub fn package(
    config: &BuildConfig,
    manifest: &AppManifest,
    version: &str,
    artifacts: &Artifacts,
    archive: bool,
) -> Result<PackageOutput> {
    let appid = manifest.appid();
    let app_dir = config.dist_dir.join(format!("{appid}_{version}"));

    if app_dir.exists() {
        fs::remove_dir_all(&app_dir)
            .with_context(|| format!("failed to clear {}", app_dir.display()))?;
    }
    fs::create_dir_all(&app_dir)
        .with_context(|| format!("failed to create {}", app_dir.display()))?;
    info!(path = %app_dir.display(), "building app");

    for name in TEMPLATE_DIRS {
        copy_tree(&config.template_dir.join(name), &app_dir.join(name))?;
    }
    let data_dir = app_dir.join("default").join("data");
    copy_tree(&config.template_dir.join("default").join("data"), &data_dir)?;
    copy_tree(&config.lookups_dir, &app_dir.join("lookups"))?;
    copy_dashboards(&config.dashboards_dir, &data_dir.join("ui").join("views"))?;

    let default_dir = app_dir.join("default");
    write_file(&default_dir.join("app.conf"), &app_conf(manifest, version)?)?;
    if !artifacts.savedsearches.is_empty() {
        write_file(&default_dir.join("savedsearches.conf"), &artifacts.savedsearches)?;
    }
    if !artifacts.macros.is_empty() {
        write_file(&default_dir.join("macros.conf"), &artifacts.macros)?;
    }

    strip_gitkeep(&app_dir)?;

    let archive = if archive {
        let path = config.dist_dir.join(format!("{appid}_{version}.tgz"));
        write_archive(&app_dir, appid, &path)?;
        Some(path)
    } else {
        None
    };

    Ok(PackageOutput { app_dir, archive })
}

/// Render `default/app.conf`.
pub fn app_conf(manifest: &AppManifest, version: &str) -> Result<String> {
    let app = &manifest.app;

    let mut install = Stanza::builder("install");
    install
        .push("build", "1")?
        .push("is_configured", "0")?
        .push("state", "enabled")?;

    let mut ui = Stanza::builder("ui");
    ui.push("is_visible", "1")?.push("label", manifest.label())?;

    let mut launcher = Stanza::builder("launcher");
    if let Some(author) = &app.author_name {
        launcher.push("author", author.as_str())?;
    }
    if let Some(description) = &app.description {
        launcher.push("description", description.as_str())?;
    }
    launcher.push("version", version)?;

    let mut id = Stanza::builder("id");
    id.push("name", manifest.appid())?.push("version", version)?;

    let stanzas = [install.build(), ui.build(), launcher.build(), id.build()];
    Ok(render(&stanzas))
}

fn write_file(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))?;
    debug!(path = %path.display(), bytes = text.len(), "wrote file");
    Ok(())
}

/// Recursively copy `src` into `dst`. A missing `src` copies nothing.
fn copy_tree(src: &Path, dst: &Path) -> Result<()> {
    if !src.is_dir() {
        debug!(path = %src.display(), "nothing to copy");
        return Ok(());
    }
    for entry in WalkDir::new(src).sort_by_file_name() {
        let entry = entry.with_context(|| format!("failed to walk {}", src.display()))?;
        let rel = entry.path().strip_prefix(src).unwrap_or(entry.path());
        let target = dst.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .with_context(|| format!("failed to create {}", target.display()))?;
        } else {
            fs::copy(entry.path(), &target).with_context(|| {
                format!("failed to copy {} to {}", entry.path().display(), target.display())
            })?;
        }
    }
    debug!(from = %src.display(), to = %dst.display(), "copied tree");
    Ok(())
}

/// Copy top-level `*.xml` dashboards into the views directory.
fn copy_dashboards(src: &Path, views: &Path) -> Result<()> {
    if !src.is_dir() {
        return Ok(());
    }
    let mut copied = 0usize;
    for entry in WalkDir::new(src).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.with_context(|| format!("failed to walk {}", src.display()))?;
        let path = entry.path();
        let is_xml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("xml"));
        if !entry.file_type().is_file() || !is_xml {
            continue;
        }
        fs::create_dir_all(views)
            .with_context(|| format!("failed to create {}", views.display()))?;
        fs::copy(path, views.join(entry.file_name()))
            .with_context(|| format!("failed to copy dashboard {}", path.display()))?;
        copied += 1;
    }
    info!(dashboards = copied, "copied dashboards");
    Ok(())
}

/// Remove every `.gitkeep`, then any directory that removal left empty.
fn strip_gitkeep(root: &Path) -> Result<()> {
    let mut emptied = Vec::new();
    for entry in WalkDir::new(root).contents_first(true) {
        let entry = entry.with_context(|| format!("failed to walk {}", root.display()))?;
        if entry.file_type().is_file() && entry.file_name() == GITKEEP {
            fs::remove_file(entry.path())
                .with_context(|| format!("failed to remove {}", entry.path().display()))?;
            if let Some(parent) = entry.path().parent() {
                emptied.push(parent.to_path_buf());
            }
        }
    }
    // Deepest first so a parent emptied by its child goes too.
    emptied.sort_by_key(|p| std::cmp::Reverse(p.components().count()));
    for dir in emptied {
        let mut current = dir.as_path();
        while current != root && is_empty_dir(current) {
            fs::remove_dir(current)
                .with_context(|| format!("failed to remove {}", current.display()))?;
            debug!(path = %current.display(), "removed empty directory");
            match current.parent() {
                Some(parent) => current = parent,
                None => break,
            }
        }
    }
    Ok(())
}

fn is_empty_dir(path: &Path) -> bool {
    fs::read_dir(path)
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false)
}

/// Pack `app_dir` into a `.tgz` whose single root entry is `<appid>/`.
fn write_archive(app_dir: &Path, appid: &str, path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::default()));
    builder
        .append_dir_all(appid, app_dir)
        .with_context(|| format!("failed to archive {}", app_dir.display()))?;
    builder
        .into_inner()
        .and_then(|gz| gz.finish())
        .with_context(|| format!("failed to finish {}", path.display()))?;
    info!(path = %path.display(), "wrote archive");
    Ok(())
}
