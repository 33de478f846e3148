//! Core [`SourceLoader`] struct: filesystem-backed source discovery.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::{CompileError, Result};

use super::{DocumentSet, LoadResult, LoadStatus, SourceKind};

/// Filesystem-backed source discovery.
///
/// Scans the detections directory (recursively) for `*.yml` / `*.yaml`
/// structured detections and `*.conf` flat saved searches, and the macros
/// directory for `*.conf` macro files. A missing directory contributes
/// nothing.
pub struct SourceLoader {
    detections_dir: PathBuf,
    macros_dir: PathBuf,
}

impl SourceLoader {
    pub fn new(detections_dir: impl Into<PathBuf>, macros_dir: impl Into<PathBuf>) -> Self {
        Self {
            detections_dir: detections_dir.into(),
            macros_dir: macros_dir.into(),
        }
    }

    pub fn detections_dir(&self) -> &Path {
        &self.detections_dir
    }

    pub fn macros_dir(&self) -> &Path {
        &self.macros_dir
    }

    /// Read every source file into a [`DocumentSet`].
    ///
    /// Dotfiles, hidden directories and files with unsupported extensions
    /// are reported as skipped, at any depth. Any read error aborts
    /// discovery.
    pub fn load_all(&self) -> Result<(DocumentSet, Vec<LoadResult>)> {
        let mut set = DocumentSet::new();
        let mut results = Vec::new();
        self.scan(&self.detections_dir, "detections", detection_kind, &mut set, &mut results)?;
        self.scan(&self.macros_dir, "macros", macro_kind, &mut set, &mut results)?;
        info!(
            documents = set.len(),
            skipped = results
                .iter()
                .filter(|r| matches!(r.status, LoadStatus::Skipped { .. }))
                .count(),
            "discovered sources"
        );
        Ok((set, results))
    }

    fn scan(
        &self,
        dir: &Path,
        prefix: &str,
        classify: fn(&str) -> Option<SourceKind>,
        set: &mut DocumentSet,
        results: &mut Vec<LoadResult>,
    ) -> Result<()> {
        if !dir.is_dir() {
            debug!(path = %dir.display(), "source directory missing, nothing to load");
            return Ok(());
        }

        let mut walker = WalkDir::new(dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter();

        while let Some(entry) = walker.next() {
            let entry = entry?;
            if entry.depth() > 0 && is_hidden(entry.file_name()) {
                let reason = if entry.file_type().is_dir() {
                    walker.skip_current_dir();
                    "hidden directory"
                } else {
                    "dotfile"
                };
                results.push(LoadResult {
                    path: entry.path().to_path_buf(),
                    status: LoadStatus::Skipped {
                        reason: reason.to_string(),
                    },
                });
                continue;
            }
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path().to_path_buf();

            let ext = path
                .extension()
                .and_then(|e| e.to_str())
                .map(str::to_ascii_lowercase)
                .unwrap_or_default();
            let Some(kind) = classify(&ext) else {
                results.push(LoadResult {
                    path,
                    status: LoadStatus::Skipped {
                        reason: format!("unsupported file type '{ext}'"),
                    },
                });
                continue;
            };

            let source_id = source_id(prefix, dir, &path);
            let text = fs::read_to_string(&path).map_err(|source| CompileError::Io {
                path: path.display().to_string(),
                source,
            })?;
            debug!(source = %source_id, kind = %kind, "loaded source");
            set.push(source_id.clone(), kind, text);
            results.push(LoadResult {
                path,
                status: LoadStatus::Loaded { source_id, kind },
            });
        }

        Ok(())
    }
}

fn detection_kind(ext: &str) -> Option<SourceKind> {
    match ext {
        "yml" | "yaml" => Some(SourceKind::Detection),
        "conf" => Some(SourceKind::FlatDetection),
        _ => None,
    }
}

fn macro_kind(ext: &str) -> Option<SourceKind> {
    match ext {
        "conf" => Some(SourceKind::FlatMacros),
        _ => None,
    }
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_str().map(|n| n.starts_with('.')).unwrap_or(false)
}

/// `<prefix>/<path relative to dir>` with `/` separators on every platform.
fn source_id(prefix: &str, dir: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(dir).unwrap_or(path);
    let parts: Vec<String> = rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    format!("{}/{}", prefix, parts.join("/"))
}
