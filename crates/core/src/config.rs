use std::env;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_path(key: &str, default: &str) -> PathBuf {
    PathBuf::from(env_or(key, default))
}

// ── Source tree layout ────────────────────────────────────────

/// Where an application's sources live and where build output goes.
///
/// Every path is relative to the project root unless set to an absolute
/// path through the environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildConfig {
    /// Application manifest (`app_build.yml`).
    pub manifest: PathBuf,
    /// Structured `.yml` detections and flat `.conf` saved searches.
    pub detections_dir: PathBuf,
    /// Flat `.conf` macro definitions.
    pub macros_dir: PathBuf,
    pub lookups_dir: PathBuf,
    /// Dashboard `.xml` views.
    pub dashboards_dir: PathBuf,
    /// Static skeleton copied into every build.
    pub template_dir: PathBuf,
    pub dist_dir: PathBuf,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            manifest: PathBuf::from("app_build.yml"),
            detections_dir: PathBuf::from("detections"),
            macros_dir: PathBuf::from("macros"),
            lookups_dir: PathBuf::from("lookups"),
            dashboards_dir: PathBuf::from("dashboards"),
            template_dir: PathBuf::from("app_template"),
            dist_dir: PathBuf::from("dist"),
        }
    }
}

impl BuildConfig {
    /// Build config from `DETFORGE_*` environment variables (call
    /// `load_dotenv()` first). Unset or empty variables fall back to the
    /// conventional directory names.
    pub fn from_env() -> Self {
        Self {
            manifest: env_path("DETFORGE_MANIFEST", "app_build.yml"),
            detections_dir: env_path("DETFORGE_DETECTIONS_DIR", "detections"),
            macros_dir: env_path("DETFORGE_MACROS_DIR", "macros"),
            lookups_dir: env_path("DETFORGE_LOOKUPS_DIR", "lookups"),
            dashboards_dir: env_path("DETFORGE_DASHBOARDS_DIR", "dashboards"),
            template_dir: env_path("DETFORGE_TEMPLATE_DIR", "app_template"),
            dist_dir: env_path("DETFORGE_DIST_DIR", "dist"),
        }
    }

    /// Resolve every relative path against `root`.
    pub fn rooted_at(&self, root: &Path) -> Self {
        let join = |p: &PathBuf| {
            if p.is_absolute() {
                p.clone()
            } else {
                root.join(p)
            }
        };
        Self {
            manifest: join(&self.manifest),
            detections_dir: join(&self.detections_dir),
            macros_dir: join(&self.macros_dir),
            lookups_dir: join(&self.lookups_dir),
            dashboards_dir: join(&self.dashboards_dir),
            template_dir: join(&self.template_dir),
            dist_dir: join(&self.dist_dir),
        }
    }

    /// Print the resolved layout for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Build layout:");
        tracing::info!("  manifest:    {}", self.manifest.display());
        tracing::info!("  detections:  {}", self.detections_dir.display());
        tracing::info!("  macros:      {}", self.macros_dir.display());
        tracing::info!("  lookups:     {}", self.lookups_dir.display());
        tracing::info!("  dashboards:  {}", self.dashboards_dir.display());
        tracing::info!("  template:    {}", self.template_dir.display());
        tracing::info!("  dist:        {}", self.dist_dir.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rooted_at_joins_relative_paths() {
        let cfg = BuildConfig::default().rooted_at(Path::new("/work/app"));
        assert_eq!(cfg.detections_dir, PathBuf::from("/work/app/detections"));
        assert_eq!(cfg.manifest, PathBuf::from("/work/app/app_build.yml"));
    }

    #[test]
    fn rooted_at_keeps_absolute_paths() {
        let cfg = BuildConfig {
            dist_dir: PathBuf::from("/tmp/out"),
            ..BuildConfig::default()
        }
        .rooted_at(Path::new("/work/app"));
        assert_eq!(cfg.dist_dir, PathBuf::from("/tmp/out"));
        assert_eq!(cfg.macros_dir, PathBuf::from("/work/app/macros"));
    }
}
