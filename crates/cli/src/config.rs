use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use detforge_rules::schema::opt_scalar;
use serde::Deserialize;
use tracing::debug;

/// Application manifest loaded from `app_build.yml`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppManifest {
    pub app: AppSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppSection {
    /// Directory and archive name of the packaged app.
    #[serde(default)]
    pub appid: String,

    /// Label shown in the app launcher (falls back to appid)
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub author_name: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// `<major>.<minor>`; written as `1.4` or `"1.4"`.
    #[serde(default, deserialize_with = "opt_scalar")]
    pub version: Option<String>,
}

impl AppManifest {
    /// Load and check the manifest at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read app manifest {}", path.display()))?;
        let manifest = Self::parse(&text)
            .with_context(|| format!("invalid app manifest {}", path.display()))?;
        debug!(path = %path.display(), appid = %manifest.app.appid, "loaded app manifest");
        Ok(manifest)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let manifest: AppManifest = serde_yaml::from_str(text).context("failed to parse YAML")?;
        let appid = manifest.app.appid.trim();
        if appid.is_empty() {
            bail!("app.appid is required");
        }
        if appid.contains(['/', '\\']) || appid.starts_with('.') {
            bail!("app.appid '{appid}' is not a valid directory name");
        }
        Ok(manifest)
    }

    pub fn appid(&self) -> &str {
        self.app.appid.trim()
    }

    pub fn label(&self) -> &str {
        self.app
            .title
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| self.appid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_manifest() {
        let m = AppManifest::parse(
            "app:\n  appid: SA-Test\n  title: Test App\n  author_name: Sec\n  description: d\n  version: 2.1\n",
        )
        .unwrap();
        assert_eq!(m.appid(), "SA-Test");
        assert_eq!(m.label(), "Test App");
        assert_eq!(m.app.version.as_deref(), Some("2.1"));
    }

    #[test]
    fn label_falls_back_to_appid() {
        let m = AppManifest::parse("app:\n  appid: SA-Test\n").unwrap();
        assert_eq!(m.label(), "SA-Test");
        assert!(m.app.version.is_none());
    }

    #[test]
    fn appid_is_required() {
        let err = AppManifest::parse("app:\n  title: No Id\n").unwrap_err();
        assert!(err.to_string().contains("appid"));
        assert!(AppManifest::parse("app:\n  appid: ../escape\n").is_err());
    }
}
