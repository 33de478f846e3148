//! App version: `<major>.<minor>` from the manifest plus a patch number
//! taken from the repository's commit count.

use std::path::Path;
use std::process::Command;

use tracing::{debug, warn};

/// `<major>.<minor>.<patch>` from a manifest version and a patch number.
/// Missing or non-numeric parts become `0`.
pub fn app_version(declared: Option<&str>, patch: u64) -> String {
    let mut parts = declared.unwrap_or("").trim().split('.');
    let mut next = || {
        parts
            .next()
            .and_then(|p| p.trim().parse::<u64>().ok())
            .unwrap_or(0)
    };
    let major = next();
    let minor = next();
    format!("{major}.{minor}.{patch}")
}

/// Number of commits reachable from HEAD in the repository containing
/// `root`, or 0 when git is unavailable or `root` is not in a repository.
pub fn commit_count(root: &Path) -> u64 {
    let output = match Command::new("git")
        .args(["rev-list", "--count", "HEAD"])
        .current_dir(root)
        .output()
    {
        Ok(output) => output,
        Err(e) => {
            warn!(error = %e, "git not available, using patch 0");
            return 0;
        }
    };
    if !output.status.success() {
        debug!(root = %root.display(), "not a git checkout, using patch 0");
        return 0;
    }
    String::from_utf8_lossy(&output.stdout)
        .trim()
        .parse()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn major_minor_plus_patch() {
        assert_eq!(app_version(Some("1.4"), 37), "1.4.37");
    }

    #[test]
    fn missing_parts_are_zero() {
        assert_eq!(app_version(Some("3"), 2), "3.0.2");
        assert_eq!(app_version(None, 0), "0.0.0");
        assert_eq!(app_version(Some("x.y"), 5), "0.0.5");
    }

    #[test]
    fn declared_patch_is_replaced() {
        assert_eq!(app_version(Some("1.2.9"), 4), "1.2.4");
    }
}
