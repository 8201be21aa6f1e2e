//! Process-wide configuration: input-path allowlisting and diagnostics.
//!
//! Per the external-interfaces contract, the core reads two environment
//! variables at startup time: `FPDF_ALLOWED_DIRS` restricts which
//! directories a document path may be opened from, and `FPDF_DEBUG=1`
//! enables verbose diagnostic logging to stderr.

use std::env;
use std::path::{Path, PathBuf};

/// Runtime configuration for path allowlisting and diagnostics.
#[derive(Debug, Clone, Default)]
pub struct PdfConfig {
    /// Directories a document path must reside under, if non-empty.
    /// Populated from `FPDF_ALLOWED_DIRS` (colon-separated).
    pub allowed_dirs: Vec<PathBuf>,

    /// Whether verbose diagnostics should be logged. Populated from
    /// `FPDF_DEBUG=1`.
    pub debug: bool,
}

impl PdfConfig {
    /// Build configuration from the process environment.
    pub fn from_env() -> Self {
        let allowed_dirs = env::var("FPDF_ALLOWED_DIRS")
            .map(|raw| raw.split(':').filter(|s| !s.is_empty()).map(PathBuf::from).collect())
            .unwrap_or_default();
        let debug = env::var("FPDF_DEBUG").is_ok_and(|v| v == "1");
        Self { allowed_dirs, debug }
    }

    /// Whether `path` is permitted to be opened under this configuration.
    ///
    /// An empty allowlist permits any path; this matches the "optional"
    /// framing of `FPDF_ALLOWED_DIRS` — the restriction only applies once
    /// at least one directory has been declared.
    pub fn is_path_allowed(&self, path: &Path) -> bool {
        if self.allowed_dirs.is_empty() {
            return true;
        }
        let Ok(canonical) = path.canonicalize() else {
            return false;
        };
        self.allowed_dirs.iter().any(|dir| {
            dir.canonicalize().map(|d| canonical.starts_with(&d)).unwrap_or(false)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_allowlist_permits_any_path() {
        let config = PdfConfig::default();
        assert!(config.is_path_allowed(Path::new("/tmp/whatever.pdf")));
    }

    #[test]
    fn nonexistent_path_is_rejected_under_a_restrictive_allowlist() {
        let config = PdfConfig {
            allowed_dirs: vec![PathBuf::from("/tmp")],
            debug: false,
        };
        assert!(!config.is_path_allowed(Path::new("/definitely/not/a/real/path.pdf")));
    }
}
