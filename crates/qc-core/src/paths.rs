use crate::error::{QcError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Directory constants
// ---------------------------------------------------------------------------

pub const QC_DIR: &str = ".qc";

pub const CONFIG_FILE: &str = ".qc/config.yaml";
pub const ASSIGNMENTS_FILE: &str = ".qc/assignments.yaml";
pub const COMPLETIONS_FILE: &str = ".qc/completions.yaml";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn qc_dir(root: &Path) -> PathBuf {
    root.join(QC_DIR)
}

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

pub fn assignments_path(root: &Path) -> PathBuf {
    root.join(ASSIGNMENTS_FILE)
}

pub fn completions_path(root: &Path) -> PathBuf {
    root.join(COMPLETIONS_FILE)
}

// ---------------------------------------------------------------------------
// Id validation
// ---------------------------------------------------------------------------

static ID_RE: OnceLock<Regex> = OnceLock::new();

fn id_re() -> &'static Regex {
    ID_RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._\-]{0,63}$").unwrap())
}

/// Machine and worksheet ids: 1-64 characters, letters, digits, `.`, `_`,
/// `-`, not starting with punctuation.
pub fn validate_id(id: &str) -> Result<()> {
    if !id_re().is_match(id) {
        return Err(QcError::InvalidId(id.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_ids() {
        for id in ["CT-01", "mri.3T", "x", "WS_daily_phantom", "1"] {
            validate_id(id).unwrap_or_else(|_| panic!("expected valid: {id}"));
        }
    }

    #[test]
    fn invalid_ids() {
        let too_long = "a".repeat(65);
        for id in ["", "-ct", ".hidden", "has space", "ct/01", too_long.as_str()] {
            assert!(validate_id(id).is_err(), "expected invalid: {id}");
        }
    }

    #[test]
    fn path_helpers() {
        let root = Path::new("/tmp/site");
        assert_eq!(config_path(root), PathBuf::from("/tmp/site/.qc/config.yaml"));
        assert_eq!(
            assignments_path(root),
            PathBuf::from("/tmp/site/.qc/assignments.yaml")
        );
        assert_eq!(
            completions_path(root),
            PathBuf::from("/tmp/site/.qc/completions.yaml")
        );
    }
}
