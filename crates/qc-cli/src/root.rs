use qc_core::paths;
use std::path::{Path, PathBuf};

/// Resolve the QC root directory.
///
/// Priority:
/// 1. `--root` flag / `QC_ROOT` env var (passed in as `explicit`)
/// 2. Walk upward from `cwd` looking for `.qc/`
/// 3. Fall back to `cwd`
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    find_upward(&cwd).unwrap_or(cwd)
}

fn find_upward(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| paths::qc_dir(dir).is_dir())
        .map(Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_root_wins() {
        let dir = TempDir::new().unwrap();
        let result = resolve_root(Some(dir.path()));
        assert_eq!(result, dir.path());
    }

    #[test]
    fn finds_qc_dir_from_subdirectory() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".qc")).unwrap();
        let subdir = dir.path().join("rooms/ct-suite");
        std::fs::create_dir_all(&subdir).unwrap();

        assert_eq!(find_upward(&subdir).as_deref(), Some(dir.path()));
    }

    #[test]
    fn no_qc_dir_found() {
        let dir = TempDir::new().unwrap();
        assert!(find_upward(dir.path()).is_none());
    }
}
