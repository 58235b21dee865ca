//! YAML file plumbing shared by the config and the store files.

use crate::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Replace `path` with `data` through a synced tempfile beside it, so a crash
/// leaves either the old file or the new one.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

pub fn write_yaml<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let text = serde_yaml::to_string(value)?;
    atomic_write(path, text.as_bytes())
}

/// A missing or blank file reads as `T::default()`.
pub fn read_yaml<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(T::default()),
        Err(e) => return Err(e.into()),
    };
    if text.trim().is_empty() {
        return Ok(T::default());
    }
    Ok(serde_yaml::from_str(&text)?)
}

/// Create `path` holding an empty YAML list. Returns false when the file
/// already exists; its contents are never touched.
pub fn seed_empty_list(path: &Path) -> Result<bool> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }
    match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(mut file) => {
            file.write_all(b"[]\n")?;
            Ok(true)
        }
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_reads_as_default() {
        let dir = TempDir::new().unwrap();
        let list: Vec<String> = read_yaml(&dir.path().join("absent.yaml")).unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn blank_file_reads_as_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("completions.yaml");
        fs::write(&path, "  \n").unwrap();
        let list: Vec<String> = read_yaml(&path).unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn write_yaml_creates_parents_and_reads_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".qc/nested/assignments.yaml");
        write_yaml(&path, &["CT-01", "MR-02"]).unwrap();
        let back: Vec<String> = read_yaml(&path).unwrap();
        assert_eq!(back, ["CT-01", "MR-02"]);
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("assignments.yaml");
        fs::write(&path, "[unclosed").unwrap();
        assert!(read_yaml::<Vec<String>>(&path).is_err());
    }

    #[test]
    fn seeding_never_clobbers_existing_data() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".qc/completions.yaml");
        assert!(seed_empty_list(&path).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "[]\n");

        fs::write(&path, "- kept\n").unwrap();
        assert!(!seed_empty_list(&path).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), "- kept\n");
    }
}
