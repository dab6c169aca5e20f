//! TOML file-backed version records
//!
//! Two columns per record: `version_key` (unique) and `version_value`
//! (string-encoded integer). Reads take a shared lock; writes take an
//! exclusive lock and go through a temp-file rename so a crashed run never
//! leaves a half-written table behind.

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use serde::{Deserialize, Serialize};

use crate::adapter::VersionBacking;
use crate::error::Result;

/// One persisted version record
#[derive(Debug, Clone, Serialize, Deserialize)]
struct VersionRecord {
    version_key: String,
    version_value: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct VersionTable {
    #[serde(default)]
    records: Vec<VersionRecord>,
}

impl VersionTable {
    fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let file = File::open(path)?;
        file.lock_shared()?;

        // Read through the locked handle to avoid a TOCTOU race
        let mut content = String::new();
        use std::io::Read;
        (&file).read_to_string(&mut content)?;
        let table: VersionTable = toml::from_str(&content)?;

        // Lock released when file is dropped
        Ok(table)
    }

    fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;

        let lock_file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)?;
        lock_file.lock_exclusive()?;

        let temp_path = path.with_extension("toml.tmp");
        fs::write(&temp_path, &content)?;
        fs::rename(&temp_path, path)?;

        // Lock released when lock_file is dropped
        Ok(())
    }
}

/// File-backed [`VersionBacking`] suitable for single-host drivers
pub struct FileVersionBacking {
    path: PathBuf,
}

impl FileVersionBacking {
    /// Create a backing at a path; the file is created on first write
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the underlying TOML file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl VersionBacking for FileVersionBacking {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let table = VersionTable::load(&self.path)?;
        Ok(table
            .records
            .into_iter()
            .find(|r| r.version_key == key)
            .map(|r| r.version_value))
    }

    fn store(&mut self, key: &str, value: &str) -> Result<()> {
        let mut table = VersionTable::load(&self.path)?;
        match table.records.iter_mut().find(|r| r.version_key == key) {
            Some(record) => record.version_value = value.to_string(),
            None => table.records.push(VersionRecord {
                version_key: key.to_string(),
                version_value: value.to_string(),
            }),
        }
        table.save(&self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::version::VersionStore;
    use tempfile::tempdir;

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempdir().unwrap();
        let backing = FileVersionBacking::new(dir.path().join("versions.toml"));
        assert!(backing.load("version_blocks_home").unwrap().is_none());
    }

    #[test]
    fn store_creates_and_updates_records() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("versions.toml");
        let mut backing = FileVersionBacking::new(&path);

        backing.store("version_blocks_home", "1").unwrap();
        backing.store("version_pages_about", "4").unwrap();
        backing.store("version_blocks_home", "2").unwrap();

        assert_eq!(
            backing.load("version_blocks_home").unwrap().as_deref(),
            Some("2")
        );
        assert_eq!(
            backing.load("version_pages_about").unwrap().as_deref(),
            Some("4")
        );

        // No temp file left behind and the raw layout is the two columns
        assert!(!path.with_extension("toml.tmp").exists());
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("version_key = \"version_blocks_home\""));
        assert!(raw.contains("version_value = \"2\""));
    }

    #[test]
    fn works_behind_the_version_store() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("versions.toml");

        let mut store =
            VersionStore::new(Box::new(FileVersionBacking::new(&path)));
        assert_eq!(store.current_version("blocks_home"), 0);
        store.set_version("blocks_home", 7);

        // A fresh store over the same file sees the persisted value
        let store = VersionStore::new(Box::new(FileVersionBacking::new(&path)));
        assert_eq!(store.current_version("blocks_home"), 7);
        assert!(!store.is_new_version("blocks_home", 7));
    }

    #[test]
    fn unreadable_directory_fails_open_via_store() {
        // Point at a directory rather than a file: every load errors, and
        // the store must still answer 0.
        let dir = tempdir().unwrap();
        let store = VersionStore::new(Box::new(FileVersionBacking::new(dir.path())));
        assert_eq!(store.current_version("blocks_home"), 0);
    }
}
