//! Persistent client identity.
//!
//! The backend keys chat and analysis history by a caller-chosen user id. The
//! CLI generates one on first use and keeps it in a small text file so
//! subsequent runs see the same history.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::info;
use uuid::Uuid;

use crate::error::{ConfigError, ConfigResult};

/// File-backed store for the client user id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityStore {
    path: PathBuf,
}

impl IdentityStore {
    /// Store rooted at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored id, generating and persisting a UUID v4 when the file
    /// is missing or blank.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read or written.
    pub fn load_or_create(&self) -> ConfigResult<String> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if !raw.trim().is_empty() => return Ok(raw.trim().to_string()),
            Ok(_) => {}
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => return Err(ConfigError::io("read identity", &self.path, err)),
        }

        let user_id = Uuid::new_v4().to_string();
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|err| ConfigError::io("create identity directory", parent, err))?;
        }
        fs::write(&self.path, format!("{user_id}\n"))
            .map_err(|err| ConfigError::io("write identity", &self.path, err))?;
        info!(path = %self.path.display(), "generated new client identity");
        Ok(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::TempDir;

    #[test]
    fn generates_and_reuses_identity() -> Result<()> {
        let dir = TempDir::new()?;
        let store = IdentityStore::new(dir.path().join("nested").join("identity"));

        let first = store.load_or_create()?;
        assert!(Uuid::parse_str(&first).is_ok());
        assert_eq!(store.load_or_create()?, first);
        Ok(())
    }

    #[test]
    fn existing_identity_is_trimmed() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("identity");
        fs::write(&path, "  clinic-user-1 \n")?;
        assert_eq!(IdentityStore::new(&path).load_or_create()?, "clinic-user-1");
        Ok(())
    }

    #[test]
    fn blank_file_is_treated_as_missing() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("identity");
        fs::write(&path, "\n\n")?;
        let generated = IdentityStore::new(&path).load_or_create()?;
        assert!(Uuid::parse_str(&generated).is_ok());
        assert_eq!(fs::read_to_string(&path)?.trim(), generated);
        Ok(())
    }

    #[test]
    fn unreadable_path_reports_io_error() -> Result<()> {
        let dir = TempDir::new()?;
        let store = IdentityStore::new(dir.path());
        assert!(matches!(
            store.load_or_create(),
            Err(ConfigError::Io { .. })
        ));
        Ok(())
    }
}
