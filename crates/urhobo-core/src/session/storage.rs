//! Session-scoped key/value storage.
//!
//! Stores string values in `<base>/session.json` with restricted permissions
//! (0600). Tokens are never logged.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::paths;

pub const ACCESS_TOKEN_KEY: &str = "accessToken";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
pub const USER_KEY: &str = "user";
/// Email awaiting sign-up verification. Not part of the session unit.
pub const PENDING_EMAIL_KEY: &str = "email";

/// The three keys that are written and cleared together.
pub const SESSION_KEYS: [&str; 3] = [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY];

/// Persisted session scope.
#[derive(Debug, Default)]
pub struct SessionStorage {
    /// `None` keeps everything in memory.
    path: Option<PathBuf>,
    entries: BTreeMap<String, String>,
}

impl SessionStorage {
    /// Opens the storage at the default session path.
    ///
    /// # Errors
    /// Returns an error if an existing file cannot be read.
    pub fn open_default() -> Result<Self> {
        Self::open(&paths::session_path())
    }

    /// Opens the storage at `path`. A missing file is an empty scope.
    ///
    /// An unparseable file is treated as empty; it will be overwritten on the
    /// next write.
    ///
    /// # Errors
    /// Returns an error if an existing file cannot be read.
    pub fn open(path: &Path) -> Result<Self> {
        let entries = if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read session from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|e| {
                tracing::debug!(path = %path.display(), error = %e, "discarding unreadable session file");
                BTreeMap::new()
            })
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path: Some(path.to_path_buf()),
            entries,
        })
    }

    /// Storage that never touches disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// # Errors
    /// Returns an error if the scope cannot be written.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.save()
    }

    /// # Errors
    /// Returns an error if the scope cannot be written.
    pub fn remove(&mut self, key: &str) -> Result<()> {
        if self.entries.remove(key).is_some() {
            self.save()?;
        }
        Ok(())
    }

    /// Removes the access token, refresh token and user as one unit.
    ///
    /// # Errors
    /// Returns an error if the scope cannot be written.
    pub fn clear_session(&mut self) -> Result<()> {
        let mut changed = false;
        for key in SESSION_KEYS {
            changed |= self.entries.remove(key).is_some();
        }
        if changed {
            self.save()?;
        }
        Ok(())
    }

    /// True when none of the three session keys is present.
    pub fn session_is_empty(&self) -> bool {
        SESSION_KEYS.iter().all(|key| !self.entries.contains_key(*key))
    }

    fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let contents =
            serde_json::to_string_pretty(&self.entries).context("Failed to serialize session")?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(path)
                .with_context(|| format!("Failed to open {} for writing", path.display()))?;
            file.write_all(contents.as_bytes())
                .with_context(|| format!("Failed to write to {}", path.display()))?;
            // `mode` only applies on create; tighten files that predate us.
            fs::set_permissions(path, fs::Permissions::from_mode(0o600))
                .with_context(|| format!("Failed to set permissions on {}", path.display()))?;
        }

        #[cfg(not(unix))]
        {
            fs::write(path, contents)
                .with_context(|| format!("Failed to write to {}", path.display()))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_values_survive_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut storage = SessionStorage::open(&path).unwrap();
        storage.set(ACCESS_TOKEN_KEY, "tok").unwrap();
        storage.set(PENDING_EMAIL_KEY, "a@b.com").unwrap();

        let reopened = SessionStorage::open(&path).unwrap();
        assert_eq!(reopened.get(ACCESS_TOKEN_KEY), Some("tok"));
        assert_eq!(reopened.get(PENDING_EMAIL_KEY), Some("a@b.com"));
    }

    #[test]
    fn test_clear_session_keeps_pending_email() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");

        let mut storage = SessionStorage::open(&path).unwrap();
        storage.set(ACCESS_TOKEN_KEY, "tok").unwrap();
        storage.set(REFRESH_TOKEN_KEY, "ref").unwrap();
        storage.set(USER_KEY, "{}").unwrap();
        storage.set(PENDING_EMAIL_KEY, "a@b.com").unwrap();

        storage.clear_session().unwrap();
        assert!(storage.session_is_empty());

        let reopened = SessionStorage::open(&path).unwrap();
        assert!(reopened.session_is_empty());
        assert_eq!(reopened.get(PENDING_EMAIL_KEY), Some("a@b.com"));
    }

    #[test]
    fn test_corrupt_file_opens_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{not json").unwrap();

        let storage = SessionStorage::open(&path).unwrap();
        assert!(storage.session_is_empty());
    }

    #[test]
    fn test_in_memory_never_writes() {
        let mut storage = SessionStorage::in_memory();
        storage.set(USER_KEY, "{}").unwrap();
        assert_eq!(storage.get(USER_KEY), Some("{}"));
        storage.remove(USER_KEY).unwrap();
        assert_eq!(storage.get(USER_KEY), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        let mut storage = SessionStorage::open(&path).unwrap();
        storage.set(ACCESS_TOKEN_KEY, "tok").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn test_existing_wide_file_is_tightened() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{}").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        let mut storage = SessionStorage::open(&path).unwrap();
        storage.set(ACCESS_TOKEN_KEY, "tok").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
