//! Durable session storage: the auth token and the cached user profile.
//!
//! Both live in a single JSON file under the platform config directory, so
//! `clear()` can drop them together with no observable in-between state.
//! Reads go to disk every time; the store itself keeps nothing in memory,
//! which is what makes it safely shareable across every handle in the
//! process.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::error::ClientError;
use crate::types::UserProfile;

const SESSION_FILE_NAME: &str = "session.json";

#[derive(Debug, Default, Serialize, Deserialize)]
struct SessionFile {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    user: Option<UserProfile>,
}

/// Handle to the on-disk session. Cheap to clone; all clones observe the
/// same file.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store under the platform config directory (created if missing).
    pub fn open_default() -> Result<Self, ClientError> {
        let proj_dirs = directories::ProjectDirs::from("com", "remiaq", "remiaq")
            .ok_or_else(|| ClientError::Store("could not determine config directory".into()))?;
        let dir = proj_dirs.config_dir();
        fs::create_dir_all(dir)
            .map_err(|e| ClientError::Store(format!("mkdir {}: {e}", dir.display())))?;
        Ok(Self {
            path: dir.join(SESSION_FILE_NAME),
        })
    }

    /// Store backed by an explicit file path. Used by tests.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn token(&self) -> Option<String> {
        self.read().token
    }

    pub fn set_token(&self, token: &str) -> Result<(), ClientError> {
        let mut file = self.read();
        file.token = Some(token.to_string());
        self.write(&file)
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.read().user
    }

    pub fn set_user(&self, user: &UserProfile) -> Result<(), ClientError> {
        let mut file = self.read();
        file.user = Some(user.clone());
        self.write(&file)
    }

    /// Drop token and profile together.
    pub fn clear(&self) -> Result<(), ClientError> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .map_err(|e| ClientError::Store(format!("remove {}: {e}", self.path.display())))?;
        }
        Ok(())
    }

    fn read(&self) -> SessionFile {
        let Ok(content) = fs::read_to_string(&self.path) else {
            return SessionFile::default();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    fn write(&self, file: &SessionFile) -> Result<(), ClientError> {
        let content = serde_json::to_string_pretty(file)
            .map_err(|e| ClientError::Store(format!("serialize session: {e}")))?;
        fs::write(&self.path, content)
            .map_err(|e| ClientError::Store(format!("write {}: {e}", self.path.display())))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Err(e) = fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600)) {
                tracing::warn!("failed to chmod 0600 {}: {e}", self.path.display());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn test_store() -> (tempfile::TempDir, SessionStore) {
        let tmp = tempfile::TempDir::new().expect("tmp dir");
        let store = SessionStore::with_path(tmp.path().join("session.json"));
        (tmp, store)
    }

    fn profile() -> UserProfile {
        UserProfile {
            id: "u1".into(),
            email: "a@b.com".into(),
            created: String::new(),
            updated: String::new(),
        }
    }

    #[test]
    fn empty_store_holds_nothing() {
        let (_tmp, store) = test_store();
        assert_eq!(store.token(), None);
        assert_eq!(store.user(), None);
    }

    #[test]
    fn token_and_user_survive_independent_writes() {
        let (_tmp, store) = test_store();
        store.set_token("T").unwrap();
        store.set_user(&profile()).unwrap();
        assert_eq!(store.token().as_deref(), Some("T"));
        assert_eq!(store.user().map(|u| u.id), Some("u1".to_string()));

        // A second handle on the same path sees the same session.
        let other = SessionStore::with_path(store.path.clone());
        assert_eq!(other.token().as_deref(), Some("T"));
    }

    #[test]
    fn clear_removes_both_keys() {
        let (_tmp, store) = test_store();
        store.set_token("T").unwrap();
        store.set_user(&profile()).unwrap();
        store.clear().unwrap();
        assert_eq!(store.token(), None);
        assert_eq!(store.user(), None);
        // Clearing an already-empty store is fine.
        store.clear().unwrap();
    }

    #[test]
    fn corrupt_file_reads_as_empty() {
        let (_tmp, store) = test_store();
        fs::write(&store.path, "not json").unwrap();
        assert_eq!(store.token(), None);
        store.set_token("T").unwrap();
        assert_eq!(store.token().as_deref(), Some("T"));
    }

    #[cfg(unix)]
    #[test]
    fn session_file_is_private() {
        use std::os::unix::fs::PermissionsExt;
        let (_tmp, store) = test_store();
        store.set_token("T").unwrap();
        let mode = fs::metadata(&store.path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o600);
    }
}
