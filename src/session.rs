use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::warn;

/// Token/username pair remembered between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredCredentials {
    pub token: String,
    pub username: String,
}

/// Session file on disk. With no path nothing is remembered.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    path: Option<PathBuf>,
}

impl SessionStore {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    pub fn load(&self) -> Option<StoredCredentials> {
        let path = self.path.as_ref()?;
        if !path.is_file() {
            return None;
        }
        let contents = match fs::read_to_string(path) {
            Ok(c) => c,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "failed to read session file");
                return None;
            }
        };
        match serde_json::from_str::<StoredCredentials>(&contents) {
            Ok(creds) => Some(creds),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "ignoring malformed session file");
                None
            }
        }
    }

    pub fn save(&self, creds: &StoredCredentials) -> Result<()> {
        if let Some(path) = &self.path {
            // Ensure parent directory exists
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let json = serde_json::to_string_pretty(creds)?;
            fs::write(path, json)?;
        }
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        if let Some(path) = &self.path {
            if path.is_file() {
                fs::remove_file(path)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds() -> StoredCredentials {
        StoredCredentials {
            token: "tok".into(),
            username: "alice".into(),
        }
    }

    #[test]
    fn save_load_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(Some(dir.path().join("nested").join("session.json")));

        assert_eq!(store.load(), None);
        store.save(&creds()).unwrap();
        assert_eq!(store.load(), Some(creds()));
        store.clear().unwrap();
        assert_eq!(store.load(), None);
        // clearing twice is fine
        store.clear().unwrap();
    }

    #[test]
    fn malformed_file_means_no_remembered_user() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{\"token\": 42}").unwrap();
        assert_eq!(SessionStore::new(Some(path)).load(), None);
    }

    #[test]
    fn pathless_store_remembers_nothing() {
        let store = SessionStore::default();
        store.save(&creds()).unwrap();
        assert_eq!(store.load(), None);
    }
}
