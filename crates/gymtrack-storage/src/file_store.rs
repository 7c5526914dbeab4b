//! File system key-value store

use gymtrack_core::error::{GymError, Result};
use gymtrack_core::session::KeyValueStore;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// File system based key-value store
///
/// Each key maps to `<base_dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileSystemStore {
    /// Directory holding one file per key
    base_dir: PathBuf,
}

impl FileSystemStore {
    /// Create a store rooted at `base_dir`, creating it if needed
    pub fn new(base_dir: impl Into<PathBuf>) -> Result<Self> {
        let store = Self {
            base_dir: base_dir.into(),
        };
        store.ensure_dir()?;
        Ok(store)
    }

    /// Create a store in the platform data directory (~/.gymtrack fallback)
    pub fn default_location() -> Result<Self> {
        Self::new(Self::default_dir())
    }

    /// The platform data directory used by [`FileSystemStore::default_location`]
    pub fn default_dir() -> PathBuf {
        directories::ProjectDirs::from("com", "gymtrack", "gymtrack")
            .map(|dirs| dirs.data_dir().to_path_buf())
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(".gymtrack")
            })
    }

    /// Get base directory
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Stored keys, sorted
    #[cfg(test)]
    fn keys(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.base_dir).map_err(|e| {
            GymError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read data directory: {}", e),
            ))
        })?;

        let mut keys = Vec::new();
        for entry in entries {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    tracing::warn!("Failed to read directory entry: {}", e);
                    continue;
                }
            };

            let path = entry.path();
            // Skip non-json files and temp files
            if !path.extension().map(|e| e == "json").unwrap_or(false) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                if !stem.starts_with('.') {
                    keys.push(stem.to_string());
                }
            }
        }
        keys.sort();
        Ok(keys)
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.base_dir.exists() {
            fs::create_dir_all(&self.base_dir).map_err(|e| {
                GymError::Io(std::io::Error::new(
                    e.kind(),
                    format!("Failed to create data directory: {}", e),
                ))
            })?;
            debug!("Created data directory: {:?}", self.base_dir);
        }
        Ok(())
    }

    /// Get the path for a key
    fn key_path(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.base_dir.join(format!("{}.json", key)))
    }

    /// Get a temporary path for atomic writes
    fn temp_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!(".{}.json.tmp", key))
    }

    /// Write a value atomically (write to temp, then rename)
    fn atomic_write(&self, key: &str, value: &str) -> Result<()> {
        let final_path = self.key_path(key)?;
        let temp_path = self.temp_path(key);

        let temp_file = fs::File::create(&temp_path).map_err(|e| {
            GymError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to create temp file: {}", e),
            ))
        })?;
        let mut writer = BufWriter::new(temp_file);
        writer.write_all(value.as_bytes())?;
        writer.flush()?;
        drop(writer);

        fs::rename(&temp_path, &final_path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            GymError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to rename temp file: {}", e),
            ))
        })?;

        debug!("Wrote '{}' to {:?}", key, final_path);
        Ok(())
    }
}

/// Keys become file names, so they must be plain names
fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(GymError::Storage(format!("Invalid storage key: {:?}", key)))
    }
}

impl KeyValueStore for FileSystemStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(GymError::Io(e).with_context(format!("Failed to read '{}'", key))),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.atomic_write(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.key_path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!("Removed '{}' from {:?}", key, path);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(GymError::Io(e).with_context(format!("Failed to remove '{}'", key))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gymtrack_core::session::{
        ExerciseSet, SessionCategory, SessionStore, ACTIVE_SESSION_KEY, SESSIONS_KEY,
    };
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn create_test_store() -> (FileSystemStore, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSystemStore::new(temp_dir.path()).unwrap();
        (store, temp_dir)
    }

    #[test]
    fn test_store_creation() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b");
        let store = FileSystemStore::new(&nested).unwrap();
        assert!(store.base_dir().exists());
    }

    #[test]
    fn test_key_path() {
        let (store, temp) = create_test_store();
        let path = store.key_path(SESSIONS_KEY).unwrap();
        assert_eq!(path, temp.path().join("sessions.json"));
    }

    #[test]
    fn test_set_get_remove() {
        let (store, _temp) = create_test_store();

        store.set("sessions", "[]").unwrap();
        assert_eq!(store.get("sessions").unwrap().as_deref(), Some("[]"));

        store.set("sessions", "[1]").unwrap();
        assert_eq!(store.get("sessions").unwrap().as_deref(), Some("[1]"));

        store.remove("sessions").unwrap();
        assert_eq!(store.get("sessions").unwrap(), None);
    }

    #[test]
    fn test_missing_key() {
        let (store, _temp) = create_test_store();
        assert_eq!(store.get(ACTIVE_SESSION_KEY).unwrap(), None);
        assert!(!store.contains(ACTIVE_SESSION_KEY).unwrap());
    }

    #[test]
    fn test_remove_missing_key() {
        let (store, _temp) = create_test_store();
        store.remove(ACTIVE_SESSION_KEY).unwrap();
    }

    #[test]
    fn test_invalid_keys_rejected() {
        let (store, _temp) = create_test_store();
        for key in ["", "../escape", ".hidden", "a/b"] {
            assert!(
                matches!(store.set(key, "x"), Err(GymError::Storage(_))),
                "key {:?} accepted",
                key
            );
        }
    }

    #[test]
    fn test_atomic_write() {
        let (store, _temp) = create_test_store();
        store.set(ACTIVE_SESSION_KEY, r#"{"id":"a"}"#).unwrap();

        assert!(!store.temp_path(ACTIVE_SESSION_KEY).exists());

        let final_path = store.key_path(ACTIVE_SESSION_KEY).unwrap();
        let content = fs::read_to_string(final_path).unwrap();
        assert_eq!(content, r#"{"id":"a"}"#);
    }

    #[test]
    fn test_keys_ignore_temp_and_other_files() {
        let (store, _temp) = create_test_store();
        store.set(SESSIONS_KEY, "[]").unwrap();
        store.set(ACTIVE_SESSION_KEY, "{}").unwrap();
        fs::write(store.base_dir().join(".sessions.json.tmp"), "[").unwrap();
        fs::write(store.base_dir().join("readme.txt"), "test").unwrap();

        assert_eq!(store.keys().unwrap(), vec!["active-session", "sessions"]);
    }

    #[test]
    fn test_reopen_sees_prior_data() {
        let (store, temp) = create_test_store();
        store.set(SESSIONS_KEY, "[]").unwrap();

        let reopened = FileSystemStore::new(temp.path()).unwrap();
        assert_eq!(reopened.get(SESSIONS_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_session_store_round_trip() {
        let temp = TempDir::new().unwrap();

        let finished = {
            let mut sessions = SessionStore::open(FileSystemStore::new(temp.path()).unwrap());
            sessions.start(Some(SessionCategory::Legs));
            let squat = sessions.add_exercise("Squat").unwrap();
            sessions.add_set(&squat, ExerciseSet::strength(5, 100.0));
            sessions.finish().unwrap()
        };

        let mut reopened = SessionStore::open(FileSystemStore::new(temp.path()).unwrap());
        assert_eq!(reopened.sessions(), &[finished]);
        assert!(reopened.active_session().is_none());
        assert!(!temp.path().join("active-session.json").exists());

        reopened.start(None);
        let again = SessionStore::open(FileSystemStore::new(temp.path()).unwrap());
        assert!(again.active_session().is_some());
    }
}
