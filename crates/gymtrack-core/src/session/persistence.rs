//! Key-value storage trait and abstractions

use crate::error::Result;

/// Key holding the JSON array of completed sessions
pub const SESSIONS_KEY: &str = "sessions";

/// Key holding the JSON object of the in-progress session
pub const ACTIVE_SESSION_KEY: &str = "active-session";

/// Synchronous string key-value store backing the session store
pub trait KeyValueStore: Send + Sync {
    /// Read a value; `None` when the key is absent
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a key; removing an absent key is not an error
    fn remove(&self, key: &str) -> Result<()>;

    /// Check if a key exists
    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// In-memory store
pub mod memory {
    use super::*;
    use crate::error::GymError;
    use std::collections::HashMap;
    use std::sync::RwLock;

    /// In-memory key-value store, used in tests and for ephemeral sessions
    #[derive(Debug, Default)]
    pub struct MemoryStore {
        entries: RwLock<HashMap<String, String>>,
    }

    impl MemoryStore {
        /// Create an empty in-memory store
        pub fn new() -> Self {
            Self::default()
        }

        /// Number of stored keys
        pub fn len(&self) -> usize {
            self.entries.read().map(|e| e.len()).unwrap_or(0)
        }

        /// True when no keys are stored
        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }
    }

    fn poisoned() -> GymError {
        GymError::Storage("memory store lock poisoned".to_string())
    }

    impl KeyValueStore for MemoryStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            let entries = self.entries.read().map_err(|_| poisoned())?;
            Ok(entries.get(key).cloned())
        }

        fn set(&self, key: &str, value: &str) -> Result<()> {
            let mut entries = self.entries.write().map_err(|_| poisoned())?;
            entries.insert(key.to_string(), value.to_string());
            Ok(())
        }

        fn remove(&self, key: &str) -> Result<()> {
            let mut entries = self.entries.write().map_err(|_| poisoned())?;
            entries.remove(key);
            Ok(())
        }
    }

}
