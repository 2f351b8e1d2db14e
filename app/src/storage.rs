use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

pub const STATS_KEY: &str = "stats";
pub const HISTORY_KEY: &str = "history";
pub const SETTINGS_KEY: &str = "settings";

#[derive(Debug)]
pub enum StorageError {
    Io(std::io::Error),
    Serde(serde_json::Error),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Io(e) => write!(f, "IO error: {}", e),
            StorageError::Serde(e) => write!(f, "Serialization error: {}", e),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::Io(e)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Serde(e)
    }
}

/// String-keyed async store backing statistics, match history and settings.
/// Values are JSON blobs; a missing key reads back as `None`.
#[allow(async_fn_in_trait)]
pub trait KeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    async fn set(&self, key: &str, value: String) -> Result<(), StorageError>;
    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

impl<S: KeyValueStore> KeyValueStore for &S {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        (**self).set(key, value).await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key).await
    }
}

/// One `<key>.json` file per key under a fixed directory.
pub struct FileStore {
    directory: PathBuf,
}

impl FileStore {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.directory.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match tokio::fs::read_to_string(self.path_for(key)).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.directory).await?;
        tokio::fs::write(self.path_for(key), value).await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        match tokio::fs::remove_file(self.path_for(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        store
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.entries.lock().unwrap().insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert!(store.get("missing").await.unwrap().is_none());

        store.set("stats", "{}".to_string()).await.unwrap();
        assert_eq!(store.get("stats").await.unwrap().as_deref(), Some("{}"));

        store.remove("stats").await.unwrap();
        assert!(store.get("stats").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_file_store_roundtrip() {
        let directory = std::env::temp_dir().join(format!("kv_store_test_{}", std::process::id()));
        let store = FileStore::new(&directory);

        assert!(store.get("settings").await.unwrap().is_none());

        store
            .set("settings", "{\"theme\":\"dark\"}".to_string())
            .await
            .unwrap();
        assert_eq!(
            store.get("settings").await.unwrap().as_deref(),
            Some("{\"theme\":\"dark\"}")
        );

        store.remove("settings").await.unwrap();
        assert!(store.get("settings").await.unwrap().is_none());
        // Removing a missing key is not an error.
        store.remove("settings").await.unwrap();

        let _ = tokio::fs::remove_dir_all(&directory).await;
    }
}
