// Persisted key-value settings (onboarding flag and target language)

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

use crate::core::errors::{SettingsError, SettingsResult};

pub const TARGET_LANGUAGE_KEY: &str = "ocr_target_language";
pub const ONBOARDING_KEY: &str = "onboarding_complete";

/// String key-value store that survives restarts.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn get(&self, key: &str) -> SettingsResult<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> SettingsResult<()>;
}

/// Settings kept as a flat JSON object in a single file.
///
/// Every operation goes to disk so separate processes see each other's writes.
pub struct FileSettingsStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> SettingsResult<BTreeMap<String, String>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(BTreeMap::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(source) => Err(SettingsError::LoadFailed {
                path: self.path.display().to_string(),
                source,
            }),
        }
    }

    async fn save(&self, values: &BTreeMap<String, String>) -> SettingsResult<()> {
        let save_err = |source| SettingsError::SaveFailed {
            path: self.path.display().to_string(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await.map_err(save_err)?;
            }
        }

        let json = serde_json::to_vec_pretty(values)?;
        // Write then rename so a crash never leaves a truncated file
        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, json).await.map_err(save_err)?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(save_err)?;
        Ok(())
    }
}

#[async_trait]
impl SettingsStore for FileSettingsStore {
    async fn get(&self, key: &str) -> SettingsResult<Option<String>> {
        Ok(self.load().await?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> SettingsResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut values = self.load().await?;
        values.insert(key.to_string(), value.to_string());
        self.save(&values).await?;
        debug!("Saved setting {} to {}", key, self.path.display());
        Ok(())
    }
}

/// In-process store, used by tests and embedders without a filesystem.
#[derive(Default)]
pub struct MemorySettingsStore {
    values: RwLock<BTreeMap<String, String>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SettingsStore for MemorySettingsStore {
    async fn get(&self, key: &str) -> SettingsResult<Option<String>> {
        Ok(self.values.read().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> SettingsResult<()> {
        self.values.write().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Typed access to the two persisted flags.
#[derive(Clone)]
pub struct Settings {
    store: Arc<dyn SettingsStore>,
}

impl Settings {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self { store }
    }

    /// Stored target language; empty values count as unset.
    pub async fn target_language(&self) -> SettingsResult<Option<String>> {
        Ok(self
            .store
            .get(TARGET_LANGUAGE_KEY)
            .await?
            .filter(|lang| !lang.trim().is_empty()))
    }

    pub async fn set_target_language(&self, language: &str) -> SettingsResult<()> {
        self.store.set(TARGET_LANGUAGE_KEY, language).await
    }

    /// Any non-empty stored value counts as complete.
    pub async fn onboarding_complete(&self) -> SettingsResult<bool> {
        Ok(self
            .store
            .get(ONBOARDING_KEY)
            .await?
            .is_some_and(|v| !v.is_empty()))
    }

    pub async fn mark_onboarding_complete(&self) -> SettingsResult<()> {
        self.store.set(ONBOARDING_KEY, "true").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_store_round_trip_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        let store = FileSettingsStore::new(&path);
        assert_eq!(store.get(TARGET_LANGUAGE_KEY).await.unwrap(), None);

        store.set(TARGET_LANGUAGE_KEY, "Türkçe").await.unwrap();
        store.set(ONBOARDING_KEY, "true").await.unwrap();

        let reopened = FileSettingsStore::new(&path);
        assert_eq!(
            reopened.get(TARGET_LANGUAGE_KEY).await.unwrap().as_deref(),
            Some("Türkçe")
        );
        assert_eq!(
            reopened.get(ONBOARDING_KEY).await.unwrap().as_deref(),
            Some("true")
        );
    }

    #[tokio::test]
    async fn test_file_store_rejects_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, b"{not json").unwrap();

        let store = FileSettingsStore::new(&path);
        let result = store.get(TARGET_LANGUAGE_KEY).await;
        assert!(matches!(result, Err(SettingsError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_settings_treat_empty_values_as_unset() {
        let store = Arc::new(MemorySettingsStore::new());
        let settings = Settings::new(store.clone());

        assert!(!settings.onboarding_complete().await.unwrap());
        assert_eq!(settings.target_language().await.unwrap(), None);

        store.set(TARGET_LANGUAGE_KEY, "  ").await.unwrap();
        assert_eq!(settings.target_language().await.unwrap(), None);

        settings.set_target_language("English").await.unwrap();
        settings.mark_onboarding_complete().await.unwrap();
        assert_eq!(
            settings.target_language().await.unwrap().as_deref(),
            Some("English")
        );
        assert!(settings.onboarding_complete().await.unwrap());
    }
}
