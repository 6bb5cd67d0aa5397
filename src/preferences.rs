//! Background preference persistence
//!
//! Two flat string keys in the local key-value store; absence means first run.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use crate::config::preferences::{BACKGROUND_NAME_KEY, BACKGROUND_URL_KEY};
use crate::{log_debug, log_info};

const MODULE: &str = "preferences";

/// The user's chosen background image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundPreference {
    pub image_url: String,
    pub display_name: String,
}

/// Local persistent string store
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// Write every pair, then persist once before returning
    fn set_many(&self, entries: &[(&str, &str)]) -> Result<(), String>;

    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        self.set_many(&[(key, value)])
    }
}

/// Process-lifetime store, used when no persistent store is available
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set_many(&self, entries: &[(&str, &str)]) -> Result<(), String> {
        let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        for (key, value) in entries {
            values.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }
}

pub struct PreferenceStore {
    store: Arc<dyn KeyValueStore>,
}

impl PreferenceStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn save(&self, preference: &BackgroundPreference) -> Result<(), String> {
        log_info!(MODULE, "Saving background: {}", preference.display_name);
        self.store.set_many(&[
            (BACKGROUND_URL_KEY, &preference.image_url),
            (BACKGROUND_NAME_KEY, &preference.display_name),
        ])
    }

    /// Read the saved background; the name defaults to the image file name
    pub fn load(&self) -> Option<BackgroundPreference> {
        let image_url = self.store.get(BACKGROUND_URL_KEY).filter(|u| !u.is_empty())?;
        let display_name = self
            .store
            .get(BACKGROUND_NAME_KEY)
            .unwrap_or_else(|| file_name(&image_url).to_string());

        log_debug!(MODULE, "Restored background: {}", display_name);
        Some(BackgroundPreference {
            image_url,
            display_name,
        })
    }
}

fn file_name(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/').next().unwrap_or(path)
}

#[cfg(feature = "desktop")]
pub use desktop::PluginStore;

#[cfg(feature = "desktop")]
mod desktop {
    use tauri::AppHandle;
    use tauri_plugin_store::StoreExt;

    use super::KeyValueStore;
    use crate::config;

    /// [`KeyValueStore`] backed by the store plugin's settings file
    pub struct PluginStore {
        app: AppHandle,
    }

    impl PluginStore {
        pub fn new(app: AppHandle) -> Self {
            Self { app }
        }
    }

    impl KeyValueStore for PluginStore {
        fn get(&self, key: &str) -> Option<String> {
            let store = self.app.store(config::preferences::STORE_FILE).ok()?;
            store.get(key).and_then(|v| v.as_str().map(|s| s.to_string()))
        }

        fn set_many(&self, entries: &[(&str, &str)]) -> Result<(), String> {
            let store = self
                .app
                .store(config::preferences::STORE_FILE)
                .map_err(|e| format!("Failed to access store: {}", e))?;
            for (key, value) in entries {
                store.set(*key, *value);
            }
            store
                .save()
                .map_err(|e| format!("Failed to save store: {}", e))
        }
    }
}
