use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::prefs::{error::PrefsError, prefs_model::UserConfig};

/// Key under which preferences are persisted and announced.
pub const USER_CONFIG_KEY: &str = "user-accessibility-config";

const CHANGE_CHANNEL_CAPACITY: usize = 16;

/// Notification that the value stored under `key` changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreferenceChange {
    pub key: String,
}

/// Durable storage for accessibility preferences.
pub trait PreferenceStore: Send + Sync {
    /// `Ok(None)` when nothing has been stored yet.
    fn read(&self) -> Result<Option<UserConfig>, PrefsError>;

    fn write(&self, config: &UserConfig) -> Result<(), PrefsError>;

    fn remove(&self) -> Result<(), PrefsError>;

    fn subscribe(&self) -> broadcast::Receiver<PreferenceChange>;
}

fn announce(sender: &broadcast::Sender<PreferenceChange>) {
    // No receivers is fine
    let _ = sender.send(PreferenceChange {
        key: USER_CONFIG_KEY.to_string(),
    });
}

/// Read preferences, treating unreadable or corrupt content as absent.
pub fn load_preferences(store: &dyn PreferenceStore) -> Option<UserConfig> {
    match store.read() {
        Ok(config) => config,
        Err(e) => {
            warn!(error = %e, "could not load accessibility preferences");
            None
        }
    }
}

/// Merge `patch` over the stored preferences and persist the result.
pub fn update_preferences(
    store: &dyn PreferenceStore,
    patch: &UserConfig,
) -> Result<UserConfig, PrefsError> {
    let mut config = load_preferences(store).unwrap_or_default();
    config.merge(patch);
    store.write(&config)?;
    Ok(config)
}

// ============================================================================
// File store
// ============================================================================

pub struct FilePreferenceStore {
    path: PathBuf,
    changes: broadcast::Sender<PreferenceChange>,
}

impl FilePreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            path: path.into(),
            changes,
        }
    }

    /// `<config dir>/page-actions/preferences.json`, falling back to the
    /// current directory when the platform has no config dir.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join("page-actions"))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("preferences.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> PrefsError {
        PrefsError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn read(&self) -> Result<Option<UserConfig>, PrefsError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };

        if content.trim().is_empty() {
            return Ok(None);
        }

        let config = serde_json::from_str(&content)?;
        Ok(Some(config))
    }

    fn write(&self, config: &UserConfig) -> Result<(), PrefsError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }

        let json = serde_json::to_string_pretty(config)?;
        std::fs::write(&self.path, json).map_err(|e| self.io_error(e))?;

        debug!(path = %self.path.display(), "saved accessibility preferences");
        announce(&self.changes);
        Ok(())
    }

    fn remove(&self) -> Result<(), PrefsError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(self.io_error(e)),
        }
        announce(&self.changes);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<PreferenceChange> {
        self.changes.subscribe()
    }
}

// ============================================================================
// In-memory store
// ============================================================================

/// Keeps the serialized preferences in memory, the way a client-side
/// key/value store would.
pub struct MemoryPreferenceStore {
    raw: Mutex<Option<String>>,
    changes: broadcast::Sender<PreferenceChange>,
}

impl Default for MemoryPreferenceStore {
    fn default() -> Self {
        Self::with_raw(None)
    }
}

impl MemoryPreferenceStore {
    pub fn with_raw(raw: Option<&str>) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            raw: Mutex::new(raw.map(str::to_string)),
            changes,
        }
    }

    /// Replace the stored value as another writer would, and announce it.
    pub fn set_raw(&self, raw: Option<&str>) {
        *self.raw.lock() = raw.map(str::to_string);
        announce(&self.changes);
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn read(&self) -> Result<Option<UserConfig>, PrefsError> {
        match self.raw.lock().as_deref() {
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
            None => Ok(None),
        }
    }

    fn write(&self, config: &UserConfig) -> Result<(), PrefsError> {
        let json = serde_json::to_string(config)?;
        *self.raw.lock() = Some(json);
        announce(&self.changes);
        Ok(())
    }

    fn remove(&self) -> Result<(), PrefsError> {
        *self.raw.lock() = None;
        announce(&self.changes);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<PreferenceChange> {
        self.changes.subscribe()
    }
}

// ============================================================================
// Handle
// ============================================================================

/// A view's live copy of the preferences, reloaded whenever the store
/// announces a change.
pub struct PreferenceHandle {
    store: Arc<dyn PreferenceStore>,
    config: Option<UserConfig>,
    changes: broadcast::Receiver<PreferenceChange>,
}

impl PreferenceHandle {
    pub fn new(store: Arc<dyn PreferenceStore>) -> Self {
        let changes = store.subscribe();
        let config = load_preferences(store.as_ref());
        Self {
            store,
            config,
            changes,
        }
    }

    pub fn config(&self) -> Option<&UserConfig> {
        self.config.as_ref()
    }

    pub fn reload(&mut self) -> Option<&UserConfig> {
        self.config = load_preferences(self.store.as_ref());
        self.config.as_ref()
    }

    /// Merge and persist `patch`. On a storage failure the error is logged
    /// and the current preferences are returned unchanged.
    pub fn update(&mut self, patch: &UserConfig) -> UserConfig {
        match update_preferences(self.store.as_ref(), patch) {
            Ok(config) => {
                self.config = Some(config.clone());
                config
            }
            Err(e) => {
                warn!(error = %e, "could not update accessibility preferences");
                self.config.clone().unwrap_or_default()
            }
        }
    }

    /// Store an empty preference object.
    pub fn reset(&mut self) {
        let empty = UserConfig::default();
        match self.store.write(&empty) {
            Ok(()) => self.config = Some(empty),
            Err(e) => warn!(error = %e, "could not reset accessibility preferences"),
        }
    }

    /// Wait for the next change to the preference key and reload.
    ///
    /// Returns `false` once the store is gone.
    pub async fn changed(&mut self) -> bool {
        loop {
            match self.changes.recv().await {
                Ok(change) if change.key == USER_CONFIG_KEY => {
                    self.reload();
                    return true;
                }
                Ok(_) => continue,
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!(skipped, "missed preference notifications, reloading");
                    self.reload();
                    return true;
                }
                Err(broadcast::error::RecvError::Closed) => return false,
            }
        }
    }
}
