use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, warn};

use crate::model::{StoredWidget, WidgetInstance};

/// Failures at the persistence boundary. Both variants are recovered where
/// they arise; neither ever reaches a caller of [`LayoutStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("layout storage I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("stored layout is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Durable, scoped persistence for the widget collection. Injected into the
/// manager so tests can substitute an in-memory implementation and assert
/// exact persisted shapes.
pub trait LayoutStore {
    /// Missing or corrupt data resolves to an empty list, never an error.
    fn load(&self) -> Vec<StoredWidget>;

    /// Best-effort full-collection write. Failures are logged here and
    /// swallowed; in-memory state stays authoritative either way.
    fn save(&self, widgets: &[WidgetInstance]);

    /// Erases the persisted record.
    fn clear(&self);
}

/// JSON document on disk, one file per user scope.
pub struct FileLayoutStore {
    path: PathBuf,
}

impl FileLayoutStore {
    pub fn new(path: PathBuf) -> Self { Self { path } }

    /// `<data_dir>/leaddock/layout.json`, falling back to the temp dir when
    /// the platform reports no data directory.
    pub fn default_path() -> PathBuf {
        dirs::data_dir().unwrap_or_else(std::env::temp_dir).join("leaddock/layout.json")
    }

    pub fn path(&self) -> &std::path::Path { &self.path }

    fn try_load(&self) -> Result<Vec<StoredWidget>, StoreError> {
        let body = match fs::read_to_string(&self.path) {
            Ok(body) => body,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_str(&body)?)
    }

    fn try_save(&self, widgets: &[WidgetInstance]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_vec(widgets)?)?;
        Ok(())
    }
}

impl LayoutStore for FileLayoutStore {
    fn load(&self) -> Vec<StoredWidget> {
        match self.try_load() {
            Ok(records) => records,
            Err(err) => {
                warn!(path = %self.path.display(), %err, "failed to read stored layout, starting empty");
                Vec::new()
            }
        }
    }

    fn save(&self, widgets: &[WidgetInstance]) {
        if let Err(err) = self.try_save(widgets) {
            warn!(path = %self.path.display(), %err, "failed to persist widget layout");
        }
    }

    fn clear(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => debug!(path = %self.path.display(), "erased stored layout"),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => warn!(path = %self.path.display(), %err, "failed to erase stored layout"),
        }
    }
}

/// Shared in-memory store. Clones observe the same slot, so a test can hold
/// one handle, hand a clone to the manager, and inspect what got persisted.
#[derive(Clone, Default)]
pub struct MemoryLayoutStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryLayoutStore {
    pub fn new() -> Self { Self::default() }

    /// Replaces the raw persisted document, valid JSON or not.
    pub fn seed(&self, raw: &str) {
        *self.slot.lock() = Some(raw.to_string());
    }

    pub fn contents(&self) -> Option<String> {
        self.slot.lock().clone()
    }
}

impl LayoutStore for MemoryLayoutStore {
    fn load(&self) -> Vec<StoredWidget> {
        let Some(body) = self.slot.lock().clone() else {
            return Vec::new();
        };
        match serde_json::from_str(&body) {
            Ok(records) => records,
            Err(err) => {
                warn!(%err, "stored layout is corrupt, starting empty");
                Vec::new()
            }
        }
    }

    fn save(&self, widgets: &[WidgetInstance]) {
        match serde_json::to_string(widgets) {
            Ok(body) => *self.slot.lock() = Some(body),
            Err(err) => warn!(%err, "failed to serialize widget layout"),
        }
    }

    fn clear(&self) {
        *self.slot.lock() = None;
    }
}
