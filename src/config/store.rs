//! Mode store — persistence port for the "use real API" flag.
//!
//! The file store keeps a single JSON object `{ "useRealAPI": bool }`.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Read/write port for the persisted mode flag.
pub trait ModeStore: Send + Sync {
    /// Read the persisted flag. `None` when nothing has been stored yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read or parsed.
    fn load(&self) -> Result<Option<bool>, ConfigError>;

    /// Persist the flag.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn save(&self, use_real_api: bool) -> Result<(), ConfigError>;
}

#[derive(Serialize, Deserialize)]
struct StoredMode {
    #[serde(rename = "useRealAPI")]
    use_real_api: bool,
}

// =============================================================================
// FILE STORE
// =============================================================================

/// JSON file on local disk.
pub struct FileModeStore {
    path: PathBuf,
}

impl FileModeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, err: &std::io::Error) -> ConfigError {
        ConfigError::Io { path: self.path.display().to_string(), message: err.to_string() }
    }
}

impl ModeStore for FileModeStore {
    fn load(&self) -> Result<Option<bool>, ConfigError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(&e)),
        };
        let stored: StoredMode = serde_json::from_str(&raw).map_err(|e| ConfigError::Corrupt(e.to_string()))?;
        Ok(Some(stored.use_real_api))
    }

    fn save(&self, use_real_api: bool) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| self.io_error(&e))?;
            }
        }
        let body = serde_json::to_string(&StoredMode { use_real_api })
            .map_err(|e| ConfigError::Corrupt(e.to_string()))?;
        std::fs::write(&self.path, body).map_err(|e| self.io_error(&e))
    }
}

// =============================================================================
// MEMORY STORE
// =============================================================================

/// In-process store. Used by tests and when no mode file is wanted.
#[derive(Default)]
pub struct MemoryModeStore {
    value: Mutex<Option<bool>>,
    writes: Mutex<usize>,
}

impl MemoryModeStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a flag, as if written by an earlier session.
    #[must_use]
    pub fn seeded(use_real_api: bool) -> Self {
        Self { value: Mutex::new(Some(use_real_api)), writes: Mutex::new(0) }
    }

    /// Number of `save` calls so far.
    #[must_use]
    pub fn writes(&self) -> usize {
        *self.writes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ModeStore for MemoryModeStore {
    fn load(&self) -> Result<Option<bool>, ConfigError> {
        Ok(*self.value.lock().unwrap_or_else(PoisonError::into_inner))
    }

    fn save(&self, use_real_api: bool) -> Result<(), ConfigError> {
        *self.value.lock().unwrap_or_else(PoisonError::into_inner) = Some(use_real_api);
        *self.writes.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
