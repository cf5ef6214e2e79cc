//! Developer API toggle — switch suggestions between the simulator and the
//! real provider.
//!
//! DESIGN
//! ======
//! Two controls over one `ApiSettings`: a compact switch and a settings panel
//! that can also take an API key. Both are development-only; in production
//! they are hidden and every action fails with `ToggleError::Hidden`.
//!
//! Turning real mode on without a key is refused. Turning it off is always
//! allowed. The panel simulates a short save: while it runs the panel is
//! disabled and a second action fails with `ToggleError::Busy`.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use serde::Serialize;
use tracing::{info, warn};

use crate::config::{ApiSettings, ConfigError};
use crate::error::ErrorCode;

/// Simulated save latency of the settings panel.
pub const SAVE_DELAY: Duration = Duration::from_millis(500);

pub const PANEL_TITLE: &str = "Developer Settings";
pub const PANEL_DESCRIPTION: &str = "Configure API settings (development only)";

// =============================================================================
// DEV MODE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DevMode {
    Development,
    Production,
}

impl DevMode {
    /// Development when `APP_ENV=development` or the server binds a loopback
    /// host.
    #[must_use]
    pub fn detect(app_env: Option<&str>, host: &str) -> Self {
        let dev_env = app_env.is_some_and(|env| env.trim().eq_ignore_ascii_case("development"));
        let local = matches!(host.trim(), "localhost" | "127.0.0.1" | "::1" | "[::1]");
        if dev_env || local { Self::Development } else { Self::Production }
    }

    #[must_use]
    pub fn is_development(self) -> bool {
        matches!(self, Self::Development)
    }
}

// =============================================================================
// ERROR
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ToggleError {
    #[error("API key not configured. Please add a valid API key to use real API calls.")]
    MissingApiKey,

    #[error("a save is already in progress")]
    Busy,

    #[error("developer settings are only available in development")]
    Hidden,

    #[error(transparent)]
    Store(#[from] ConfigError),
}

impl ErrorCode for ToggleError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingApiKey => "E_MISSING_API_KEY",
            Self::Busy => "E_SAVE_IN_PROGRESS",
            Self::Hidden => "E_DEV_ONLY",
            Self::Store(e) => e.error_code(),
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::Busy => true,
            Self::Store(e) => e.retryable(),
            _ => false,
        }
    }
}

/// Real mode cannot be entered without a key; leaving it is always allowed.
fn locked_out(settings: &ApiSettings) -> bool {
    !settings.is_configured() && !settings.mode().is_real()
}

// =============================================================================
// SWITCH
// =============================================================================

/// Compact on/off switch.
#[derive(Clone)]
pub struct ApiToggleSwitch {
    settings: ApiSettings,
    dev: DevMode,
}

impl ApiToggleSwitch {
    pub fn new(settings: ApiSettings, dev: DevMode) -> Self {
        Self { settings, dev }
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.dev.is_development()
    }

    #[must_use]
    pub fn is_on(&self) -> bool {
        self.settings.mode().is_real()
    }

    #[must_use]
    pub fn is_disabled(&self) -> bool {
        locked_out(&self.settings)
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        if self.is_on() { "API Mode: Real API" } else { "API Mode: Simulation" }
    }

    /// Flip the mode. Returns the new "use real API" flag.
    ///
    /// # Errors
    ///
    /// Returns an error when hidden, when enabling without a key, or when the
    /// flag cannot be persisted.
    pub fn toggle(&self) -> Result<bool, ToggleError> {
        if !self.is_visible() {
            return Err(ToggleError::Hidden);
        }
        if self.is_disabled() {
            warn!("toggle: real API requested without a key");
            return Err(ToggleError::MissingApiKey);
        }
        Ok(self.settings.toggle_real_api()?)
    }
}

// =============================================================================
// SETTINGS PANEL
// =============================================================================

/// Snapshot of the panel for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelState {
    pub title: &'static str,
    pub description: &'static str,
    pub use_real_api: bool,
    pub configured: bool,
    pub is_saving: bool,
    pub is_disabled: bool,
    pub status: &'static str,
}

/// Full settings panel: mode switch plus API key entry.
#[derive(Clone)]
pub struct DeveloperSettingsPanel {
    settings: ApiSettings,
    dev: DevMode,
    saving: Arc<AtomicBool>,
    save_delay: Duration,
}

/// Clears the saving flag when the save finishes or is cancelled.
struct SavingGuard<'a>(&'a AtomicBool);

impl Drop for SavingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl DeveloperSettingsPanel {
    pub fn new(settings: ApiSettings, dev: DevMode) -> Self {
        Self { settings, dev, saving: Arc::new(AtomicBool::new(false)), save_delay: SAVE_DELAY }
    }

    #[must_use]
    pub fn with_save_delay(mut self, save_delay: Duration) -> Self {
        self.save_delay = save_delay;
        self
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.dev.is_development()
    }

    #[must_use]
    pub fn is_saving(&self) -> bool {
        self.saving.load(Ordering::SeqCst)
    }

    /// The switch is disabled while saving or while real mode is locked out.
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.is_saving() || locked_out(&self.settings)
    }

    #[must_use]
    pub fn status(&self) -> &'static str {
        if self.settings.mode().is_real() { "Status: Using real API" } else { "Status: Using simulation" }
    }

    #[must_use]
    pub fn state(&self) -> PanelState {
        PanelState {
            title: PANEL_TITLE,
            description: PANEL_DESCRIPTION,
            use_real_api: self.settings.mode().is_real(),
            configured: self.settings.is_configured(),
            is_saving: self.is_saving(),
            is_disabled: self.is_disabled(),
            status: self.status(),
        }
    }

    fn begin_save(&self) -> Result<SavingGuard<'_>, ToggleError> {
        if !self.is_visible() {
            return Err(ToggleError::Hidden);
        }
        self.saving
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| ToggleError::Busy)?;
        Ok(SavingGuard(&self.saving))
    }

    /// Flip the mode after the simulated save. Returns the new flag.
    ///
    /// # Errors
    ///
    /// Returns an error when hidden, busy, enabling without a key, or when
    /// the flag cannot be persisted.
    pub async fn toggle(&self) -> Result<bool, ToggleError> {
        if !self.is_visible() {
            return Err(ToggleError::Hidden);
        }
        if locked_out(&self.settings) {
            return Err(ToggleError::MissingApiKey);
        }
        let _guard = self.begin_save()?;
        tokio::time::sleep(self.save_delay).await;
        // The key may have been cleared during the save.
        if locked_out(&self.settings) {
            return Err(ToggleError::MissingApiKey);
        }
        Ok(self.settings.toggle_real_api()?)
    }

    /// Keep `api_key` in memory after the simulated save. Not persisted.
    ///
    /// # Errors
    ///
    /// Returns an error when hidden or busy.
    pub async fn save_api_key(&self, api_key: &str) -> Result<(), ToggleError> {
        let _guard = self.begin_save()?;
        tokio::time::sleep(self.save_delay).await;
        self.settings.set_api_key(api_key);
        info!(configured = self.settings.is_configured(), "toggle: api key saved");
        Ok(())
    }
}

#[cfg(test)]
#[path = "toggle_test.rs"]
mod tests;
