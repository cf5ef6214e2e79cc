//! Suggestion watcher — debounced, stale-safe suggestions for one field.
//!
//! DESIGN
//! ======
//! One watcher per mounted suggestion panel. Every qualifying input change
//! bumps a generation counter, aborts the pending debounce timer and starts a
//! new one. When the timer survives the debounce window the source is called
//! in its own task; the result is applied only if the generation captured at
//! call time is still current.
//!
//! States: `Idle → Pending → {Resolved, Failed}`, back to `Pending` on new
//! input and to `Idle` when the input drops below the minimum length.
//!
//! TRADE-OFFS
//! ==========
//! Superseded provider calls are not cancelled; they run to completion in a
//! detached task and their result is dropped. Dropping the watcher behaves
//! like a superseding input: nothing is applied after it is gone.
//!
//! All state writes happen under the slot lock, so a stale result can never
//! interleave with the reset issued by a newer input.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::config::{DEFAULT_DEBOUNCE_MS, DEFAULT_MAX_SUGGESTIONS, DEFAULT_MIN_LENGTH, SuggestConfig};
use crate::suggest::{FieldType, GENERATION_FAILED, SuggestionRequest, SuggestionResponse, SuggestionSource};

// =============================================================================
// TYPES
// =============================================================================

/// Timing and sizing for one watcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchOptions {
    /// Trimmed inputs shorter than this (in chars) never reach the source.
    pub min_length: usize,
    pub max_suggestions: usize,
    /// Quiet period required before the source is called.
    pub debounce: Duration,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            min_length: DEFAULT_MIN_LENGTH,
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
        }
    }
}

impl From<SuggestConfig> for WatchOptions {
    fn from(config: SuggestConfig) -> Self {
        Self { min_length: config.min_length, max_suggestions: config.max_suggestions, debounce: config.debounce }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WatchPhase {
    #[default]
    Idle,
    Pending,
    Resolved,
    Failed,
}

/// What a suggestion panel renders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SuggestionState {
    pub phase: WatchPhase,
    pub suggestions: Vec<String>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub is_using_real_api: bool,
}

impl SuggestionState {
    fn idle(is_using_real_api: bool) -> Self {
        Self { is_using_real_api, ..Self::default() }
    }

    fn from_response(response: SuggestionResponse) -> Self {
        let is_using_real_api = response.mode.is_real();
        match response.error {
            Some(error) => Self {
                phase: WatchPhase::Failed,
                suggestions: Vec::new(),
                is_loading: false,
                error: Some(error),
                is_using_real_api,
            },
            None => Self {
                phase: WatchPhase::Resolved,
                suggestions: response.suggestions,
                is_loading: false,
                error: None,
                is_using_real_api,
            },
        }
    }

    fn failed(is_using_real_api: bool) -> Self {
        Self {
            phase: WatchPhase::Failed,
            suggestions: Vec::new(),
            is_loading: false,
            error: Some(GENERATION_FAILED.to_string()),
            is_using_real_api,
        }
    }
}

// =============================================================================
// WATCHER
// =============================================================================

pub struct SuggestionWatcher {
    inner: Arc<Inner>,
}

struct Inner {
    source: Arc<dyn SuggestionSource>,
    field_type: FieldType,
    options: WatchOptions,
    slot: Mutex<Slot>,
    state: watch::Sender<SuggestionState>,
}

#[derive(Default)]
struct Slot {
    generation: u64,
    /// Last input that was scheduled; repeats of it are ignored.
    last_input: Option<String>,
    timer: Option<JoinHandle<()>>,
}

impl Slot {
    fn invalidate(&mut self) -> u64 {
        self.generation += 1;
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        self.generation
    }
}

impl SuggestionWatcher {
    pub fn new(source: Arc<dyn SuggestionSource>, field_type: FieldType, options: WatchOptions) -> Self {
        let (state, _) = watch::channel(SuggestionState::idle(source.mode().is_real()));
        Self { inner: Arc::new(Inner { source, field_type, options, slot: Mutex::new(Slot::default()), state }) }
    }

    #[must_use]
    pub fn field_type(&self) -> &FieldType {
        &self.inner.field_type
    }

    /// Latest non-stale state.
    #[must_use]
    pub fn state(&self) -> SuggestionState {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SuggestionState> {
        self.inner.state.subscribe()
    }

    /// Feed the field's current text. Must be called inside a Tokio runtime.
    pub fn set_input(&self, input: &str) {
        let mut slot = self.inner.lock_slot();

        if input.trim().chars().count() < self.inner.options.min_length {
            slot.invalidate();
            slot.last_input = None;
            self.inner
                .state
                .send_replace(SuggestionState::idle(self.inner.source.mode().is_real()));
            return;
        }

        if slot.last_input.as_deref() == Some(input) {
            return;
        }

        let generation = slot.invalidate();
        slot.last_input = Some(input.to_string());
        self.inner.state.send_modify(|state| {
            state.phase = WatchPhase::Pending;
            state.is_loading = true;
            state.error = None;
        });

        let inner = Arc::clone(&self.inner);
        let input = input.to_string();
        slot.timer = Some(tokio::spawn(async move { inner.run(generation, input).await }));
    }
}

impl Drop for SuggestionWatcher {
    fn drop(&mut self) {
        self.inner.lock_slot().invalidate();
    }
}

impl Inner {
    fn lock_slot(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn run(&self, generation: u64, input: String) {
        tokio::time::sleep(self.options.debounce).await;

        let request = SuggestionRequest::new(input, self.field_type.clone()).with_max(self.options.max_suggestions);
        let source = Arc::clone(&self.source);
        debug!(field_type = %self.field_type, generation, "watcher: invoking source");

        // Separate task: a superseded call keeps running after this one is aborted.
        let call = tokio::spawn(async move { source.generate(&request).await });
        let next = match call.await {
            Ok(Ok(response)) => SuggestionState::from_response(response),
            Ok(Err(e)) => {
                warn!(error = %e, field_type = %self.field_type, "watcher: source failed");
                SuggestionState::failed(self.source.mode().is_real())
            }
            Err(e) => {
                warn!(error = %e, field_type = %self.field_type, "watcher: source task aborted");
                SuggestionState::failed(self.source.mode().is_real())
            }
        };

        self.apply(generation, next);
    }

    fn apply(&self, generation: u64, next: SuggestionState) {
        let slot = self.lock_slot();
        if slot.generation != generation {
            debug!(field_type = %self.field_type, generation, current = slot.generation, "watcher: stale result dropped");
            return;
        }
        self.state.send_replace(next);
    }
}

#[cfg(test)]
#[path = "watcher_test.rs"]
mod tests;
