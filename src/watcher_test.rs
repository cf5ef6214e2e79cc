use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use crate::config::ApiMode;
use crate::suggest::SuggestError;

// =========================================================================
// ScriptedSource
// =========================================================================

#[derive(Clone, Copy)]
enum Behavior {
    /// Answer with the input echoed back as the only suggestion.
    Echo,
    /// Answer with a response-level error.
    ErrorResponse,
    /// Fail the call.
    Fail,
    /// Panic inside the call.
    Panic,
}

struct ScriptedSource {
    behavior: Behavior,
    delays: HashMap<&'static str, Duration>,
    calls: Mutex<Vec<String>>,
    completed: AtomicUsize,
}

impl ScriptedSource {
    fn new(behavior: Behavior) -> Arc<Self> {
        Arc::new(Self::with_delays(behavior, &[]))
    }

    fn with_delays(behavior: Behavior, delays: &[(&'static str, u64)]) -> Self {
        Self {
            behavior,
            delays: delays
                .iter()
                .map(|(input, ms)| (*input, Duration::from_millis(*ms)))
                .collect(),
            calls: Mutex::new(Vec::new()),
            completed: AtomicUsize::new(0),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl SuggestionSource for ScriptedSource {
    async fn generate(&self, request: &SuggestionRequest) -> Result<SuggestionResponse, SuggestError> {
        self.calls.lock().unwrap().push(request.input.clone());
        if let Some(delay) = self.delays.get(request.input.as_str()) {
            tokio::time::sleep(*delay).await;
        }
        self.completed.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            Behavior::Echo => Ok(SuggestionResponse {
                suggestions: vec![request.input.clone()],
                error: None,
                mode: ApiMode::Simulation,
            }),
            Behavior::ErrorResponse => Ok(SuggestionResponse {
                suggestions: vec!["Please try again with more specific details".into()],
                error: Some("Unable to process the AI response".into()),
                mode: ApiMode::RealApi,
            }),
            Behavior::Fail => Err(SuggestError::Source("boom".into())),
            Behavior::Panic => panic!("source exploded"),
        }
    }

    fn mode(&self) -> ApiMode {
        ApiMode::Simulation
    }
}

fn watcher(source: Arc<ScriptedSource>) -> SuggestionWatcher {
    SuggestionWatcher::new(source, FieldType::TrademarkName, WatchOptions::default())
}

async fn settle() {
    tokio::time::sleep(Duration::from_secs(5)).await;
}

// =========================================================================
// minimum length
// =========================================================================

#[tokio::test(start_paused = true)]
async fn short_input_resets_without_calling_source() {
    let source = ScriptedSource::new(Behavior::Echo);
    let w = watcher(source.clone());

    for input in ["", "a", "ab", "  ab  "] {
        w.set_input(input);
        let state = w.state();
        assert!(state.suggestions.is_empty());
        assert!(!state.is_loading);
        assert_eq!(state.error, None);
        assert_eq!(state.phase, WatchPhase::Idle);
    }
    settle().await;
    assert!(source.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn dropping_below_minimum_discards_pending_request() {
    let source = ScriptedSource::new(Behavior::Echo);
    let w = watcher(source.clone());

    w.set_input("My App");
    assert!(w.state().is_loading);
    tokio::time::sleep(Duration::from_millis(300)).await;
    w.set_input("My");
    assert_eq!(w.state(), SuggestionState::default());

    settle().await;
    assert!(source.calls().is_empty());
    assert_eq!(w.state(), SuggestionState::default());
}

// =========================================================================
// debounce
// =========================================================================

#[tokio::test(start_paused = true)]
async fn rapid_changes_produce_one_call_with_final_value() {
    let source = ScriptedSource::new(Behavior::Echo);
    let w = watcher(source.clone());

    for input in ["Blu", "Blue", "Blue H", "Blue Harbor"] {
        w.set_input(input);
        tokio::time::sleep(Duration::from_millis(200)).await;
    }
    settle().await;

    assert_eq!(source.calls(), vec!["Blue Harbor"]);
    let state = w.state();
    assert_eq!(state.phase, WatchPhase::Resolved);
    assert_eq!(state.suggestions, vec!["Blue Harbor"]);
    assert!(!state.is_loading);
}

#[tokio::test(start_paused = true)]
async fn source_not_called_before_debounce_elapses() {
    let source = ScriptedSource::new(Behavior::Echo);
    let w = watcher(source.clone());

    w.set_input("Acme");
    tokio::time::sleep(Duration::from_millis(599)).await;
    assert!(source.calls().is_empty());
    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(source.calls(), vec!["Acme"]);
}

#[tokio::test(start_paused = true)]
async fn repeated_value_is_not_reissued() {
    let source = ScriptedSource::new(Behavior::Echo);
    let w = watcher(source.clone());

    w.set_input("Acme");
    settle().await;
    w.set_input("Acme");
    settle().await;
    assert_eq!(source.calls().len(), 1);
}

// =========================================================================
// staleness
// =========================================================================

#[tokio::test(start_paused = true)]
async fn older_slower_result_never_overwrites_newer() {
    let source = Arc::new(ScriptedSource::with_delays(Behavior::Echo, &[("first", 1000), ("second", 10)]));
    let w = watcher(source.clone());
    let mut rx = w.subscribe();

    w.set_input("first");
    tokio::time::sleep(Duration::from_millis(700)).await;
    assert_eq!(source.calls(), vec!["first"]);

    w.set_input("second");
    rx.wait_for(|s| s.phase == WatchPhase::Resolved).await.unwrap();
    assert_eq!(w.state().suggestions, vec!["second"]);

    settle().await;
    // "first" completed after "second" but was discarded.
    assert_eq!(source.completed.load(Ordering::SeqCst), 2);
    assert_eq!(w.state().suggestions, vec!["second"]);
}

#[tokio::test(start_paused = true)]
async fn stale_generation_is_dropped_by_apply() {
    let source = ScriptedSource::new(Behavior::Echo);
    let w = watcher(source);

    w.set_input("newest");
    let current = w.inner.lock_slot().generation;
    w.inner.apply(
        current - 1,
        SuggestionState { phase: WatchPhase::Resolved, suggestions: vec!["old".into()], ..SuggestionState::default() },
    );
    assert!(w.state().suggestions.is_empty());
    assert_eq!(w.state().phase, WatchPhase::Pending);
}

// =========================================================================
// unmount
// =========================================================================

#[tokio::test(start_paused = true)]
async fn drop_discards_in_flight_result() {
    let source = Arc::new(ScriptedSource::with_delays(Behavior::Echo, &[("Acme", 1000)]));
    let w = watcher(source.clone());
    let rx = w.subscribe();

    w.set_input("Acme");
    tokio::time::sleep(Duration::from_millis(700)).await;
    assert_eq!(source.calls().len(), 1);
    drop(w);

    settle().await;
    assert_eq!(source.completed.load(Ordering::SeqCst), 1);
    let last = rx.borrow().clone();
    assert!(last.suggestions.is_empty());
    assert!(last.is_loading);
}

// =========================================================================
// failures
// =========================================================================

#[tokio::test(start_paused = true)]
async fn response_error_clears_suggestions() {
    let w = watcher(ScriptedSource::new(Behavior::ErrorResponse));
    w.set_input("Acme");
    settle().await;

    let state = w.state();
    assert_eq!(state.phase, WatchPhase::Failed);
    assert!(state.suggestions.is_empty());
    assert_eq!(state.error.as_deref(), Some("Unable to process the AI response"));
    assert!(state.is_using_real_api);
    assert!(!state.is_loading);
}

#[tokio::test(start_paused = true)]
async fn source_error_maps_to_generic_message() {
    let w = watcher(ScriptedSource::new(Behavior::Fail));
    w.set_input("Acme");
    settle().await;
    assert_eq!(w.state().error.as_deref(), Some(GENERATION_FAILED));
}

#[tokio::test(start_paused = true)]
async fn source_panic_maps_to_generic_message() {
    let w = watcher(ScriptedSource::new(Behavior::Panic));
    w.set_input("Acme");
    settle().await;
    let state = w.state();
    assert_eq!(state.error.as_deref(), Some(GENERATION_FAILED));
    assert!(!state.is_loading);
}

#[test]
fn watch_options_from_suggest_config() {
    let config = SuggestConfig { min_length: 5, max_suggestions: 2, ..SuggestConfig::default() };
    let options = WatchOptions::from(config);
    assert_eq!(options.min_length, 5);
    assert_eq!(options.max_suggestions, 2);
    assert_eq!(options.debounce, Duration::from_millis(600));
}
