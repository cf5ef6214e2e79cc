//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! Everything in it is a cheap clone over shared handles: the provider
//! settings, the suggestion adapter, the form provider and the wizard session
//! built on it, plus the two developer controls.
//!
//! The process serves one wizard session. The form provider lives as long as
//! the state, so the session's context never outlives it.

use std::sync::Arc;

use crate::config::{ApiSettings, SuggestConfig};
use crate::form::FormProvider;
use crate::llm::LlmChat;
use crate::suggest::SuggestionService;
use crate::toggle::{ApiToggleSwitch, DevMode, DeveloperSettingsPanel};
use crate::watcher::WatchOptions;
use crate::wizard::WizardSession;

#[derive(Clone)]
pub struct AppState {
    pub settings: ApiSettings,
    pub suggest: SuggestConfig,
    pub dev: DevMode,
    pub service: Arc<SuggestionService>,
    pub form: Arc<FormProvider>,
    pub session: Arc<WizardSession>,
    pub switch: ApiToggleSwitch,
    pub panel: DeveloperSettingsPanel,
}

impl AppState {
    #[must_use]
    pub fn new(settings: ApiSettings, llm: Arc<dyn LlmChat>, suggest: SuggestConfig, dev: DevMode) -> Self {
        let service = Arc::new(SuggestionService::new(settings.clone(), llm, suggest.simulated_delay));
        let form = Arc::new(FormProvider::new());
        let session = Arc::new(WizardSession::new(form.context(), service.clone(), WatchOptions::from(suggest)));
        Self {
            switch: ApiToggleSwitch::new(settings.clone(), dev),
            panel: DeveloperSettingsPanel::new(settings.clone(), dev),
            settings,
            suggest,
            dev,
            service,
            form,
            session,
        }
    }
}
