//! Wizard session — one form context plus the watchers of the mounted page.
//!
//! DESIGN
//! ======
//! The basic-info page for the active filing type mounts one watcher per
//! suggestion panel. Changing the filing type unmounts them (dropping a
//! watcher discards its in-flight result) and mounts the other page's set.
//!
//! Every answer change is followed by a sync that feeds each bound field's
//! current text to its watcher. Feeding an unchanged value is a no-op, so
//! syncing all panels after a single-field edit is safe.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use time::OffsetDateTime;
use tracing::debug;

use crate::form::{Answers, AnswersPatch, FilingType, FormContext, FormError};
use crate::suggest::SuggestionSource;
use crate::watcher::{SuggestionState, SuggestionWatcher, WatchOptions};

use super::apply::{Notice, apply_suggestion};
use super::panels::{PanelView, panel_spec, panels_for};

#[derive(Default)]
struct Mounted {
    filing_type: Option<FilingType>,
    watchers: HashMap<&'static str, SuggestionWatcher>,
}

pub struct WizardSession {
    form: FormContext,
    source: Arc<dyn SuggestionSource>,
    options: WatchOptions,
    mounted: Mutex<Mounted>,
}

impl WizardSession {
    pub fn new(form: FormContext, source: Arc<dyn SuggestionSource>, options: WatchOptions) -> Self {
        Self { form, source, options, mounted: Mutex::new(Mounted::default()) }
    }

    #[must_use]
    pub fn form(&self) -> &FormContext {
        &self.form
    }

    #[must_use]
    pub fn options(&self) -> WatchOptions {
        self.options
    }

    fn lock_mounted(&self) -> MutexGuard<'_, Mounted> {
        self.mounted.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // =========================================================================
    // EDITS
    // =========================================================================

    /// # Errors
    ///
    /// Returns `OutsideProvider` if the form provider is gone.
    pub fn set_filing_type(&self, filing_type: Option<FilingType>) -> Result<(), FormError> {
        self.form.set_filing_type(filing_type)?;
        self.sync()
    }

    /// Set one field by name and feed its panel, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if no filing type is selected, the field is unknown
    /// for it, or a select value is not one of its options.
    pub fn edit_field(&self, name: &str, value: &str) -> Result<(), FormError> {
        let filing_type = self.form.read(|s| s.filing_type())?.ok_or(FormError::NoFilingType)?;
        let patch = AnswersPatch::single(filing_type, name, value)?;
        self.update_answers(patch)
    }

    /// # Errors
    ///
    /// See [`FormContext::update_answers`].
    pub fn update_answers(&self, patch: AnswersPatch) -> Result<(), FormError> {
        self.form.update_answers(patch)?;
        self.sync()
    }

    /// # Errors
    ///
    /// See [`apply_suggestion`].
    pub fn apply(&self, tag: &str, suggestion: &str) -> Result<Notice, FormError> {
        let spec = panel_spec(tag).ok_or_else(|| FormError::UnknownPanel(tag.to_string()))?;
        apply_suggestion(&self.form, &spec.field_type(), suggestion, OffsetDateTime::now_utc())
    }

    /// Mount the active page's watchers and feed them the current answers.
    /// Must be called inside a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `OutsideProvider` if the form provider is gone.
    pub fn sync(&self) -> Result<(), FormError> {
        let (filing_type, answers) = self.form.read(|s| (s.filing_type(), s.answers().cloned()))?;
        let mut mounted = self.lock_mounted();

        if mounted.filing_type != filing_type {
            debug!(from = ?mounted.filing_type, to = ?filing_type, "wizard: remounting panels");
            mounted.watchers.clear();
            mounted.filing_type = filing_type;
            if let Some(ft) = filing_type {
                for spec in panels_for(ft) {
                    let watcher = SuggestionWatcher::new(Arc::clone(&self.source), spec.field_type(), self.options);
                    mounted.watchers.insert(spec.tag, watcher);
                }
            }
        }

        let Some(ft) = filing_type else { return Ok(()) };
        for spec in panels_for(ft) {
            if let Some(watcher) = mounted.watchers.get(spec.tag) {
                watcher.set_input(field_text(answers.as_ref(), spec.source_field));
            }
        }
        Ok(())
    }

    // =========================================================================
    // READS
    // =========================================================================

    /// Current watcher state of a mounted panel.
    #[must_use]
    pub fn panel_state(&self, tag: &str) -> Option<SuggestionState> {
        self.lock_mounted().watchers.get(tag).map(SuggestionWatcher::state)
    }

    /// Render a mounted panel.
    ///
    /// # Errors
    ///
    /// Returns `UnknownPanel` if `tag` is not mounted for the active filing
    /// type.
    pub fn panel(&self, tag: &str, show_badge: bool) -> Result<PanelView, FormError> {
        let spec = panel_spec(tag).ok_or_else(|| FormError::UnknownPanel(tag.to_string()))?;
        let state = self
            .panel_state(tag)
            .ok_or_else(|| FormError::UnknownPanel(tag.to_string()))?;
        let input = self.form.read(|s| field_text(s.answers(), spec.source_field).to_string())?;
        Ok(PanelView::new(spec, &input, state, self.options.min_length, show_badge))
    }

    /// Tags of the mounted panels, in page order.
    #[must_use]
    pub fn mounted_panels(&self) -> Vec<&'static str> {
        let mounted = self.lock_mounted();
        let Some(ft) = mounted.filing_type else { return Vec::new() };
        panels_for(ft)
            .filter(|spec| mounted.watchers.contains_key(spec.tag))
            .map(|spec| spec.tag)
            .collect()
    }
}

fn field_text<'a>(answers: Option<&'a Answers>, field: &str) -> &'a str {
    answers.and_then(|a| a.text(field)).unwrap_or("")
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
