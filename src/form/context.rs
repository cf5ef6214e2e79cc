//! Provider/context pair for sharing one `FormStore`.
//!
//! DESIGN
//! ======
//! The provider holds the only strong reference. Contexts hold a `Weak` and
//! upgrade it per call, so a context that outlives its provider (or was
//! never attached to one) fails with `FormError::OutsideProvider` instead of
//! silently operating on an orphaned store.
//!
//! Mutations run to completion under the write lock; no lock is held across
//! an `.await`.

use std::sync::{Arc, PoisonError, RwLock, Weak};

use time::OffsetDateTime;
use tracing::debug;
use uuid::Uuid;

use super::{AnswersPatch, FilingType, FormError, FormStore, UploadedFile};

type Shared = Arc<RwLock<FormStore>>;

/// Owner of the wizard's form state.
#[derive(Debug, Default)]
pub struct FormProvider {
    store: Shared,
}

impl FormProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn context(&self) -> FormContext {
        FormContext { store: Arc::downgrade(&self.store) }
    }
}

/// Cheap handle onto a provider's store.
#[derive(Debug, Clone, Default)]
pub struct FormContext {
    store: Weak<RwLock<FormStore>>,
}

impl FormContext {
    /// A context with no provider behind it. Every call fails.
    #[must_use]
    pub fn detached() -> Self {
        Self::default()
    }

    fn shared(&self) -> Result<Shared, FormError> {
        self.store.upgrade().ok_or(FormError::OutsideProvider)
    }

    /// # Errors
    ///
    /// Returns `OutsideProvider` if the provider is gone.
    pub fn read<R>(&self, f: impl FnOnce(&FormStore) -> R) -> Result<R, FormError> {
        let shared = self.shared()?;
        let store = shared.read().unwrap_or_else(PoisonError::into_inner);
        Ok(f(&store))
    }

    /// # Errors
    ///
    /// Returns `OutsideProvider` if the provider is gone, or whatever `f`
    /// returns.
    pub fn update<R>(&self, f: impl FnOnce(&mut FormStore) -> Result<R, FormError>) -> Result<R, FormError> {
        let shared = self.shared()?;
        let mut store = shared.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut store)
    }

    /// # Errors
    ///
    /// Returns `OutsideProvider` if the provider is gone.
    pub fn snapshot(&self) -> Result<FormStore, FormError> {
        self.read(FormStore::clone)
    }

    // =========================================================================
    // OPERATIONS
    // =========================================================================

    /// # Errors
    ///
    /// Returns `OutsideProvider` if the provider is gone.
    pub fn set_filing_type(&self, filing_type: Option<FilingType>) -> Result<(), FormError> {
        debug!(filing_type = ?filing_type, "form: set filing type");
        self.update(|s| {
            s.set_filing_type(filing_type);
            Ok(())
        })
    }

    /// # Errors
    ///
    /// See [`FormStore::set_current_step`].
    pub fn set_current_step(&self, step: usize) -> Result<(), FormError> {
        self.update(|s| s.set_current_step(step))
    }

    /// # Errors
    ///
    /// See [`FormStore::update_answers`].
    pub fn update_answers(&self, patch: AnswersPatch) -> Result<(), FormError> {
        self.update(|s| s.update_answers(patch))
    }

    /// # Errors
    ///
    /// See [`FormStore::add_file`].
    pub fn add_file(&self, file: UploadedFile) -> Result<(), FormError> {
        debug!(file_id = %file.id, size = file.size, category = %file.category, "form: file added");
        self.update(|s| s.add_file(file))
    }

    /// # Errors
    ///
    /// Returns `OutsideProvider` if the provider is gone.
    pub fn remove_file(&self, id: Uuid) -> Result<Option<UploadedFile>, FormError> {
        self.update(|s| Ok(s.remove_file(id)))
    }

    /// # Errors
    ///
    /// See [`FormStore::set_compliance_score`].
    pub fn set_compliance_score(&self, score: u8) -> Result<(), FormError> {
        self.update(|s| s.set_compliance_score(score))
    }

    /// # Errors
    ///
    /// Returns `OutsideProvider` if the provider is gone.
    pub fn add_suggestion(&self, key: &str, text: &str) -> Result<bool, FormError> {
        self.update(|s| Ok(s.add_suggestion(key, text)))
    }

    /// # Errors
    ///
    /// See [`FormStore::add_verification_task`].
    pub fn add_verification_task(&self, description: &str, at: OffsetDateTime) -> Result<(), FormError> {
        self.update(|s| s.add_verification_task(description, at))
    }

    /// # Errors
    ///
    /// See [`FormStore::add_consideration`].
    pub fn add_consideration(&self, text: &str, at: OffsetDateTime) -> Result<(), FormError> {
        self.update(|s| s.add_consideration(text, at))
    }

    /// # Errors
    ///
    /// See [`FormStore::add_description_improvement`].
    pub fn add_description_improvement(&self, text: &str, at: OffsetDateTime) -> Result<(), FormError> {
        self.update(|s| s.add_description_improvement(text, at))
    }
}

#[cfg(test)]
#[path = "context_test.rs"]
mod tests;
