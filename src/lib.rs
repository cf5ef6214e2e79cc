//! Filing wizard — patent and trademark application forms with AI suggestions.
//!
//! SYSTEM CONTEXT
//! ==============
//! The wizard walks an applicant through a five-page filing. Selected fields
//! are watched: after the user pauses typing, a suggestion panel asks the
//! adapter for hints, either from the Anthropic API or from a local simulator.
//! Applying a hint writes tasks, notes or improvements back into the form.
//! A developer-only switch flips between the two suggestion backends.

pub mod config;
pub mod error;
pub mod form;
pub mod llm;
pub mod routes;
pub mod state;
pub mod suggest;
pub mod toggle;
pub mod watcher;
pub mod wizard;

#[cfg(test)]
pub mod test_helpers;
