//! Thin CRUD screen plumbing.
//!
//! Every list/edit screen follows the same loop: fetch → render →
//! edit → submit → reconcile from the response. The pieces here are
//! the loop's shared state: a loading flag that gates rendering, and a
//! form whose errors come from two places: client-side presence
//! checks before submit, and per-field messages mapped back from an
//! HTTP 422 after.
//!
//! Failures degrade to an error state plus a message, never a crash;
//! there is no automatic retry and no request cancellation on screen
//! close (a late response is a wasted update, nothing more).

use std::collections::BTreeMap;
use workdesk_api::{ApiError, BoqUpdate};
use workdesk_types::Capability;

/// Message attached to a required field that was left blank.
pub const REQUIRED_MESSAGE: &str = "This field is required.";

/// Lifecycle of one fetched view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState<T> {
    /// The fetch is in flight; render a spinner, nothing else.
    Loading,
    /// Data arrived; render it.
    Ready(T),
    /// The fetch failed; render the message.
    Failed(String),
}

impl<T> LoadState<T> {
    /// Settles the state from a fetch outcome.
    ///
    /// Callers route the result through the session context's 401
    /// policy first; by the time it lands here, `Unauthorized` has
    /// already forced the logout.
    #[must_use]
    pub fn settle(result: Result<T, ApiError>) -> Self {
        match result {
            Ok(value) => Self::Ready(value),
            Err(err) => Self::Failed(err.to_string()),
        }
    }

    /// Whether the fetch is still in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// The loaded value, if settled successfully.
    #[must_use]
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    /// The failure message, if settled with an error.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Editable form state with field-keyed errors.
///
/// # Example
///
/// ```
/// use workdesk_app::{FormState, REQUIRED_MESSAGE};
///
/// let mut form = FormState::new(&["name"]);
/// assert!(!form.validate());
/// assert_eq!(form.errors_for("name"), &[REQUIRED_MESSAGE.to_string()]);
///
/// form.set("name", "PT Sinar Abadi");
/// assert!(form.validate());
/// ```
#[derive(Debug, Clone, Default)]
pub struct FormState {
    values: BTreeMap<&'static str, String>,
    required: &'static [&'static str],
    errors: BTreeMap<String, Vec<String>>,
}

impl FormState {
    /// Creates an empty form with the given required fields.
    #[must_use]
    pub fn new(required: &'static [&'static str]) -> Self {
        Self {
            values: BTreeMap::new(),
            required,
            errors: BTreeMap::new(),
        }
    }

    /// Sets one field's value.
    pub fn set(&mut self, field: &'static str, value: impl Into<String>) {
        self.values.insert(field, value.into());
    }

    /// Returns one field's value.
    #[must_use]
    pub fn value(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    /// Runs the client-side presence check, replacing previous errors.
    ///
    /// Returns whether the form may be submitted. Blank counts as
    /// missing: whitespace-only input does not pass.
    pub fn validate(&mut self) -> bool {
        self.errors.clear();
        for &field in self.required {
            let missing = self
                .values
                .get(field)
                .map_or(true, |v| v.trim().is_empty());
            if missing {
                self.errors
                    .insert(field.to_string(), vec![REQUIRED_MESSAGE.to_string()]);
            }
        }
        self.errors.is_empty()
    }

    /// Maps a submit failure back onto the form.
    ///
    /// A 422 lands as per-field messages and returns `true`; any other
    /// error is not form-shaped and is left for the screen's generic
    /// alert.
    pub fn absorb(&mut self, err: &ApiError) -> bool {
        let ApiError::Validation { errors } = err else {
            return false;
        };
        self.errors.clear();
        for (field, messages) in &errors.0 {
            self.errors.insert(field.clone(), messages.clone());
        }
        true
    }

    /// Returns the messages attached to one field.
    #[must_use]
    pub fn errors_for(&self, field: &str) -> &[String] {
        self.errors.get(field).map_or(&[], Vec::as_slice)
    }

    /// Whether any field currently carries an error.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Restricts a BOQ line edit to the fields the capability may touch.
///
/// Progress belongs to the engineering portion; `qty` and `unit_price`
/// (whose edits make the server recompute the monetary `amount`)
/// belong to marketing. Fields outside the capability are silently
/// dropped before submit, mirroring the inputs the screen disables.
#[must_use]
pub fn boq_update_for(capability: Capability, update: BoqUpdate) -> BoqUpdate {
    BoqUpdate {
        qty: update.qty.filter(|_| capability.recomputes_monetary()),
        unit_price: update.unit_price.filter(|_| capability.recomputes_monetary()),
        progress: update.progress.filter(|_| capability.can_edit_progress()),
    }
}
