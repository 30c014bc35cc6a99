//! The student form controller.
//!
//! Holds what the user has typed, which record (if any) is being edited, and
//! which fields are flagged invalid. Mutations of the record list go through
//! the [`RecordStore`] passed to each call; the controller never keeps its own
//! copy of the records.
//!
//! ```text
//! Create --submit(valid)--> Create      record added
//! Create --edit(id)-------> Edit(id)    form pre-filled
//! Edit   --submit(valid)--> Create      record updated
//! Edit   --delete(same)---> Create      form reset
//! any    --submit(invalid)-> unchanged  error notice, markers set
//! ```

use std::time::Duration;

use tracing::{debug, info};

use crate::error::Result;
use crate::notify::{NoticeKind, Notifier};
use crate::record::{Record, RecordData, RecordId};
use crate::storage::SlotStore;
use crate::store::RecordStore;
use crate::validation::{check_field, validate_form, Field, FieldMarkers, ValidationReport};

/// Notice after a successful add.
pub const MSG_ADDED: &str = "Student added successfully!";
/// Notice after a successful update.
pub const MSG_UPDATED: &str = "Student record updated successfully!";
/// Notice after a rejected submission.
pub const MSG_INVALID: &str = "Please fix the errors before submitting.";
/// Notice after a delete.
pub const MSG_DELETED: &str = "Student record deleted.";
/// Notice when the record being edited has disappeared.
pub const MSG_MISSING: &str = "Student record no longer exists.";
/// Question asked before deleting.
pub const DELETE_PROMPT: &str = "Are you sure you want to delete this record?";

/// Whether the form creates a new record or edits an existing one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Mode {
    /// Submitting adds a record.
    #[default]
    Create,
    /// Submitting updates the record with this id.
    Edit(RecordId),
}

/// The submit event handed over by the UI.
///
/// Handling a submission always prevents the host's default action (page
/// navigation in a browser, for example).
#[derive(Debug, Default)]
pub struct SubmitEvent {
    default_prevented: bool,
}

impl SubmitEvent {
    /// A fresh event.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Suppress the host's default handling.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Whether the default handling was suppressed.
    #[must_use]
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Asks the user to confirm a destructive action.
pub trait Confirm {
    /// Return `true` to go ahead.
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Result of a form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A new record was stored.
    Added(Record),
    /// The edited record was updated.
    Updated(RecordId),
    /// Validation failed; nothing was stored.
    Invalid(ValidationReport),
    /// The record being edited no longer exists; the form was reset.
    Missing(RecordId),
}

/// Result of a delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The record was removed.
    Deleted {
        /// Whether the form was reset because it was editing this record.
        form_reset: bool,
    },
    /// No record had that id.
    NotFound,
    /// The user declined.
    Declined,
}

/// State of the student form.
#[derive(Debug, Clone, Default)]
pub struct FormController {
    fields: RecordData,
    mode: Mode,
    markers: FieldMarkers,
}

impl FormController {
    /// An empty form in create mode.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current mode.
    #[must_use]
    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    /// Id held in the hidden id field, if editing.
    #[must_use]
    pub fn editing_id(&self) -> Option<&RecordId> {
        match &self.mode {
            Mode::Create => None,
            Mode::Edit(id) => Some(id),
        }
    }

    /// Form heading.
    #[must_use]
    pub fn title(&self) -> &'static str {
        match self.mode {
            Mode::Create => "Add New Student",
            Mode::Edit(_) => "Edit Student Details",
        }
    }

    /// Submit button label.
    #[must_use]
    pub fn submit_label(&self) -> &'static str {
        match self.mode {
            Mode::Create => "Add Student",
            Mode::Edit(_) => "Update Student",
        }
    }

    /// Raw value of a field.
    #[must_use]
    pub fn field(&self, field: Field) -> &str {
        self.fields.get(field)
    }

    /// All raw field values.
    #[must_use]
    pub fn fields(&self) -> &RecordData {
        &self.fields
    }

    /// Invalid-field markers.
    #[must_use]
    pub fn markers(&self) -> &FieldMarkers {
        &self.markers
    }

    /// Type into a field. The field is re-validated and its marker updated.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) -> bool {
        self.fields.set(field, value);
        check_field(field, self.fields.get(field), &mut self.markers)
    }

    /// Handle a submission.
    ///
    /// The raw values are checked first, then the trimmed values that would
    /// be stored, so a field that is only whitespace is rejected. Once the
    /// store has been touched the form is reset, even if writing the slot
    /// fails, so a retry cannot add the record twice.
    ///
    /// # Errors
    ///
    /// Returns an error only if the store cannot persist the change.
    pub fn submit<S: SlotStore>(
        &mut self,
        event: &mut SubmitEvent,
        store: &mut RecordStore<S>,
        notifier: &mut Notifier,
        now: Duration,
    ) -> Result<SubmitOutcome> {
        event.prevent_default();

        let data = self.fields.trimmed();
        let fields = &self.fields;
        let mut report = validate_form(|f| fields.get(f), &mut self.markers);
        if report.is_valid() {
            report = validate_form(|f| data.get(f), &mut self.markers);
        }
        if !report.is_valid() {
            notifier.notify(MSG_INVALID, NoticeKind::Error, now);
            return Ok(SubmitOutcome::Invalid(report));
        }

        let mode = std::mem::take(&mut self.mode);
        self.reset();
        let outcome = match mode {
            Mode::Create => {
                let record = store.add(data)?;
                info!(id = %record.id, "Student added");
                notifier.notify(MSG_ADDED, NoticeKind::Success, now);
                SubmitOutcome::Added(record)
            }
            Mode::Edit(id) => {
                if store.update(&id, data)? {
                    info!(id = %id, "Student updated");
                    notifier.notify(MSG_UPDATED, NoticeKind::Success, now);
                    SubmitOutcome::Updated(id)
                } else {
                    notifier.notify(MSG_MISSING, NoticeKind::Error, now);
                    SubmitOutcome::Missing(id)
                }
            }
        };
        Ok(outcome)
    }

    /// Load a record into the form for editing.
    ///
    /// Returns `false` and leaves the form alone if the id is unknown.
    pub fn start_edit<S: SlotStore>(&mut self, id: &RecordId, store: &RecordStore<S>) -> bool {
        let Some(record) = store.find(id) else {
            debug!(id = %id, "Edit requested for unknown record");
            return false;
        };
        self.fields = record.data.clone();
        self.mode = Mode::Edit(record.id.clone());
        debug!(id = %id, "Editing record");
        true
    }

    /// Delete a record after confirmation.
    ///
    /// # Errors
    ///
    /// Returns an error only if the store cannot persist the change.
    pub fn delete<S: SlotStore>(
        &mut self,
        id: &RecordId,
        store: &mut RecordStore<S>,
        notifier: &mut Notifier,
        confirm: &mut dyn Confirm,
        now: Duration,
    ) -> Result<DeleteOutcome> {
        if !confirm.confirm(DELETE_PROMPT) {
            debug!(id = %id, "Delete declined");
            return Ok(DeleteOutcome::Declined);
        }

        // The record leaves memory even when the write fails
        let form_reset = store.find(id).is_some() && self.editing_id() == Some(id);
        if form_reset {
            self.reset();
        }
        if !store.remove(id)? {
            return Ok(DeleteOutcome::NotFound);
        }

        info!(id = %id, "Student deleted");
        notifier.notify(MSG_DELETED, NoticeKind::Success, now);
        Ok(DeleteOutcome::Deleted { form_reset })
    }

    /// Clear every field and marker and return to create mode.
    pub fn reset(&mut self) {
        self.fields = RecordData::default();
        self.mode = Mode::Create;
        self.markers.clear();
    }
}
