//! Application composition.
//!
//! [`App`] owns the record store, the form, the notifier and the last rendered
//! table, and routes UI events between them. Every event that can change the
//! record list is followed by a redraw.

use tracing::debug;

use crate::config::Config;
use crate::error::Result;
use crate::form::{Confirm, DeleteOutcome, FormController, SubmitEvent, SubmitOutcome};
use crate::notify::{Clock, Notification, Notifier, Phase, SystemClock, Timings};
use crate::record::RecordId;
use crate::render::{render, TableView, Viewport};
use crate::storage::{SlotStore, SqliteSlotStore};
use crate::store::RecordStore;
use crate::validation::Field;

/// A running record-book session.
#[derive(Debug)]
pub struct App<S, C> {
    store: RecordStore<S>,
    form: FormController,
    notifier: Notifier,
    viewport: Viewport,
    table: TableView,
    confirm_deletes: bool,
    clock: C,
}

impl App<SqliteSlotStore, SystemClock> {
    /// Open the configured slot database and load the records.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn open(config: &Config) -> Result<Self> {
        let slots = SqliteSlotStore::open(config.database_path())?;
        Ok(Self::new(slots, config, SystemClock::new()))
    }
}

impl<S: SlotStore, C: Clock> App<S, C> {
    /// Start a session over the given slot backend and clock.
    pub fn new(slots: S, config: &Config, clock: C) -> Self {
        let store = RecordStore::load(slots, config.storage.slot_key.clone());
        let viewport = Viewport {
            visible_rows: config.display.visible_rows,
        };
        let table = render(store.records(), viewport);
        Self {
            store,
            form: FormController::new(),
            notifier: Notifier::new(Timings::from(&config.notifications)),
            viewport,
            table,
            confirm_deletes: config.display.confirm_deletes,
            clock,
        }
    }

    /// Type into a form field.
    pub fn input(&mut self, field: Field, value: impl Into<String>) -> bool {
        self.form.set_field(field, value)
    }

    /// Submit the form.
    ///
    /// # Errors
    ///
    /// Returns an error if the change cannot be persisted. The table is
    /// redrawn from memory first.
    pub fn submit(&mut self) -> Result<SubmitOutcome> {
        let mut event = SubmitEvent::new();
        let now = self.clock.now();
        let result = self
            .form
            .submit(&mut event, &mut self.store, &mut self.notifier, now);
        // A failed write still leaves the change in memory
        if !matches!(result, Ok(SubmitOutcome::Invalid(_))) {
            self.redraw();
        }
        result
    }

    /// Edit button on a row.
    pub fn edit(&mut self, id: &RecordId) -> bool {
        self.form.start_edit(id, &self.store)
    }

    /// Delete button on a row.
    ///
    /// `confirm` is skipped when deletes are configured not to ask.
    ///
    /// # Errors
    ///
    /// Returns an error if the change cannot be persisted.
    pub fn delete(&mut self, id: &RecordId, confirm: &mut dyn Confirm) -> Result<DeleteOutcome> {
        let now = self.clock.now();
        let mut always = |_: &str| true;
        let confirm: &mut dyn Confirm = if self.confirm_deletes {
            confirm
        } else {
            &mut always
        };
        let result = self
            .form
            .delete(id, &mut self.store, &mut self.notifier, confirm, now);
        if !matches!(result, Ok(DeleteOutcome::Declined)) {
            self.redraw();
        }
        result
    }

    /// Abandon the current edit or clear the form.
    pub fn reset_form(&mut self) {
        self.form.reset();
    }

    /// Advance the notification lifecycle to the current time.
    pub fn tick(&mut self) -> Option<Phase> {
        let now = self.clock.now();
        self.notifier.tick(now)
    }

    /// The live notification, if any.
    #[must_use]
    pub fn notification(&self) -> Option<&Notification> {
        self.notifier.current()
    }

    /// The form state.
    #[must_use]
    pub fn form(&self) -> &FormController {
        &self.form
    }

    /// The record store.
    #[must_use]
    pub fn store(&self) -> &RecordStore<S> {
        &self.store
    }

    /// The most recently rendered table.
    #[must_use]
    pub fn table(&self) -> &TableView {
        &self.table
    }

    /// The session clock.
    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    fn redraw(&mut self) {
        self.table = render(self.store.records(), self.viewport);
        debug!(rows = self.table.rows.len(), alignment = ?self.table.alignment, "Table redrawn");
    }
}
