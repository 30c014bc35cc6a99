//! The record store.
//!
//! Owns the ordered list of records and mirrors it into one storage slot as a
//! JSON array. Every mutation rewrites the whole slot; there are no partial
//! writes and no rollback. List order is insertion order and is also display
//! order.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::record::{Record, RecordData, RecordId};
use crate::storage::SlotStore;

/// Ordered student records synchronized to a slot.
#[derive(Debug)]
pub struct RecordStore<S> {
    slots: S,
    key: String,
    records: Vec<Record>,
    last_id: u64,
}

impl<S: SlotStore> RecordStore<S> {
    /// Load the records persisted under `key`.
    ///
    /// A missing slot, an unreadable backend, or a malformed blob all yield
    /// an empty store; the problem is logged and never returned.
    pub fn load(slots: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let records = match slots.get(&key) {
            Ok(Some(blob)) => parse_records(&blob).unwrap_or_else(|e| {
                warn!(key = %key, error = %e, "Discarding unparseable record blob");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(key = %key, error = %e, "Could not read record slot");
                Vec::new()
            }
        };

        let last_id = records
            .iter()
            .filter_map(|r| r.id.sequence())
            .max()
            .unwrap_or(0);

        debug!(key = %key, count = records.len(), "Loaded records");
        Self {
            slots,
            key,
            records,
            last_id,
        }
    }

    /// Append a new record with a freshly assigned id.
    ///
    /// # Errors
    ///
    /// Returns an error if the list cannot be written back to the slot. The
    /// record stays in memory either way.
    pub fn add(&mut self, data: RecordData) -> Result<Record> {
        let record = Record::new(self.next_id(), data);
        self.records.push(record.clone());
        debug!(id = %record.id, "Record added");
        self.persist()?;
        Ok(record)
    }

    /// Replace every field except the id of the record with `id`.
    ///
    /// Returns `false`, without touching the slot, if no record matches.
    ///
    /// # Errors
    ///
    /// Returns an error if the list cannot be written back to the slot.
    pub fn update(&mut self, id: &RecordId, data: RecordData) -> Result<bool> {
        let Some(record) = self.records.iter_mut().find(|r| &r.id == id) else {
            debug!(id = %id, "Update target not found");
            return Ok(false);
        };
        record.data = data;
        debug!(id = %id, "Record updated");
        self.persist()?;
        Ok(true)
    }

    /// Drop the record with `id`. The slot is rewritten even if nothing
    /// matched.
    ///
    /// # Errors
    ///
    /// Returns an error if the list cannot be written back to the slot.
    pub fn remove(&mut self, id: &RecordId) -> Result<bool> {
        let before = self.records.len();
        self.records.retain(|r| &r.id != id);
        let removed = self.records.len() != before;
        debug!(id = %id, removed, "Record removal");
        self.persist()?;
        Ok(removed)
    }

    /// Look up a record by id.
    #[must_use]
    pub fn find(&self, id: &RecordId) -> Option<&Record> {
        self.records.iter().find(|r| &r.id == id)
    }

    /// All records in insertion order.
    #[must_use]
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Name of the slot backing this store.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The slot backend.
    #[must_use]
    pub fn slots(&self) -> &S {
        &self.slots
    }

    /// Write the whole list to the slot.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the slot write fails.
    pub fn persist(&mut self) -> Result<()> {
        let blob = serde_json::to_string(&self.records)?;
        self.slots.set(&self.key, &blob)?;
        info!(key = %self.key, count = self.records.len(), "Records saved");
        Ok(())
    }

    // Creation time in milliseconds, bumped past the newest id seen so ids
    // stay unique when the clock stalls or records arrive faster than 1 ms.
    // Once the numeric range is used up, ids become non-numeric tokens.
    fn next_id(&mut self) -> RecordId {
        if let Some(bumped) = self.last_id.checked_add(1) {
            let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
            self.last_id = now.max(bumped);
            return RecordId::from_sequence(self.last_id);
        }

        warn!(key = %self.key, "Numeric record ids exhausted");
        let mut n = self.records.len();
        loop {
            let id = RecordId::from_token(format!("r{n}"));
            if self.find(&id).is_none() {
                return id;
            }
            n += 1;
        }
    }
}

/// Parse a persisted blob into records.
///
/// # Errors
///
/// Returns an error if the blob is not a JSON array of records.
pub fn parse_records(blob: &str) -> Result<Vec<Record>> {
    Ok(serde_json::from_str(blob)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemorySlotStore;

    const KEY: &str = "students";

    fn data(name: &str) -> RecordData {
        RecordData {
            name: name.to_string(),
            uid: "101".to_string(),
            email: "a@b.co".to_string(),
            contact: "1234567890".to_string(),
        }
    }

    fn empty_store() -> RecordStore<MemorySlotStore> {
        RecordStore::load(MemorySlotStore::new(), KEY)
    }

    fn persisted(store: &RecordStore<MemorySlotStore>) -> Vec<Record> {
        let blob = store.slots().get(KEY).unwrap().expect("slot written");
        parse_records(&blob).unwrap()
    }

    #[test]
    fn test_load_missing_slot_is_empty() {
        let store = empty_store();
        assert!(store.is_empty());
        assert_eq!(store.key(), KEY);
    }

    #[test]
    fn test_load_malformed_blob_is_empty() {
        crate::logging::init_test_logging();
        let mut slots = MemorySlotStore::new();
        slots.set(KEY, "{not json").unwrap();

        let store = RecordStore::load(slots, KEY);
        assert!(store.is_empty());
    }

    #[test]
    fn test_load_wrong_shape_is_empty() {
        let mut slots = MemorySlotStore::new();
        slots.set(KEY, r#"{"id": 1}"#).unwrap();
        assert!(RecordStore::load(slots, KEY).is_empty());
    }

    #[test]
    fn test_add_assigns_unique_ids_and_persists() {
        let mut store = empty_store();
        let first = store.add(data("Ann Lee")).unwrap();
        let second = store.add(data("Bo Chen")).unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(store.len(), 2);
        assert_eq!(persisted(&store), store.records());
    }

    #[test]
    fn test_ids_stay_above_loaded_ids() {
        let far_future = u64::MAX / 2;
        let mut slots = MemorySlotStore::new();
        slots
            .set(
                KEY,
                &format!(
                    r#"[{{"id":{far_future},"name":"A","uid":"1","email":"a@b.co","contact":"1234567890"}}]"#
                ),
            )
            .unwrap();

        let mut store = RecordStore::load(slots, KEY);
        let added = store.add(data("Bo Chen")).unwrap();
        assert_eq!(added.id.sequence(), Some(far_future + 1));
    }

    #[test]
    fn test_ids_after_largest_numeric_id() {
        let mut slots = MemorySlotStore::new();
        slots
            .set(
                KEY,
                &format!(
                    r#"[{{"id":{},"name":"A","uid":"1","email":"a@b.co","contact":"1234567890"}},
                        {{"id":"r2","name":"B","uid":"2","email":"a@b.co","contact":"1234567890"}}]"#,
                    u64::MAX
                ),
            )
            .unwrap();

        let mut store = RecordStore::load(slots, KEY);
        let first = store.add(data("Bo Chen")).unwrap();
        let second = store.add(data("Cy Dunn")).unwrap();

        assert_eq!(first.id.sequence(), None);
        assert_ne!(first.id.as_str(), "r2");
        assert_ne!(first.id, second.id);
        assert_eq!(store.len(), 4);
        assert_eq!(persisted(&store).len(), 4);
    }

    #[test]
    fn test_update_replaces_fields_but_not_id() {
        let mut store = empty_store();
        let record = store.add(data("Ann Lee")).unwrap();

        let mut changed = data("Ann K Lee");
        changed.contact = "0987654321".to_string();
        assert!(store.update(&record.id, changed.clone()).unwrap());

        let found = store.find(&record.id).unwrap();
        assert_eq!(found.id, record.id);
        assert_eq!(found.data, changed);
        assert_eq!(store.len(), 1);
        assert_eq!(persisted(&store)[0].data, changed);
    }

    #[test]
    fn test_update_missing_leaves_slot_untouched() {
        let mut store = empty_store();
        let missing: RecordId = "does-not-exist".parse().unwrap();

        assert!(!store.update(&missing, data("Ann Lee")).unwrap());
        assert!(store.is_empty());
        assert_eq!(store.slots().get(KEY).unwrap(), None);
    }

    #[test]
    fn test_remove_twice() {
        let mut store = empty_store();
        let keep = store.add(data("Ann Lee")).unwrap();
        let gone = store.add(data("Bo Chen")).unwrap();

        assert!(store.remove(&gone.id).unwrap());
        let after_first = store.records().to_vec();

        assert!(!store.remove(&gone.id).unwrap());
        assert_eq!(store.records(), after_first.as_slice());
        assert_eq!(store.records()[0].id, keep.id);
    }

    #[test]
    fn test_remove_missing_still_persists() {
        let mut store = empty_store();
        let missing: RecordId = "42".parse().unwrap();

        assert!(!store.remove(&missing).unwrap());
        assert_eq!(store.slots().get(KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_find_accepts_id_parsed_from_text() {
        let mut store = empty_store();
        let record = store.add(data("Ann Lee")).unwrap();

        let from_ui: RecordId = format!(" {} ", record.id).parse().unwrap();
        assert_eq!(store.find(&from_ui), Some(&record));
    }

    #[test]
    fn test_reload_reproduces_list() {
        let mut store = empty_store();
        store.add(data("Ann Lee")).unwrap();
        store.add(data("Bo Chen")).unwrap();
        let expected = store.records().to_vec();

        let reloaded = RecordStore::load(store.slots().clone(), KEY);
        assert_eq!(reloaded.records(), expected.as_slice());
    }
}
