use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of removing several records in one call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Deletion {
    pub deleted: Vec<RecordId>,
    /// Requested identifiers that matched no record.
    pub missing: Vec<String>,
}

/// An entity kept in a [`RecordStore`].
///
/// `Draft` is the validated payload a record is created from and `Patch` the
/// payload of an update. Patches are shallow: fields left as `None` keep their
/// current value.
pub trait Record: Clone {
    type Draft;
    type Patch;

    /// Singular entity name used in logs and NotFound errors.
    const KIND: &'static str;

    fn from_draft(id: RecordId, draft: Self::Draft, now: DateTime<Utc>) -> Self;

    fn id(&self) -> &RecordId;

    fn created_at(&self) -> DateTime<Utc>;

    /// Overwrites the fields present in `patch` and refreshes the update timestamp.
    fn apply(&mut self, patch: Self::Patch, now: DateTime<Utc>);
}

/// In-memory, insertion-ordered collection of one entity type.
pub struct RecordStore<T: Record> {
    items: Vec<T>,
    next_id: u64,
    revision: watch::Sender<u64>,
}

impl<T: Record> Default for RecordStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> RecordStore<T> {
    pub fn new() -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            items: Vec::new(),
            next_id: 1,
            revision,
        }
    }

    /// Builds a store pre-filled with `records`, keeping their order.
    ///
    /// Records repeating an earlier identifier are dropped. Generated identifiers
    /// start after the highest numeric identifier present.
    pub fn with_records(records: Vec<T>) -> Self {
        let mut store = Self::new();
        for record in records {
            if store.get_by_id(record.id().as_str()).is_some() {
                warn!(kind = T::KIND, id = %record.id(), "dropping seed record with duplicate id");
                continue;
            }
            if let Ok(numeric) = record.id().as_str().parse::<u64>() {
                store.next_id = store.next_id.max(numeric.saturating_add(1));
            }
            store.items.push(record);
        }
        store
    }

    pub fn list(&self) -> &[T] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get_by_id(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id().as_str() == id)
    }

    pub fn create(&mut self, draft: T::Draft) -> T {
        let id = self.generate_id();
        let record = T::from_draft(id, draft, Utc::now());
        self.items.push(record.clone());
        self.bump();
        record
    }

    /// Returns `None` and leaves the collection untouched when `id` is unknown.
    pub fn update(&mut self, id: &str, patch: T::Patch) -> Option<T> {
        let record = self.items.iter_mut().find(|item| item.id().as_str() == id)?;
        record.apply(patch, Utc::now());
        let updated = record.clone();
        self.bump();
        Some(updated)
    }

    pub fn delete(&mut self, id: &str) -> bool {
        let Some(position) = self.items.iter().position(|item| item.id().as_str() == id) else {
            return false;
        };
        self.items.remove(position);
        self.bump();
        true
    }

    /// Removes every record whose id is listed. Repeated ids are reported once.
    pub fn delete_many<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) -> Deletion {
        let mut outcome = Deletion::default();
        for id in ids {
            let seen = outcome.deleted.iter().any(|deleted| deleted.as_str() == id)
                || outcome.missing.iter().any(|missing| missing == id);
            if seen {
                continue;
            }
            match self.items.iter().position(|item| item.id().as_str() == id) {
                Some(position) => outcome.deleted.push(self.items.remove(position).id().clone()),
                None => outcome.missing.push(id.to_string()),
            }
        }

        if !outcome.deleted.is_empty() {
            self.bump();
        }
        outcome
    }

    /// Current revision; incremented by every successful mutation.
    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    fn generate_id(&mut self) -> RecordId {
        let id = RecordId::new(self.next_id.to_string());
        self.next_id += 1;
        id
    }

    fn bump(&self) {
        self.revision.send_modify(|revision| *revision += 1);
    }
}

/// Refreshed update timestamp that never precedes `created_at`.
pub fn touched(created_at: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    now.max(created_at)
}
