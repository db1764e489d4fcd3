//! Bounded, persisted record of past calculations.
//!
//! Entries are kept most-recent-first and capped at [`HISTORY_CAPACITY`]. Every
//! mutation rewrites the persisted copy so the stored sequence always matches
//! the in-memory one.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::api::CalculationResult;
use crate::storage::{KeyValueStore, StorageError};

pub const HISTORY_CAPACITY: usize = 50;
pub const HISTORY_KEY: &str = "ai_bos_history";

/// Denormalized projection of one successful calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    pub timestamp: String,
    pub delay: u32,
    pub penalty: f64,
    pub rule: String,
    pub full_result: CalculationResult,
}

impl From<&CalculationResult> for HistoryEntry {
    fn from(result: &CalculationResult) -> Self {
        Self {
            id: result.request_id.clone(),
            timestamp: result.timestamp.clone(),
            delay: result.delay_minutes(),
            penalty: result.penalty_amount(),
            rule: result.calculation_result.rule_applied.clone(),
            full_result: result.clone(),
        }
    }
}

pub struct HistoryStore<S> {
    storage: S,
    entries: VecDeque<HistoryEntry>,
    // False when the stored copy could not be read; it must not be clobbered.
    write_through: bool,
}

impl<S: KeyValueStore> HistoryStore<S> {
    /// Reads the persisted sequence; absent, corrupt or unreadable data yields an
    /// empty store.
    pub fn load(storage: S) -> Self {
        let (entries, write_through) = match load_persisted(&storage) {
            Ok(entries) => (entries, true),
            Err(err) => {
                warn!(
                    error = %err,
                    "history unreadable, starting empty without overwriting the stored copy"
                );
                (VecDeque::new(), false)
            }
        };
        debug!(count = entries.len(), write_through, "history loaded");
        Self {
            storage,
            entries,
            write_through,
        }
    }

    /// Prepends the result, evicts past capacity, and writes through.
    ///
    /// A failed write is logged and otherwise ignored: the in-memory history
    /// stays authoritative for the session. Nothing is written when the
    /// stored copy could not be read at load time.
    pub fn record_result(&mut self, result: &CalculationResult) -> &HistoryEntry {
        self.entries.push_front(HistoryEntry::from(result));
        self.entries.truncate(HISTORY_CAPACITY);

        if !self.write_through {
            debug!(request_id = %result.request_id, "history kept in memory only");
        } else if let Err(err) = self.persist() {
            warn!(error = %err, request_id = %result.request_id, "history not persisted");
        }

        &self.entries[0]
    }

    pub fn entries(&self) -> impl ExactSizeIterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&HistoryEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    /// Full stored result for re-display.
    pub fn recall(&self, id: &str) -> Option<&CalculationResult> {
        self.get(id).map(|entry| &entry.full_result)
    }

    fn persist(&self) -> Result<(), StorageError> {
        let encoded = serde_json::to_string(&self.entries)
            .map_err(|err| StorageError::Unavailable(format!("history encode failed: {err}")))?;
        self.storage.set(HISTORY_KEY, &encoded)
    }
}

/// Absent or corrupt data loads as empty; only a failed read is an error.
fn load_persisted<S: KeyValueStore>(storage: &S) -> Result<VecDeque<HistoryEntry>, StorageError> {
    let Some(raw) = storage.get(HISTORY_KEY)? else {
        return Ok(VecDeque::new());
    };

    match serde_json::from_str::<VecDeque<HistoryEntry>>(&raw) {
        Ok(mut entries) => {
            entries.truncate(HISTORY_CAPACITY);
            Ok(entries)
        }
        Err(err) => {
            warn!(error = %err, "persisted history corrupt, starting empty");
            Ok(VecDeque::new())
        }
    }
}
