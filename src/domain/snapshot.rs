//! Immutable redirect table produced by one load operation.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::domain::entities::Redirect;

/// One complete, immutable mapping from source key to destination.
///
/// A snapshot is built off to the side by a reload and published whole. Once
/// published it is never mutated; a newer snapshot replaces it.
#[derive(Debug, Clone)]
pub struct Snapshot {
    entries: HashMap<String, String>,
    loaded_at: DateTime<Utc>,
}

impl Snapshot {
    /// Builds a snapshot from rows in arrival order.
    ///
    /// Duplicate source keys are resolved last-write-wins.
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = Redirect>,
    {
        let entries = rows
            .into_iter()
            .map(|r| (r.source, r.destination))
            .collect();

        Self {
            entries,
            loaded_at: Utc::now(),
        }
    }

    /// Returns the destination for `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// When the rows backing this snapshot were loaded.
    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}
