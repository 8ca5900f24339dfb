// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory ledger for unit tests and host-free embedding.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{Ledger, LedgerResult, Table};

/// Volatile keyed store with the same contract as [`super::RedbLedger`].
#[derive(Default)]
pub struct MemoryLedger {
    tables: Mutex<HashMap<Table, BTreeMap<String, Vec<u8>>>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Table, BTreeMap<String, Vec<u8>>>> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of entries in a logical table.
    pub fn len(&self, table: Table) -> usize {
        self.lock().get(&table).map_or(0, |entries| entries.len())
    }

    /// True if the logical table holds no entries.
    pub fn is_empty(&self, table: Table) -> bool {
        self.len(table) == 0
    }
}

impl Ledger for MemoryLedger {
    fn get(&self, table: Table, key: &str) -> LedgerResult<Option<Vec<u8>>> {
        Ok(self
            .lock()
            .get(&table)
            .and_then(|entries| entries.get(key))
            .cloned())
    }

    fn set(&self, table: Table, key: &str, value: &[u8]) -> LedgerResult<()> {
        self.lock()
            .entry(table)
            .or_default()
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn unset(&self, table: Table, key: &str) -> LedgerResult<()> {
        if let Some(entries) = self.lock().get_mut(&table) {
            entries.remove(key);
        }
        Ok(())
    }
}
