// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Durable ledger backed by redb (pure Rust, ACID).
//!
//! One table per logical [`Table`]; every `set`/`unset` commits its own
//! write transaction, matching the one-operation-one-commit model the
//! host's isolation guarantee assumes.

use std::path::Path;

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};

use super::{Ledger, LedgerResult, Table};

const WALLET: TableDefinition<&str, &[u8]> = TableDefinition::new("wallet");
const USERS: TableDefinition<&str, &[u8]> = TableDefinition::new("users");
const KEYS: TableDefinition<&str, &[u8]> = TableDefinition::new("keys");
const AUDIT: TableDefinition<&str, &[u8]> = TableDefinition::new("audit");

fn definition(table: Table) -> TableDefinition<'static, &'static str, &'static [u8]> {
    match table {
        Table::Wallet => WALLET,
        Table::Users => USERS,
        Table::Keys => KEYS,
        Table::Audit => AUDIT,
    }
}

/// Embedded ACID keyed store.
pub struct RedbLedger {
    db: Database,
}

impl RedbLedger {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> LedgerResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(WALLET)?;
            let _ = write_txn.open_table(USERS)?;
            let _ = write_txn.open_table(KEYS)?;
            let _ = write_txn.open_table(AUDIT)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }
}

impl Ledger for RedbLedger {
    fn get(&self, table: Table, key: &str) -> LedgerResult<Option<Vec<u8>>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(definition(table))?;
        match table.get(key)? {
            Some(value) => Ok(Some(value.value().to_vec())),
            None => Ok(None),
        }
    }

    fn set(&self, table: Table, key: &str, value: &[u8]) -> LedgerResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(definition(table))?;
            table.insert(key, value)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn unset(&self, table: Table, key: &str) -> LedgerResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(definition(table))?;
            table.remove(key)?;
        }
        write_txn.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_ledger() -> (RedbLedger, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let ledger = RedbLedger::open(&dir.path().join("test.redb")).unwrap();
        (ledger, dir)
    }

    #[test]
    fn set_get_unset_round_trip() {
        let (ledger, _dir) = temp_ledger();

        assert_eq!(ledger.get(Table::Keys, "k1").unwrap(), None);

        ledger.set(Table::Keys, "k1", b"payload").unwrap();
        assert_eq!(
            ledger.get(Table::Keys, "k1").unwrap(),
            Some(b"payload".to_vec())
        );

        ledger.unset(Table::Keys, "k1").unwrap();
        assert_eq!(ledger.get(Table::Keys, "k1").unwrap(), None);
    }

    #[test]
    fn tables_are_isolated() {
        let (ledger, _dir) = temp_ledger();

        ledger.set(Table::Users, "id", b"user").unwrap();
        ledger.set(Table::Keys, "id", b"key").unwrap();

        assert_eq!(ledger.get(Table::Users, "id").unwrap(), Some(b"user".to_vec()));
        assert_eq!(ledger.get(Table::Keys, "id").unwrap(), Some(b"key".to_vec()));
        assert_eq!(ledger.get(Table::Wallet, "id").unwrap(), None);
    }

    #[test]
    fn set_replaces_existing_value() {
        let (ledger, _dir) = temp_ledger();

        ledger.set(Table::Wallet, "ALL", b"v1").unwrap();
        ledger.set(Table::Wallet, "ALL", b"v2").unwrap();
        assert_eq!(
            ledger.get(Table::Wallet, "ALL").unwrap(),
            Some(b"v2".to_vec())
        );
    }

    #[test]
    fn unset_missing_key_is_noop() {
        let (ledger, _dir) = temp_ledger();
        ledger.unset(Table::Audit, "missing").unwrap();
    }

    #[test]
    fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("persist.redb");

        {
            let ledger = RedbLedger::open(&path).unwrap();
            ledger.set(Table::Wallet, "ALL", b"durable").unwrap();
        }

        let reopened = RedbLedger::open(&path).unwrap();
        assert_eq!(
            reopened.get(Table::Wallet, "ALL").unwrap(),
            Some(b"durable".to_vec())
        );
    }
}
