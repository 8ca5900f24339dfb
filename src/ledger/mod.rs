// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Persistent keyed store.
//!
//! The host guarantees per-invocation isolation, so the core never locks:
//! every operation reads full current state, mutates in memory, and writes
//! the new state back through this interface.
//!
//! ## Logical Tables
//!
//! - `wallet`: fixed key `ALL` → the singleton wallet aggregate
//! - `users`: user id → user record
//! - `keys`: key id → key metadata record
//! - `audit`: sequence key → audit event
//!
//! Values are opaque serialized records; callers own the serialization.

pub mod memory;
pub mod redb_ledger;

pub use memory::MemoryLedger;
pub use redb_ledger::RedbLedger;

/// Logical tables in the keyed store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Wallet,
    Users,
    Keys,
    Audit,
}

impl Table {
    pub(crate) fn name(self) -> &'static str {
        match self {
            Table::Wallet => "wallet",
            Table::Users => "users",
            Table::Keys => "keys",
            Table::Audit => "audit",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("redb database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    Commit(#[from] redb::CommitError),
}

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Durable get/set/unset per logical table.
pub trait Ledger: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, table: Table, key: &str) -> LedgerResult<Option<Vec<u8>>>;

    /// Insert or replace the value stored under `key`.
    fn set(&self, table: Table, key: &str, value: &[u8]) -> LedgerResult<()>;

    /// Remove the value stored under `key`. Removing an absent key is a no-op.
    fn unset(&self, table: Table, key: &str) -> LedgerResult<()>;
}
