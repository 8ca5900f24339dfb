// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! The wallet aggregate record.
//!
//! One wallet per deployment, stored under the fixed key `ALL` in the
//! `wallet` table rather than as process-global state, so a multi-tenant
//! host could key independent instances differently.

use serde::{Deserialize, Serialize};

use crate::error::{WalletError, WalletResult};
use crate::ledger::{Ledger, Table};

/// Well-known storage key of the singleton aggregate.
pub const WALLET_RECORD_KEY: &str = "ALL";

/// Membership roster and key inventory for one deployment.
///
/// Both lists hold back-references by identifier; the referenced `User`
/// and `Key` records are persisted independently. Order is insertion
/// order and carries no meaning beyond display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wallet {
    /// Display label, set once at creation.
    pub name: String,
    /// Registered identity strings, unique.
    pub users: Vec<String>,
    /// Live key identifiers, unique, each backed by a key record.
    pub keys: Vec<String>,
}

impl Wallet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            users: Vec::new(),
            keys: Vec::new(),
        }
    }

    /// Append a user id to the roster. Returns false if already present.
    pub(crate) fn add_user_id(&mut self, user_id: &str) -> bool {
        if self.users.iter().any(|id| id == user_id) {
            return false;
        }
        self.users.push(user_id.to_string());
        true
    }

    /// Remove a user id from the roster. Returns false if absent.
    pub(crate) fn remove_user_id(&mut self, user_id: &str) -> bool {
        match self.users.iter().position(|id| id == user_id) {
            Some(index) => {
                self.users.remove(index);
                true
            }
            None => false,
        }
    }

    /// Append a key id to the inventory. Returns false if already present.
    pub(crate) fn add_key_id(&mut self, key_id: &str) -> bool {
        if self.keys.iter().any(|id| id == key_id) {
            return false;
        }
        self.keys.push(key_id.to_string());
        true
    }

    /// Remove a key id from the inventory. Returns false if absent.
    pub(crate) fn remove_key_id(&mut self, key_id: &str) -> bool {
        match self.keys.iter().position(|id| id == key_id) {
            Some(index) => {
                self.keys.remove(index);
                true
            }
            None => false,
        }
    }
}

/// Store for the singleton aggregate.
pub struct WalletStore<'a> {
    ledger: &'a dyn Ledger,
}

impl<'a> WalletStore<'a> {
    pub fn new(ledger: &'a dyn Ledger) -> Self {
        Self { ledger }
    }

    pub fn exists(&self) -> WalletResult<bool> {
        Ok(self.ledger.get(Table::Wallet, WALLET_RECORD_KEY)?.is_some())
    }

    pub fn get(&self) -> WalletResult<Option<Wallet>> {
        match self.ledger.get(Table::Wallet, WALLET_RECORD_KEY)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Load the aggregate, failing with `NotFound` if never initialized.
    pub fn load(&self) -> WalletResult<Wallet> {
        self.get()?
            .ok_or_else(|| WalletError::NotFound("wallet".to_string()))
    }

    pub fn put(&self, wallet: &Wallet) -> WalletResult<()> {
        let bytes = serde_json::to_vec(wallet)?;
        self.ledger.set(Table::Wallet, WALLET_RECORD_KEY, &bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::MemoryLedger;

    #[test]
    fn roster_rejects_duplicates_and_removes_first_match() {
        let mut wallet = Wallet::new("Acme");

        assert!(wallet.add_user_id("alice"));
        assert!(wallet.add_user_id("bob"));
        assert!(!wallet.add_user_id("alice"));
        assert_eq!(wallet.users, vec!["alice", "bob"]);

        assert!(wallet.remove_user_id("alice"));
        assert!(!wallet.remove_user_id("alice"));
        assert_eq!(wallet.users, vec!["bob"]);
    }

    #[test]
    fn inventory_rejects_duplicates() {
        let mut wallet = Wallet::new("Acme");

        assert!(wallet.add_key_id("k1"));
        assert!(!wallet.add_key_id("k1"));
        assert!(wallet.remove_key_id("k1"));
        assert!(!wallet.remove_key_id("k1"));
        assert!(wallet.keys.is_empty());
    }

    #[test]
    fn store_round_trips_the_singleton() {
        let ledger = MemoryLedger::new();
        let store = WalletStore::new(&ledger);

        assert!(!store.exists().unwrap());
        assert!(matches!(store.load(), Err(WalletError::NotFound(_))));

        let mut wallet = Wallet::new("Acme");
        wallet.add_user_id("alice");
        store.put(&wallet).unwrap();

        assert!(store.exists().unwrap());
        assert_eq!(store.load().unwrap(), wallet);
    }
}
