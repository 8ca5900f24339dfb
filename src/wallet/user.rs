// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User records and roles.
//!
//! Plain keyed CRUD over the `users` table. No business rules live here;
//! all authorization logic belongs to the wallet service, which keeps this
//! store trivially testable in isolation.

use serde::{Deserialize, Serialize};

use crate::error::{WalletError, WalletResult};
use crate::ledger::{Ledger, Table};

/// User roles for authorization.
///
/// A closed two-variant set: anything that is not `Admin` carries no grant
/// beyond membership, so a third privilege state cannot exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// May manage the membership roster in addition to member operations.
    Admin,
    /// Registered member; may create and use keys.
    Member,
}

impl Role {
    /// Parse a role from its wire form (case-insensitive).
    ///
    /// `"user"` is accepted as a legacy spelling of [`Role::Member`].
    pub fn parse(s: &str) -> WalletResult<Role> {
        match s.to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "member" | "user" => Ok(Role::Member),
            other => Err(WalletError::InvalidArgument(format!(
                "unsupported role `{other}`"
            ))),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Member => write!(f, "member"),
        }
    }
}

/// A registered identity with its role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Caller identity string, unique in the `users` table.
    pub id: String,
    pub role: Role,
}

impl User {
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }
}

/// Keyed CRUD over persisted user records.
pub struct UserStore<'a> {
    ledger: &'a dyn Ledger,
}

impl<'a> UserStore<'a> {
    pub fn new(ledger: &'a dyn Ledger) -> Self {
        Self { ledger }
    }

    pub fn exists(&self, user_id: &str) -> WalletResult<bool> {
        Ok(self.ledger.get(Table::Users, user_id)?.is_some())
    }

    pub fn get(&self, user_id: &str) -> WalletResult<Option<User>> {
        match self.ledger.get(Table::Users, user_id)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    pub fn put(&self, user: &User) -> WalletResult<()> {
        let bytes = serde_json::to_vec(user)?;
        self.ledger.set(Table::Users, &user.id, &bytes)?;
        Ok(())
    }

    pub fn delete(&self, user_id: &str) -> WalletResult<()> {
        if !self.exists(user_id)? {
            return Err(WalletError::NotFound(format!("user `{user_id}`")));
        }
        self.ledger.unset(Table::Users, user_id)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::MemoryLedger;

    #[test]
    fn parse_accepts_known_roles() {
        assert_eq!(Role::parse("admin").unwrap(), Role::Admin);
        assert_eq!(Role::parse("ADMIN").unwrap(), Role::Admin);
        assert_eq!(Role::parse("member").unwrap(), Role::Member);
        assert_eq!(Role::parse("user").unwrap(), Role::Member);
    }

    #[test]
    fn parse_rejects_unknown_roles() {
        assert!(matches!(
            Role::parse("superuser"),
            Err(WalletError::InvalidArgument(_))
        ));
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), r#""admin""#);
        assert_eq!(serde_json::to_string(&Role::Member).unwrap(), r#""member""#);
    }

    #[test]
    fn store_crud_round_trip() {
        let ledger = MemoryLedger::new();
        let store = UserStore::new(&ledger);

        assert!(!store.exists("alice").unwrap());
        assert_eq!(store.get("alice").unwrap(), None);

        let alice = User::new("alice", Role::Admin);
        store.put(&alice).unwrap();

        assert!(store.exists("alice").unwrap());
        assert_eq!(store.get("alice").unwrap(), Some(alice));

        store.delete("alice").unwrap();
        assert!(!store.exists("alice").unwrap());
    }

    #[test]
    fn delete_missing_user_is_not_found() {
        let ledger = MemoryLedger::new();
        let store = UserStore::new(&ledger);

        assert!(matches!(
            store.delete("ghost"),
            Err(WalletError::NotFound(_))
        ));
    }
}
