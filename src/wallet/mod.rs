// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet domain: the singleton aggregate, its membership roster, and the
//! key inventory.
//!
//! - `wallet` - the aggregate record and its store
//! - `user` - identity + role records
//! - `key` - key metadata and the registry delegating to the crypto provider

pub mod key;
pub mod user;
#[allow(clippy::module_inception)]
pub mod wallet;

pub use key::{Key, KeyRegistry, KeyType};
pub use user::{Role, User, UserStore};
pub use wallet::{Wallet, WalletStore};
