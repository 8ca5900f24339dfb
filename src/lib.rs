// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Enclave Wallet - Custodial Key-Management Core
//!
//! This crate provides the access-control and entity-lifecycle core of a
//! custodial wallet running inside a secure-execution host. The host
//! authenticates callers and isolates invocations; this core decides who
//! may create, use, or delete keys, and keeps all state durable.
//!
//! ## Modules
//!
//! - `service` - the wallet operation surface and authorization policy
//! - `wallet` - wallet aggregate, user, and key entities
//! - `crypto` - host-delegated cryptographic provider interface
//! - `ledger` - durable keyed storage (redb-backed)
//! - `audit` - append-only log of security-sensitive operations
//! - `context` - caller identity resolution
//! - `codec` - base64 transcoding for signatures and ciphertext

pub mod audit;
pub mod codec;
pub mod config;
pub mod context;
pub mod crypto;
pub mod error;
pub mod ledger;
pub mod service;
pub mod wallet;

pub use context::{ExecutionContext, StaticContext};
pub use crypto::{CryptoProvider, FakeProvider, SoftwareProvider};
pub use error::{WalletError, WalletResult};
pub use ledger::{Ledger, MemoryLedger, RedbLedger};
pub use service::WalletService;
pub use wallet::{Key, KeyType, Role, User, Wallet};
