// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration Constants
//!
//! Configuration is read from the environment by the embedding host.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `DATA_DIR` | Root directory for durable storage | `/data` |

use std::env;
use std::path::PathBuf;

/// Environment variable name for the durable data directory path.
///
/// Inside an enclave deployment this directory is the host's encrypted
/// mount point; the core treats it as ordinary filesystem space.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

/// Default data directory when `DATA_DIR` is unset.
pub const DEFAULT_DATA_DIR: &str = "/data";

/// File name of the embedded ledger database inside the data directory.
pub const LEDGER_FILE: &str = "wallet.redb";

/// Resolve the path of the ledger database from the environment.
pub fn ledger_path() -> PathBuf {
    let data_dir = env::var(DATA_DIR_ENV).unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string());
    PathBuf::from(data_dir).join(LEDGER_FILE)
}
