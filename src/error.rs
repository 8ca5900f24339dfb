// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Error taxonomy for wallet operations.
//!
//! Every operation returns a discriminated [`WalletResult`] rather than
//! aborting: the boundary layer that wires this core into a transport is
//! responsible for mapping failures to its own signals.

use crate::crypto::ProviderError;
use crate::ledger::LedgerError;
use crate::wallet::key::KeyType;

#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    /// The wallet or a user with this identity already exists.
    #[error("{0} already exists")]
    AlreadyExists(String),

    /// The wallet, user, or key does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// The caller failed an authorization predicate.
    ///
    /// Predicates fail closed: a missing user record and a storage failure
    /// during the check both land here, never in a separate "check skipped"
    /// state.
    #[error("caller `{caller}` is not allowed to {action}")]
    Unauthorized {
        caller: String,
        action: &'static str,
    },

    /// The operation is not legal for this key's type.
    #[error("key type is {actual}, operation requires {required}")]
    TypeMismatch { required: KeyType, actual: KeyType },

    /// A request field failed validation (e.g. an unsupported key type).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The external crypto provider reported a failure.
    #[error("crypto provider failure: {0}")]
    Provider(#[from] ProviderError),

    /// The persistent keyed store reported a failure.
    #[error("storage failure: {0}")]
    Storage(#[from] LedgerError),

    /// A persisted record failed to round-trip through serialization.
    #[error("serialization failure: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type WalletResult<T> = Result<T, WalletError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_are_stable() {
        let err = WalletError::AlreadyExists("wallet".into());
        assert_eq!(err.to_string(), "wallet already exists");

        let err = WalletError::NotFound("key `abc`".into());
        assert_eq!(err.to_string(), "key `abc` not found");

        let err = WalletError::Unauthorized {
            caller: "mallory".into(),
            action: "remove a user",
        };
        assert_eq!(
            err.to_string(),
            "caller `mallory` is not allowed to remove a user"
        );

        let err = WalletError::TypeMismatch {
            required: KeyType::Ecdsa,
            actual: KeyType::Aes,
        };
        assert_eq!(err.to_string(), "key type is AES, operation requires ECDSA");
    }
}
