// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Host-delegated cryptography.
//!
//! The wallet core never touches key material: randomness, key generation,
//! and all cryptographic operations go through [`CryptoProvider`]. Two
//! variants ship with the crate:
//!
//! - [`SoftwareProvider`] - real crypto (k256 ECDSA, AES-256-GCM), key
//!   material held in process; stands in for the enclave host's provider.
//! - [`FakeProvider`] - deterministic, records every call; used by tests
//!   that assert which provider operations ran.

pub mod fake;
pub mod software;

pub use fake::FakeProvider;
pub use software::SoftwareProvider;

use crate::wallet::key::KeyType;

/// A provider failure. Always typed, never silent empty output.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("no key material for `{0}`")]
    UnknownKey(String),

    #[error("key generation failed: {0}")]
    Generation(String),

    #[error("signing failed: {0}")]
    Signing(String),

    #[error("encryption failed: {0}")]
    Encryption(String),

    #[error("decryption failed: {0}")]
    Decryption(String),

    #[error("randomness source failed: {0}")]
    Randomness(String),
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Cryptographic capability interface provided by the host.
pub trait CryptoProvider: Send + Sync {
    /// Generate key material of the given type under `key_id`.
    fn generate_key(&self, key_id: &str, key_type: KeyType) -> ProviderResult<()>;

    /// Destroy the key material held under `key_id`.
    fn destroy_key(&self, key_id: &str) -> ProviderResult<()>;

    /// Sign `message` with the ECDSA key under `key_id`.
    fn sign(&self, key_id: &str, message: &[u8]) -> ProviderResult<Vec<u8>>;

    /// Verify `signature` over `message` with the ECDSA key under `key_id`.
    fn verify(&self, key_id: &str, message: &[u8], signature: &[u8]) -> ProviderResult<bool>;

    /// Encrypt `plaintext` with the AES key under `key_id`.
    fn encrypt(&self, key_id: &str, plaintext: &[u8]) -> ProviderResult<Vec<u8>>;

    /// Decrypt `ciphertext` with the AES key under `key_id`.
    fn decrypt(&self, key_id: &str, ciphertext: &[u8]) -> ProviderResult<Vec<u8>>;

    /// Produce `n` cryptographically strong random bytes.
    fn random_bytes(&self, n: usize) -> ProviderResult<Vec<u8>>;
}
