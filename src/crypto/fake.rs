// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Deterministic crypto provider for tests.
//!
//! Produces repeatable identifiers, "signatures", and "ciphertext" with no
//! real cryptography, and records every call so tests can assert exactly
//! which provider operations ran (e.g. none on a type mismatch).

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{CryptoProvider, ProviderError, ProviderResult};
use crate::wallet::key::KeyType;

const SIGNATURE_PREFIX: &[u8] = b"fakesig:";

/// Deterministic [`CryptoProvider`] with a call recorder.
#[derive(Default)]
pub struct FakeProvider {
    keys: Mutex<HashMap<String, KeyType>>,
    calls: Mutex<Vec<String>>,
    counter: AtomicU64,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn keys(&self) -> MutexGuard<'_, HashMap<String, KeyType>> {
        self.keys.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, call: String) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }

    /// Every provider call made so far, in order, as `"operation key_id"`.
    pub fn calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Total number of provider calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn require_type(&self, key_id: &str, required: KeyType, op: &str) -> ProviderResult<()> {
        match self.keys().get(key_id) {
            Some(kt) if *kt == required => Ok(()),
            Some(_) => Err(match required {
                KeyType::Ecdsa => ProviderError::Signing(format!(
                    "key material for `{key_id}` is not ECDSA ({op})"
                )),
                KeyType::Aes => ProviderError::Encryption(format!(
                    "key material for `{key_id}` is not AES ({op})"
                )),
            }),
            None => Err(ProviderError::UnknownKey(key_id.to_string())),
        }
    }

    fn keystream_byte(key_id: &str) -> u8 {
        key_id.bytes().fold(0x5au8, u8::wrapping_add)
    }
}

impl CryptoProvider for FakeProvider {
    fn generate_key(&self, key_id: &str, key_type: KeyType) -> ProviderResult<()> {
        self.record(format!("generate_key {key_id}"));
        let mut keys = self.keys();
        if keys.contains_key(key_id) {
            return Err(ProviderError::Generation(format!(
                "key material already exists for `{key_id}`"
            )));
        }
        keys.insert(key_id.to_string(), key_type);
        Ok(())
    }

    fn destroy_key(&self, key_id: &str) -> ProviderResult<()> {
        self.record(format!("destroy_key {key_id}"));
        match self.keys().remove(key_id) {
            Some(_) => Ok(()),
            None => Err(ProviderError::UnknownKey(key_id.to_string())),
        }
    }

    fn sign(&self, key_id: &str, message: &[u8]) -> ProviderResult<Vec<u8>> {
        self.record(format!("sign {key_id}"));
        self.require_type(key_id, KeyType::Ecdsa, "sign")?;

        let mut signature = SIGNATURE_PREFIX.to_vec();
        signature.extend_from_slice(key_id.as_bytes());
        signature.push(b':');
        signature.extend_from_slice(message);
        Ok(signature)
    }

    fn verify(&self, key_id: &str, message: &[u8], signature: &[u8]) -> ProviderResult<bool> {
        self.record(format!("verify {key_id}"));
        self.require_type(key_id, KeyType::Ecdsa, "verify")?;

        let mut expected = SIGNATURE_PREFIX.to_vec();
        expected.extend_from_slice(key_id.as_bytes());
        expected.push(b':');
        expected.extend_from_slice(message);
        Ok(signature == expected)
    }

    fn encrypt(&self, key_id: &str, plaintext: &[u8]) -> ProviderResult<Vec<u8>> {
        self.record(format!("encrypt {key_id}"));
        self.require_type(key_id, KeyType::Aes, "encrypt")?;

        let pad = Self::keystream_byte(key_id);
        Ok(plaintext.iter().map(|b| b ^ pad).collect())
    }

    fn decrypt(&self, key_id: &str, ciphertext: &[u8]) -> ProviderResult<Vec<u8>> {
        self.record(format!("decrypt {key_id}"));
        self.require_type(key_id, KeyType::Aes, "decrypt")?;

        let pad = Self::keystream_byte(key_id);
        Ok(ciphertext.iter().map(|b| b ^ pad).collect())
    }

    fn random_bytes(&self, n: usize) -> ProviderResult<Vec<u8>> {
        self.record(format!("random_bytes {n}"));
        let seed = self.counter.fetch_add(1, Ordering::SeqCst);
        Ok(seed
            .to_be_bytes()
            .iter()
            .copied()
            .cycle()
            .take(n)
            .collect())
    }
}
