// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Key metadata and the key registry.
//!
//! A key record holds metadata only; the material itself lives with the
//! crypto provider under the same identifier. A key is either fully
//! created (material generated, record persisted) or absent; operations
//! on an absent key fail with `NotFound` rather than silently no-op.

use serde::{Deserialize, Serialize};

use crate::codec;
use crate::crypto::CryptoProvider;
use crate::error::{WalletError, WalletResult};
use crate::ledger::{Ledger, Table};

/// Random bytes drawn for a fresh key identifier.
const KEY_ID_BYTES: usize = 32;

/// Supported key types. Determines which operations are legal on a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyType {
    /// Signing key: `sign` / `verify`.
    #[serde(rename = "ECDSA")]
    Ecdsa,
    /// Symmetric key: `encrypt` / `decrypt`.
    #[serde(rename = "AES")]
    Aes,
}

impl KeyType {
    /// Parse a key type from its wire form.
    pub fn parse(s: &str) -> WalletResult<KeyType> {
        match s {
            "ECDSA" => Ok(KeyType::Ecdsa),
            "AES" => Ok(KeyType::Aes),
            other => Err(WalletError::InvalidArgument(format!(
                "unsupported key type `{other}`"
            ))),
        }
    }
}

impl std::fmt::Display for KeyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyType::Ecdsa => write!(f, "ECDSA"),
            KeyType::Aes => write!(f, "AES"),
        }
    }
}

/// Key metadata persisted in the `keys` table. Never contains material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Key {
    /// Opaque identifier, base64url over provider randomness.
    pub id: String,
    /// Free-form label, immutable after creation.
    pub description: String,
    #[serde(rename = "type")]
    pub key_type: KeyType,
    /// Identity of the creator. Display/filter only, not an authorization
    /// boundary: any registered user may use any key in the wallet.
    pub owner: String,
}

impl Key {
    fn require_type(&self, required: KeyType) -> WalletResult<()> {
        if self.key_type == required {
            Ok(())
        } else {
            Err(WalletError::TypeMismatch {
                required,
                actual: self.key_type,
            })
        }
    }
}

/// Registry over persisted key records, delegating crypto to the provider.
pub struct KeyRegistry<'a> {
    ledger: &'a dyn Ledger,
    provider: &'a dyn CryptoProvider,
}

impl<'a> KeyRegistry<'a> {
    pub fn new(ledger: &'a dyn Ledger, provider: &'a dyn CryptoProvider) -> Self {
        Self { ledger, provider }
    }

    pub fn get(&self, key_id: &str) -> WalletResult<Option<Key>> {
        match self.ledger.get(Table::Keys, key_id)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Load a key record, failing with `NotFound` if absent.
    pub fn load(&self, key_id: &str) -> WalletResult<Key> {
        self.get(key_id)?
            .ok_or_else(|| WalletError::NotFound(format!("key `{key_id}`")))
    }

    /// Create a fresh key: random identifier, provider-generated material,
    /// then the persisted record.
    ///
    /// Material is generated before the record is written, so a provider
    /// failure leaves nothing behind; if the record write itself fails the
    /// material is destroyed again rather than left orphaned.
    pub fn create(
        &self,
        description: &str,
        key_type: KeyType,
        owner: &str,
    ) -> WalletResult<Key> {
        let id = codec::encode_id(&self.provider.random_bytes(KEY_ID_BYTES)?);
        self.provider.generate_key(&id, key_type)?;

        let key = Key {
            id,
            description: description.to_string(),
            key_type,
            owner: owner.to_string(),
        };

        if let Err(e) = self.persist(&key) {
            if let Err(destroy_err) = self.provider.destroy_key(&key.id) {
                tracing::warn!(
                    key_id = %key.id,
                    error = %destroy_err,
                    "failed to roll back key material after persist failure"
                );
            }
            return Err(e);
        }

        tracing::info!(key_id = %key.id, key_type = %key.key_type, owner, "key created");
        Ok(key)
    }

    fn persist(&self, key: &Key) -> WalletResult<()> {
        let bytes = serde_json::to_vec(key)?;
        self.ledger.set(Table::Keys, &key.id, &bytes)?;
        Ok(())
    }

    /// Sign `message` with an ECDSA key. The signature transits as base64.
    pub fn sign(&self, key: &Key, message: &str) -> WalletResult<String> {
        key.require_type(KeyType::Ecdsa)?;
        let signature = self.provider.sign(&key.id, message.as_bytes())?;
        Ok(codec::encode(&signature))
    }

    /// Verify a base64 signature over `message` with an ECDSA key.
    pub fn verify(&self, key: &Key, message: &str, signature: &str) -> WalletResult<bool> {
        key.require_type(KeyType::Ecdsa)?;
        let raw = codec::decode(signature)?;
        Ok(self.provider.verify(&key.id, message.as_bytes(), &raw)?)
    }

    /// Encrypt `message` with an AES key. The ciphertext transits as base64.
    pub fn encrypt(&self, key: &Key, message: &str) -> WalletResult<String> {
        key.require_type(KeyType::Aes)?;
        let ciphertext = self.provider.encrypt(&key.id, message.as_bytes())?;
        Ok(codec::encode(&ciphertext))
    }

    /// Decrypt base64 ciphertext with an AES key.
    pub fn decrypt(&self, key: &Key, ciphertext: &str) -> WalletResult<String> {
        key.require_type(KeyType::Aes)?;
        let raw = codec::decode(ciphertext)?;
        let plaintext = self.provider.decrypt(&key.id, &raw)?;
        String::from_utf8(plaintext).map_err(|_| {
            WalletError::InvalidArgument("decrypted payload is not valid UTF-8".to_string())
        })
    }

    /// Destroy the provider-side material and unset the record.
    ///
    /// Does not touch the wallet inventory; detaching the identifier there
    /// is the caller's responsibility and happens before this runs.
    pub fn delete(&self, key: &Key) -> WalletResult<()> {
        self.provider.destroy_key(&key.id)?;
        self.ledger.unset(Table::Keys, &key.id)?;
        tracing::info!(key_id = %key.id, "key deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{FakeProvider, SoftwareProvider};
    use crate::ledger::MemoryLedger;

    #[test]
    fn parse_accepts_supported_types_only() {
        assert_eq!(KeyType::parse("ECDSA").unwrap(), KeyType::Ecdsa);
        assert_eq!(KeyType::parse("AES").unwrap(), KeyType::Aes);
        assert!(matches!(
            KeyType::parse("RSA"),
            Err(WalletError::InvalidArgument(_))
        ));
        // Wire form is exact; no case folding
        assert!(KeyType::parse("aes").is_err());
    }

    #[test]
    fn key_record_serializes_with_wire_type_names() {
        let key = Key {
            id: "abc".into(),
            description: "payments".into(),
            key_type: KeyType::Ecdsa,
            owner: "bob".into(),
        };
        let json = serde_json::to_string(&key).unwrap();
        assert!(json.contains(r#""type":"ECDSA""#));

        let back: Key = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }

    #[test]
    fn create_generates_unique_ids_and_persists() {
        let ledger = MemoryLedger::new();
        let provider = FakeProvider::new();
        let registry = KeyRegistry::new(&ledger, &provider);

        let first = registry.create("payments", KeyType::Ecdsa, "bob").unwrap();
        let second = registry.create("backup", KeyType::Aes, "bob").unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(registry.load(&first.id).unwrap(), first);
        assert_eq!(registry.load(&second.id).unwrap(), second);
    }

    #[test]
    fn load_missing_key_is_not_found() {
        let ledger = MemoryLedger::new();
        let provider = FakeProvider::new();
        let registry = KeyRegistry::new(&ledger, &provider);

        assert!(matches!(
            registry.load("ghost"),
            Err(WalletError::NotFound(_))
        ));
    }

    #[test]
    fn type_mismatch_fails_before_any_provider_call() {
        let ledger = MemoryLedger::new();
        let provider = FakeProvider::new();
        let registry = KeyRegistry::new(&ledger, &provider);

        let aes = registry.create("storage", KeyType::Aes, "bob").unwrap();
        let ecdsa = registry.create("payments", KeyType::Ecdsa, "bob").unwrap();
        let calls_after_create = provider.call_count();

        assert!(matches!(
            registry.sign(&aes, "msg"),
            Err(WalletError::TypeMismatch { .. })
        ));
        assert!(matches!(
            registry.verify(&aes, "msg", "c2ln"),
            Err(WalletError::TypeMismatch { .. })
        ));
        assert!(matches!(
            registry.encrypt(&ecdsa, "msg"),
            Err(WalletError::TypeMismatch { .. })
        ));
        assert!(matches!(
            registry.decrypt(&ecdsa, "c2ln"),
            Err(WalletError::TypeMismatch { .. })
        ));

        assert_eq!(provider.call_count(), calls_after_create);
    }

    #[test]
    fn sign_verify_round_trip_with_real_crypto() {
        let ledger = MemoryLedger::new();
        let provider = SoftwareProvider::new();
        let registry = KeyRegistry::new(&ledger, &provider);

        let key = registry.create("payments", KeyType::Ecdsa, "bob").unwrap();
        let signature = registry.sign(&key, "pay 10").unwrap();

        assert!(registry.verify(&key, "pay 10", &signature).unwrap());
        assert!(!registry.verify(&key, "pay 11", &signature).unwrap());
    }

    #[test]
    fn encrypt_decrypt_round_trip_with_real_crypto() {
        let ledger = MemoryLedger::new();
        let provider = SoftwareProvider::new();
        let registry = KeyRegistry::new(&ledger, &provider);

        let key = registry.create("storage", KeyType::Aes, "bob").unwrap();
        for message in ["", "pay 10", "crédit ünïcode 🗝"] {
            let ciphertext = registry.encrypt(&key, message).unwrap();
            assert_eq!(registry.decrypt(&key, &ciphertext).unwrap(), message);
        }
    }

    #[test]
    fn delete_removes_record_and_material() {
        let ledger = MemoryLedger::new();
        let provider = FakeProvider::new();
        let registry = KeyRegistry::new(&ledger, &provider);

        let key = registry.create("payments", KeyType::Ecdsa, "bob").unwrap();
        registry.delete(&key).unwrap();

        assert!(registry.get(&key.id).unwrap().is_none());
        assert!(registry.sign(&key, "msg").is_err());
    }
}
