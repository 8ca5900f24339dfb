// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-process crypto provider with real algorithms.
//!
//! ECDSA uses secp256k1 via k256; symmetric encryption uses AES-256-GCM
//! with a random 96-bit nonce prefixed to the ciphertext. Key material
//! lives in process memory only; in production the enclave host supplies
//! its own provider and this one backs integration tests and local runs.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce};
use k256::ecdsa::signature::{Signer, Verifier};
use k256::ecdsa::{Signature, SigningKey};
use rand::rngs::OsRng;
use rand::RngCore;

use super::{CryptoProvider, ProviderError, ProviderResult};
use crate::wallet::key::KeyType;

/// AES-GCM nonce length in bytes.
const NONCE_LENGTH: usize = 12;

enum KeyMaterial {
    Ecdsa(SigningKey),
    Aes([u8; 32]),
}

/// Software-backed [`CryptoProvider`].
#[derive(Default)]
pub struct SoftwareProvider {
    keys: Mutex<HashMap<String, KeyMaterial>>,
}

impl SoftwareProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, KeyMaterial>> {
        self.keys.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CryptoProvider for SoftwareProvider {
    fn generate_key(&self, key_id: &str, key_type: KeyType) -> ProviderResult<()> {
        let mut keys = self.lock();
        if keys.contains_key(key_id) {
            return Err(ProviderError::Generation(format!(
                "key material already exists for `{key_id}`"
            )));
        }

        let material = match key_type {
            KeyType::Ecdsa => KeyMaterial::Ecdsa(SigningKey::random(&mut OsRng)),
            KeyType::Aes => {
                let mut secret = [0u8; 32];
                OsRng
                    .try_fill_bytes(&mut secret)
                    .map_err(|e| ProviderError::Randomness(e.to_string()))?;
                KeyMaterial::Aes(secret)
            }
        };

        keys.insert(key_id.to_string(), material);
        Ok(())
    }

    fn destroy_key(&self, key_id: &str) -> ProviderResult<()> {
        match self.lock().remove(key_id) {
            Some(_) => Ok(()),
            None => Err(ProviderError::UnknownKey(key_id.to_string())),
        }
    }

    fn sign(&self, key_id: &str, message: &[u8]) -> ProviderResult<Vec<u8>> {
        let keys = self.lock();
        match keys.get(key_id) {
            Some(KeyMaterial::Ecdsa(signing_key)) => {
                let signature: Signature = signing_key.sign(message);
                Ok(signature.to_vec())
            }
            Some(KeyMaterial::Aes(_)) => Err(ProviderError::Signing(format!(
                "key material for `{key_id}` is not ECDSA"
            ))),
            None => Err(ProviderError::UnknownKey(key_id.to_string())),
        }
    }

    fn verify(&self, key_id: &str, message: &[u8], signature: &[u8]) -> ProviderResult<bool> {
        let keys = self.lock();
        match keys.get(key_id) {
            Some(KeyMaterial::Ecdsa(signing_key)) => {
                let signature = match Signature::from_slice(signature) {
                    Ok(sig) => sig,
                    // Malformed encoding can never verify
                    Err(_) => return Ok(false),
                };
                Ok(signing_key.verifying_key().verify(message, &signature).is_ok())
            }
            Some(KeyMaterial::Aes(_)) => Err(ProviderError::Signing(format!(
                "key material for `{key_id}` is not ECDSA"
            ))),
            None => Err(ProviderError::UnknownKey(key_id.to_string())),
        }
    }

    fn encrypt(&self, key_id: &str, plaintext: &[u8]) -> ProviderResult<Vec<u8>> {
        let keys = self.lock();
        let secret = match keys.get(key_id) {
            Some(KeyMaterial::Aes(secret)) => secret,
            Some(KeyMaterial::Ecdsa(_)) => {
                return Err(ProviderError::Encryption(format!(
                    "key material for `{key_id}` is not AES"
                )))
            }
            None => return Err(ProviderError::UnknownKey(key_id.to_string())),
        };

        let cipher = Aes256Gcm::new_from_slice(secret)
            .map_err(|e| ProviderError::Encryption(format!("invalid key length: {e}")))?;

        let mut nonce_bytes = [0u8; NONCE_LENGTH];
        OsRng
            .try_fill_bytes(&mut nonce_bytes)
            .map_err(|e| ProviderError::Randomness(e.to_string()))?;

        let ciphertext = cipher
            .encrypt(Nonce::from_slice(&nonce_bytes), plaintext)
            .map_err(|e| ProviderError::Encryption(e.to_string()))?;

        // Output format: [nonce (12 bytes)][ciphertext + tag]
        let mut output = Vec::with_capacity(NONCE_LENGTH + ciphertext.len());
        output.extend_from_slice(&nonce_bytes);
        output.extend_from_slice(&ciphertext);
        Ok(output)
    }

    fn decrypt(&self, key_id: &str, ciphertext: &[u8]) -> ProviderResult<Vec<u8>> {
        let keys = self.lock();
        let secret = match keys.get(key_id) {
            Some(KeyMaterial::Aes(secret)) => secret,
            Some(KeyMaterial::Ecdsa(_)) => {
                return Err(ProviderError::Decryption(format!(
                    "key material for `{key_id}` is not AES"
                )))
            }
            None => return Err(ProviderError::UnknownKey(key_id.to_string())),
        };

        if ciphertext.len() < NONCE_LENGTH {
            return Err(ProviderError::Decryption(
                "ciphertext shorter than nonce".to_string(),
            ));
        }
        let (nonce_bytes, payload) = ciphertext.split_at(NONCE_LENGTH);

        let cipher = Aes256Gcm::new_from_slice(secret)
            .map_err(|e| ProviderError::Decryption(format!("invalid key length: {e}")))?;

        cipher
            .decrypt(Nonce::from_slice(nonce_bytes), payload)
            .map_err(|e| ProviderError::Decryption(e.to_string()))
    }

    fn random_bytes(&self, n: usize) -> ProviderResult<Vec<u8>> {
        let mut bytes = vec![0u8; n];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| ProviderError::Randomness(e.to_string()))?;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ecdsa_sign_verify_round_trip() {
        let provider = SoftwareProvider::new();
        provider.generate_key("k1", KeyType::Ecdsa).unwrap();

        let signature = provider.sign("k1", b"pay 10").unwrap();
        assert!(provider.verify("k1", b"pay 10", &signature).unwrap());
        assert!(!provider.verify("k1", b"pay 11", &signature).unwrap());
    }

    #[test]
    fn malformed_signature_fails_verification() {
        let provider = SoftwareProvider::new();
        provider.generate_key("k1", KeyType::Ecdsa).unwrap();

        assert!(!provider.verify("k1", b"msg", b"not a signature").unwrap());
    }

    #[test]
    fn aes_encrypt_decrypt_round_trip() {
        let provider = SoftwareProvider::new();
        provider.generate_key("k1", KeyType::Aes).unwrap();

        for message in ["", "pay 10", "crédit ünïcode 🗝"] {
            let ciphertext = provider.encrypt("k1", message.as_bytes()).unwrap();
            let plaintext = provider.decrypt("k1", &ciphertext).unwrap();
            assert_eq!(plaintext, message.as_bytes());
        }
    }

    #[test]
    fn tampered_ciphertext_fails_decryption() {
        let provider = SoftwareProvider::new();
        provider.generate_key("k1", KeyType::Aes).unwrap();

        let mut ciphertext = provider.encrypt("k1", b"secret").unwrap();
        let last = ciphertext.len() - 1;
        ciphertext[last] ^= 0x01;

        assert!(matches!(
            provider.decrypt("k1", &ciphertext),
            Err(ProviderError::Decryption(_))
        ));
    }

    #[test]
    fn short_ciphertext_is_rejected() {
        let provider = SoftwareProvider::new();
        provider.generate_key("k1", KeyType::Aes).unwrap();

        assert!(matches!(
            provider.decrypt("k1", b"short"),
            Err(ProviderError::Decryption(_))
        ));
    }

    #[test]
    fn operations_on_unknown_key_fail() {
        let provider = SoftwareProvider::new();

        assert!(matches!(
            provider.sign("ghost", b"msg"),
            Err(ProviderError::UnknownKey(_))
        ));
        assert!(matches!(
            provider.encrypt("ghost", b"msg"),
            Err(ProviderError::UnknownKey(_))
        ));
        assert!(matches!(
            provider.destroy_key("ghost"),
            Err(ProviderError::UnknownKey(_))
        ));
    }

    #[test]
    fn generate_rejects_duplicate_id() {
        let provider = SoftwareProvider::new();
        provider.generate_key("k1", KeyType::Ecdsa).unwrap();

        assert!(matches!(
            provider.generate_key("k1", KeyType::Aes),
            Err(ProviderError::Generation(_))
        ));
    }

    #[test]
    fn mismatched_material_is_a_typed_failure() {
        let provider = SoftwareProvider::new();
        provider.generate_key("aes", KeyType::Aes).unwrap();
        provider.generate_key("ecdsa", KeyType::Ecdsa).unwrap();

        assert!(matches!(
            provider.sign("aes", b"msg"),
            Err(ProviderError::Signing(_))
        ));
        assert!(matches!(
            provider.encrypt("ecdsa", b"msg"),
            Err(ProviderError::Encryption(_))
        ));
    }

    #[test]
    fn destroyed_key_is_gone() {
        let provider = SoftwareProvider::new();
        provider.generate_key("k1", KeyType::Ecdsa).unwrap();
        provider.destroy_key("k1").unwrap();

        assert!(matches!(
            provider.sign("k1", b"msg"),
            Err(ProviderError::UnknownKey(_))
        ));
    }

    #[test]
    fn random_bytes_have_requested_length() {
        let provider = SoftwareProvider::new();
        assert_eq!(provider.random_bytes(32).unwrap().len(), 32);
        assert_eq!(provider.random_bytes(0).unwrap().len(), 0);
    }
}
