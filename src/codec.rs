// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Text codec for binary payloads.
//!
//! Signatures and ciphertext transit and persist as base64 text; generated
//! key identifiers use the URL-safe unpadded alphabet so they stay clean in
//! paths and logs. Both directions are lossless.

use base64ct::{Base64, Base64UrlUnpadded, Encoding};

use crate::error::{WalletError, WalletResult};

/// Encode raw bytes (signature, ciphertext) as standard base64 text.
pub fn encode(bytes: &[u8]) -> String {
    Base64::encode_string(bytes)
}

/// Decode standard base64 text back to raw bytes.
pub fn decode(text: &str) -> WalletResult<Vec<u8>> {
    Base64::decode_vec(text)
        .map_err(|e| WalletError::InvalidArgument(format!("invalid base64 payload: {e}")))
}

/// Encode random bytes as a URL-safe, unpadded key identifier.
pub fn encode_id(bytes: &[u8]) -> String {
    Base64UrlUnpadded::encode_string(bytes)
}
