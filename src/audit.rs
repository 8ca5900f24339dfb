// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Audit logging for security-sensitive operations.
//!
//! Every mutation and every denied authorization is appended to the
//! `audit` table under a monotonically increasing sequence number, with
//! the counter itself stored under a reserved key. Audit writes never
//! fail the operation that triggered them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::WalletResult;
use crate::ledger::{Ledger, Table};

/// Reserved key holding the next sequence number (8-byte big-endian).
const SEQ_KEY: &str = "seq";

/// Types of auditable events.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventType {
    WalletCreated,
    UserAdded,
    UserRemoved,
    KeyCreated,
    KeyDeleted,
    MessageSigned,
    SignatureVerified,
    MessageEncrypted,
    MessageDecrypted,
    PermissionDenied,
}

/// An audit log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEvent {
    /// Unique event ID.
    pub event_id: String,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// Type of event.
    pub event_type: AuditEventType,
    /// Identity that triggered the event.
    pub caller: Option<String>,
    /// Affected resource (user id, key id).
    pub resource_id: Option<String>,
    /// Whether the operation succeeded.
    pub success: bool,
    /// Error message if the operation failed.
    pub error: Option<String>,
}

impl AuditEvent {
    pub fn new(event_type: AuditEventType) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            event_type,
            caller: None,
            resource_id: None,
            success: true,
            error: None,
        }
    }

    pub fn with_caller(mut self, caller: impl Into<String>) -> Self {
        self.caller = Some(caller.into());
        self
    }

    pub fn with_resource(mut self, resource_id: impl Into<String>) -> Self {
        self.resource_id = Some(resource_id.into());
        self
    }

    pub fn failed(mut self, error: impl Into<String>) -> Self {
        self.success = false;
        self.error = Some(error.into());
        self
    }
}

/// Append-only event log over the `audit` table.
pub struct AuditLog<'a> {
    ledger: &'a dyn Ledger,
}

impl<'a> AuditLog<'a> {
    pub fn new(ledger: &'a dyn Ledger) -> Self {
        Self { ledger }
    }

    /// Number of events recorded so far.
    pub fn len(&self) -> WalletResult<u64> {
        match self.ledger.get(Table::Audit, SEQ_KEY)? {
            Some(bytes) if bytes.len() >= 8 => {
                let mut buf = [0u8; 8];
                buf.copy_from_slice(&bytes[..8]);
                Ok(u64::from_be_bytes(buf))
            }
            _ => Ok(0),
        }
    }

    pub fn is_empty(&self) -> WalletResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Append an event, returning its sequence number.
    pub fn append(&self, event: &AuditEvent) -> WalletResult<u64> {
        let seq = self.len()?;
        let bytes = serde_json::to_vec(event)?;
        self.ledger.set(Table::Audit, &event_key(seq), &bytes)?;
        self.ledger
            .set(Table::Audit, SEQ_KEY, &(seq + 1).to_be_bytes())?;
        Ok(seq)
    }

    /// Read back the event recorded under `seq`, if any.
    pub fn get(&self, seq: u64) -> WalletResult<Option<AuditEvent>> {
        match self.ledger.get(Table::Audit, &event_key(seq))? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }
}

/// Zero-padded so lexicographic key order matches sequence order.
fn event_key(seq: u64) -> String {
    format!("event:{seq:020}")
}
