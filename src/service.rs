// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet operations and authorization policy.
//!
//! [`WalletService`] is the exposed surface of the core: every operation
//! resolves the caller through the execution context, loads the aggregate
//! fresh from the ledger, evaluates the authorization predicates, performs
//! the mutation or read, and persists before returning. The host provides
//! per-invocation isolation, so there is no locking here.
//!
//! ## Authorization
//!
//! - membership management (`add_user`, `remove_user`) requires an admin
//! - key operations require any registered user
//! - predicates fail closed: a missing user record or a failed roster read
//!   is a denial, never a skipped check

use std::sync::Arc;

use crate::audit::{AuditEvent, AuditEventType, AuditLog};
use crate::context::{ExecutionContext, StaticContext};
use crate::crypto::CryptoProvider;
use crate::error::{WalletError, WalletResult};
use crate::ledger::Ledger;
use crate::wallet::{Key, KeyRegistry, KeyType, Role, User, UserStore, Wallet, WalletStore};

/// Function-call contract of the custodial wallet core.
pub struct WalletService {
    context: Arc<dyn ExecutionContext>,
    provider: Arc<dyn CryptoProvider>,
    ledger: Arc<dyn Ledger>,
}

impl WalletService {
    pub fn new(
        context: Arc<dyn ExecutionContext>,
        provider: Arc<dyn CryptoProvider>,
        ledger: Arc<dyn Ledger>,
    ) -> Self {
        Self {
            context,
            provider,
            ledger,
        }
    }

    /// The same service viewed as a different caller.
    ///
    /// Hosts create one context per invocation; this mirrors that shape
    /// without re-wiring provider and ledger.
    pub fn as_caller(&self, caller: impl Into<String>) -> WalletService {
        WalletService {
            context: Arc::new(StaticContext::new(caller)),
            provider: self.provider.clone(),
            ledger: self.ledger.clone(),
        }
    }

    // =========================================================================
    // Wallet lifecycle
    // =========================================================================

    /// Create the singleton wallet, enrolling the caller as first admin.
    ///
    /// The normal admin check is bypassed here: no admin can exist before
    /// the wallet does.
    pub fn init_wallet(&self, name: &str) -> WalletResult<()> {
        let caller = self.context.caller().to_string();
        let wallets = WalletStore::new(self.ledger.as_ref());

        if wallets.exists()? {
            return Err(WalletError::AlreadyExists("wallet".to_string()));
        }

        let mut wallet = Wallet::new(name);
        UserStore::new(self.ledger.as_ref()).put(&User::new(caller.clone(), Role::Admin))?;
        wallet.add_user_id(&caller);
        wallets.put(&wallet)?;

        self.record(AuditEvent::new(AuditEventType::WalletCreated).with_caller(caller.as_str()));
        tracing::info!(wallet = name, caller = %caller, "wallet created");
        Ok(())
    }

    // =========================================================================
    // Membership
    // =========================================================================

    /// Register a new user. Admin only.
    pub fn add_user(&self, user_id: &str, role: &str) -> WalletResult<()> {
        let caller = self.context.caller().to_string();
        let wallets = WalletStore::new(self.ledger.as_ref());
        let mut wallet = wallets.load()?;

        self.require_admin(&caller, "add a user")?;
        let role = Role::parse(role)?;

        let users = UserStore::new(self.ledger.as_ref());
        if users.exists(user_id)? {
            return Err(WalletError::AlreadyExists(format!("user `{user_id}`")));
        }

        users.put(&User::new(user_id, role))?;
        wallet.add_user_id(user_id);
        wallets.put(&wallet)?;

        self.record(
            AuditEvent::new(AuditEventType::UserAdded)
                .with_caller(caller.as_str())
                .with_resource(user_id),
        );
        tracing::info!(user_id, role = %role, caller = %caller, "user added");
        Ok(())
    }

    /// Remove a user from the roster and destroy the record. Admin only.
    ///
    /// Keys created by the removed user stay in the wallet: removal does
    /// not cascade to the inventory.
    pub fn remove_user(&self, user_id: &str) -> WalletResult<()> {
        let caller = self.context.caller().to_string();
        let wallets = WalletStore::new(self.ledger.as_ref());
        let mut wallet = wallets.load()?;

        self.require_admin(&caller, "remove a user")?;

        let users = UserStore::new(self.ledger.as_ref());
        if !users.exists(user_id)? {
            return Err(WalletError::NotFound(format!("user `{user_id}`")));
        }

        users.delete(user_id)?;
        wallet.remove_user_id(user_id);
        wallets.put(&wallet)?;

        self.record(
            AuditEvent::new(AuditEventType::UserRemoved)
                .with_caller(caller.as_str())
                .with_resource(user_id),
        );
        tracing::info!(user_id, caller = %caller, "user removed");
        Ok(())
    }

    // =========================================================================
    // Key inventory
    // =========================================================================

    /// Create a key and register it in the inventory. Any registered user.
    ///
    /// The key record and its provider-side material are fully created
    /// before the inventory commits, so a failure partway never leaves the
    /// inventory referencing a key that does not exist.
    pub fn add_key(&self, description: &str, key_type: &str) -> WalletResult<Key> {
        let caller = self.context.caller().to_string();
        let wallets = WalletStore::new(self.ledger.as_ref());
        let mut wallet = wallets.load()?;

        self.require_registered(&caller, "add a key")?;
        let key_type = KeyType::parse(key_type)?;

        let registry = KeyRegistry::new(self.ledger.as_ref(), self.provider.as_ref());
        let key = registry.create(description, key_type, &caller)?;

        wallet.add_key_id(&key.id);
        wallets.put(&wallet)?;

        self.record(
            AuditEvent::new(AuditEventType::KeyCreated)
                .with_caller(caller.as_str())
                .with_resource(key.id.as_str()),
        );
        Ok(key)
    }

    /// Remove a key from the inventory and destroy it. Any registered user.
    ///
    /// Detach order is the reverse of creation: the inventory drops the
    /// identifier first, then the record and material are destroyed.
    pub fn remove_key(&self, key_id: &str) -> WalletResult<()> {
        let caller = self.context.caller().to_string();
        let wallets = WalletStore::new(self.ledger.as_ref());
        let mut wallet = wallets.load()?;

        self.require_registered(&caller, "remove a key")?;

        let registry = KeyRegistry::new(self.ledger.as_ref(), self.provider.as_ref());
        let key = registry.load(key_id)?;

        wallet.remove_key_id(key_id);
        wallets.put(&wallet)?;
        registry.delete(&key)?;

        self.record(
            AuditEvent::new(AuditEventType::KeyDeleted)
                .with_caller(caller.as_str())
                .with_resource(key_id),
        );
        Ok(())
    }

    /// List keys in the inventory, optionally filtered by owner.
    ///
    /// An inventory entry with no loadable record is an inconsistency the
    /// host should investigate; it is logged and skipped, never fatal for
    /// the whole listing.
    pub fn list_keys(&self, owner_filter: Option<&str>) -> WalletResult<Vec<Key>> {
        let caller = self.context.caller().to_string();
        let wallet = WalletStore::new(self.ledger.as_ref()).load()?;

        self.require_registered(&caller, "list the keys in the wallet")?;
        let owner_filter = owner_filter.filter(|owner| !owner.is_empty());

        let registry = KeyRegistry::new(self.ledger.as_ref(), self.provider.as_ref());
        let mut keys = Vec::with_capacity(wallet.keys.len());
        for key_id in &wallet.keys {
            let Some(key) = registry.get(key_id)? else {
                tracing::warn!(key_id = %key_id, "inventory references a missing key record");
                continue;
            };
            if owner_filter.is_none_or(|owner| key.owner == owner) {
                keys.push(key);
            }
        }
        Ok(keys)
    }

    // =========================================================================
    // Key usage
    // =========================================================================

    /// Sign `payload` with an ECDSA key. Any registered user.
    pub fn sign(&self, key_id: &str, payload: &str) -> WalletResult<String> {
        let caller = self.context.caller().to_string();
        WalletStore::new(self.ledger.as_ref()).load()?;

        self.require_registered(&caller, "sign a message")?;

        let registry = KeyRegistry::new(self.ledger.as_ref(), self.provider.as_ref());
        let key = registry.load(key_id)?;
        let signature = registry.sign(&key, payload)?;

        self.record(
            AuditEvent::new(AuditEventType::MessageSigned)
                .with_caller(caller.as_str())
                .with_resource(key_id),
        );
        Ok(signature)
    }

    /// Verify a signature with an ECDSA key. Any registered user.
    pub fn verify(&self, key_id: &str, payload: &str, signature: &str) -> WalletResult<bool> {
        let caller = self.context.caller().to_string();
        WalletStore::new(self.ledger.as_ref()).load()?;

        self.require_registered(&caller, "verify a signature")?;

        let registry = KeyRegistry::new(self.ledger.as_ref(), self.provider.as_ref());
        let key = registry.load(key_id)?;
        let valid = registry.verify(&key, payload, signature)?;

        self.record(
            AuditEvent::new(AuditEventType::SignatureVerified)
                .with_caller(caller.as_str())
                .with_resource(key_id),
        );
        Ok(valid)
    }

    /// Encrypt `payload` with an AES key. Any registered user.
    pub fn encrypt(&self, key_id: &str, payload: &str) -> WalletResult<String> {
        let caller = self.context.caller().to_string();
        WalletStore::new(self.ledger.as_ref()).load()?;

        self.require_registered(&caller, "encrypt a message")?;

        let registry = KeyRegistry::new(self.ledger.as_ref(), self.provider.as_ref());
        let key = registry.load(key_id)?;
        let ciphertext = registry.encrypt(&key, payload)?;

        self.record(
            AuditEvent::new(AuditEventType::MessageEncrypted)
                .with_caller(caller.as_str())
                .with_resource(key_id),
        );
        Ok(ciphertext)
    }

    /// Decrypt ciphertext with an AES key. Any registered user.
    pub fn decrypt(&self, key_id: &str, ciphertext: &str) -> WalletResult<String> {
        let caller = self.context.caller().to_string();
        WalletStore::new(self.ledger.as_ref()).load()?;

        self.require_registered(&caller, "decrypt a message")?;

        let registry = KeyRegistry::new(self.ledger.as_ref(), self.provider.as_ref());
        let key = registry.load(key_id)?;
        let plaintext = registry.decrypt(&key, ciphertext)?;

        self.record(
            AuditEvent::new(AuditEventType::MessageDecrypted)
                .with_caller(caller.as_str())
                .with_resource(key_id),
        );
        Ok(plaintext)
    }

    // =========================================================================
    // Authorization predicates
    // =========================================================================

    fn require_admin(&self, caller: &str, action: &'static str) -> WalletResult<()> {
        match UserStore::new(self.ledger.as_ref()).get(caller) {
            Ok(Some(user)) if user.role == Role::Admin => Ok(()),
            Ok(_) => self.deny(caller, action),
            Err(e) => {
                tracing::warn!(caller, action, error = %e, "authorization lookup failed");
                self.deny(caller, action)
            }
        }
    }

    fn require_registered(&self, caller: &str, action: &'static str) -> WalletResult<()> {
        match UserStore::new(self.ledger.as_ref()).get(caller) {
            Ok(Some(_)) => Ok(()),
            Ok(None) => self.deny(caller, action),
            Err(e) => {
                tracing::warn!(caller, action, error = %e, "authorization lookup failed");
                self.deny(caller, action)
            }
        }
    }

    fn deny(&self, caller: &str, action: &'static str) -> WalletResult<()> {
        let err = WalletError::Unauthorized {
            caller: caller.to_string(),
            action,
        };
        self.record(
            AuditEvent::new(AuditEventType::PermissionDenied)
                .with_caller(caller)
                .failed(err.to_string()),
        );
        tracing::warn!(caller, action, "authorization denied");
        Err(err)
    }

    /// Audit write failures never fail the triggering operation.
    fn record(&self, event: AuditEvent) {
        if let Err(e) = AuditLog::new(self.ledger.as_ref()).append(&event) {
            tracing::warn!(error = %e, "failed to record audit event");
        }
    }
}
