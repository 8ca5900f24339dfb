// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Caller identity resolution.
//!
//! The secure-execution host authenticates the sender of each invocation
//! before any wallet logic runs; the core only ever sees the resolved
//! identity string through this interface. All authorization predicates
//! are evaluated against this value, read fresh for every operation.

/// Host-provided execution context for the current invocation.
pub trait ExecutionContext: Send + Sync {
    /// Identity of the caller of the current operation.
    fn caller(&self) -> &str;
}

/// Context carrying a fixed, pre-resolved caller identity.
///
/// This is the shape a host hands to the core: one context per invocation,
/// identity already verified. Tests use it to impersonate different callers.
#[derive(Debug, Clone)]
pub struct StaticContext {
    caller: String,
}

impl StaticContext {
    pub fn new(caller: impl Into<String>) -> Self {
        Self {
            caller: caller.into(),
        }
    }
}

impl ExecutionContext for StaticContext {
    fn caller(&self) -> &str {
        &self.caller
    }
}
