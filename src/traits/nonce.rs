// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

/// Result of checking a nonce against a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonceVerdict {
    /// Issued during the current half-lifetime tick
    Fresh,
    /// Issued during the previous tick; still accepted
    Aging,
    Invalid,
}

impl NonceVerdict {
    pub fn is_valid(self) -> bool {
        !matches!(self, NonceVerdict::Invalid)
    }
}

/// Issues nonces bound to a named scope.
pub trait NonceIssuer: Send + Sync {
    fn create(&self, scope: &str) -> String;
}

/// Checks nonces previously issued for a named scope.
pub trait NonceVerifier: Send + Sync {
    fn verify(&self, nonce: &str, scope: &str) -> NonceVerdict;
}
