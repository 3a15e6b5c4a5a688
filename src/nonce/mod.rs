// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Short-lived tokens that tie a callback URL to the widget class it was
//! rendered for.
//!
//! Time is divided into ticks of half the configured lifetime. A nonce is the
//! truncated HMAC-SHA256 of `"{tick}|{scope}"`, and verification accepts the
//! current tick ([`NonceVerdict::Fresh`]) or the one before it
//! ([`NonceVerdict::Aging`]). A nonce therefore stays valid for between one
//! half and one full lifetime.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use hmac::digest::InvalidLength;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::config::consts::NONCE_LENGTH;
use crate::observability::messages::nonce::NonceRejected;
use crate::observability::messages::StructuredLog;
use crate::traits::{NonceIssuer, NonceVerdict, NonceVerifier};

type HmacSha256 = Hmac<Sha256>;

/// Source of wall-clock seconds.
pub trait Clock: Send + Sync {
    fn now_unix(&self) -> u64;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

/// Manually driven clock for tests and replay.
#[derive(Debug, Default)]
pub struct FixedClock(AtomicU64);

impl FixedClock {
    pub fn new(now_unix: u64) -> Self {
        Self(AtomicU64::new(now_unix))
    }

    pub fn set(&self, now_unix: u64) {
        self.0.store(now_unix, Ordering::SeqCst);
    }

    pub fn advance(&self, seconds: u64) {
        self.0.fetch_add(seconds, Ordering::SeqCst);
    }
}

impl Clock for FixedClock {
    fn now_unix(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// HMAC-backed nonce issuer and verifier.
pub struct HmacNonces {
    mac: HmacSha256,
    lifetime_seconds: u64,
    clock: Arc<dyn Clock>,
}

impl HmacNonces {
    pub fn new(secret: &[u8], lifetime_seconds: u64) -> Result<Self, InvalidLength> {
        Self::with_clock(secret, lifetime_seconds, Arc::new(SystemClock))
    }

    pub fn with_clock(
        secret: &[u8],
        lifetime_seconds: u64,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, InvalidLength> {
        Ok(Self {
            mac: HmacSha256::new_from_slice(secret)?,
            lifetime_seconds,
            clock,
        })
    }

    pub fn lifetime_seconds(&self) -> u64 {
        self.lifetime_seconds
    }

    /// Current tick: `ceil(now / (lifetime / 2))`.
    pub fn tick(&self) -> u64 {
        let half = (self.lifetime_seconds / 2).max(1);
        self.clock.now_unix().div_ceil(half)
    }

    fn token_for(&self, tick: u64, scope: &str) -> String {
        let mut mac = self.mac.clone();
        mac.update(format!("{tick}|{scope}").as_bytes());
        let digest = hex::encode(mac.finalize().into_bytes());
        let end = digest.len() - 2;
        digest[end - NONCE_LENGTH..end].to_string()
    }

    fn matches(&self, nonce: &str, tick: u64, scope: &str) -> bool {
        let expected = self.token_for(tick, scope);
        if expected.len() != nonce.len() {
            return false;
        }
        expected.as_bytes().ct_eq(nonce.as_bytes()).into()
    }
}

impl std::fmt::Debug for HmacNonces {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HmacNonces")
            .field("lifetime_seconds", &self.lifetime_seconds)
            .finish_non_exhaustive()
    }
}

impl NonceIssuer for HmacNonces {
    fn create(&self, scope: &str) -> String {
        self.token_for(self.tick(), scope)
    }
}

impl NonceVerifier for HmacNonces {
    fn verify(&self, nonce: &str, scope: &str) -> NonceVerdict {
        if nonce.is_empty() {
            NonceRejected {
                scope,
                reason: "missing",
            }
            .log();
            return NonceVerdict::Invalid;
        }

        let tick = self.tick();
        if self.matches(nonce, tick, scope) {
            return NonceVerdict::Fresh;
        }
        if tick > 0 && self.matches(nonce, tick - 1, scope) {
            return NonceVerdict::Aging;
        }

        NonceRejected {
            scope,
            reason: "expired or mismatched",
        }
        .log();
        NonceVerdict::Invalid
    }
}
