// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A nonce failed verification.
///
/// # Log Level
/// `debug!` - Expected for stale pages; dispatch logs the rejection itself
pub struct NonceRejected<'a> {
    pub scope: &'a str,
    pub reason: &'a str,
}

impl Display for NonceRejected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Nonce for scope '{}' rejected: {}", self.scope, self.reason)
    }
}

impl StructuredLog for NonceRejected<'_> {
    fn log(&self) {
        tracing::debug!(scope = self.scope, reason = self.reason, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("nonce", span_name = name, scope = self.scope)
    }
}
