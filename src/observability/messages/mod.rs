// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! Each message type implements `Display` for the human-readable line and
//! [`StructuredLog`] to emit it through `tracing` with typed fields.
//!
//! # Organization
//!
//! * `dispatch` - callback dispatch lifecycle (triggered, rejected, completed, failed)
//! * `nonce` - token verification failures
//! * `server` - pipeline wiring and HTTP host lifecycle
//!
//! # Usage Pattern
//!
//! ```rust
//! use widget_ajax::observability::messages::dispatch::DispatchTriggered;
//! use widget_ajax::observability::messages::StructuredLog;
//!
//! let msg = DispatchTriggered {
//!     class_name: "echo",
//!     widget_id: Some("echo-1"),
//! };
//!
//! msg.log();
//! ```

use std::fmt::Display;
use tracing::Span;

pub mod dispatch;
pub mod nonce;
pub mod server;

/// A log message that knows its own level and structured fields.
pub trait StructuredLog: Display {
    /// Emit the message at its level with structured fields attached.
    fn log(&self);

    /// Build a span carrying the same fields.
    fn span(&self, name: &str) -> Span;
}
