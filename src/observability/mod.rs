// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! This module provides centralized message types for all diagnostic and
//! operational logging. Message types follow a struct-based pattern with a
//! `Display` implementation to:
//!
//! * Eliminate magic strings scattered throughout the codebase
//! * Keep field names consistent between the log line and its structured fields
//! * Provide consistent, structured logging output
//!
//! # Usage
//!
//! ```rust
//! use widget_ajax::observability::messages::dispatch::DispatchFailed;
//! use widget_ajax::errors::WidgetError;
//!
//! let error = WidgetError::Failed("counter store unavailable".to_string());
//! let msg = DispatchFailed {
//!     class_name: "hit_counter",
//!     widget_id: "counter-1",
//!     error: &error,
//! };
//!
//! tracing::error!("{}", msg);
//! ```

pub mod messages;

/// Install the global `tracing` subscriber, honouring `RUST_LOG`.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
