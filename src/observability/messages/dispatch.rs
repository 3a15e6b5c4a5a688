// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for widget callback dispatch.
//!
//! This module contains message types for logging events related to:
//! * Detection of the callback trigger parameter
//! * Authorization failures (nonce, unknown class)
//! * Callback completion and failure

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use std::time::Duration;
use tracing::Span;

/// A request carried the callback trigger parameter.
///
/// # Log Level
/// `debug!` - Fires on every callback request
///
/// # Example
/// ```
/// use widget_ajax::observability::messages::dispatch::DispatchTriggered;
///
/// let msg = DispatchTriggered {
///     class_name: "hit_counter",
///     widget_id: None,
/// };
///
/// assert_eq!(msg.to_string(), "Widget callback requested for class 'hit_counter'");
/// ```
pub struct DispatchTriggered<'a> {
    pub class_name: &'a str,
    pub widget_id: Option<&'a str>,
}

impl Display for DispatchTriggered<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self.widget_id {
            Some(id) => write!(
                f,
                "Widget callback requested for class '{}' (id '{}')",
                self.class_name, id
            ),
            None => write!(
                f,
                "Widget callback requested for class '{}'",
                self.class_name
            ),
        }
    }
}

impl StructuredLog for DispatchTriggered<'_> {
    fn log(&self) {
        tracing::debug!(
            class_name = self.class_name,
            widget_id = self.widget_id.unwrap_or(""),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "widget_dispatch",
            span_name = name,
            class_name = self.class_name,
            widget_id = self.widget_id.unwrap_or(""),
        )
    }
}

/// Dispatch refused before a handler was built.
///
/// # Log Level
/// `warn!` - Forged, stale or mistyped callback URL
pub struct DispatchRejected<'a> {
    pub class_name: &'a str,
    pub reason: &'a dyn std::error::Error,
}

impl Display for DispatchRejected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Widget callback for '{}' rejected: {}",
            self.class_name, self.reason
        )
    }
}

impl StructuredLog for DispatchRejected<'_> {
    fn log(&self) {
        tracing::warn!(
            class_name = self.class_name,
            reason = %self.reason,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "widget_dispatch",
            span_name = name,
            class_name = self.class_name,
        )
    }
}

/// Callback returned a response.
///
/// # Log Level
/// `info!` - Important operational event
pub struct DispatchCompleted<'a> {
    pub class_name: &'a str,
    pub widget_id: &'a str,
    pub status: u16,
    pub body_size: usize,
    pub duration: Duration,
}

impl Display for DispatchCompleted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Widget '{}' ({}) answered callback: status={}, body={} bytes, duration={:?}",
            self.class_name, self.widget_id, self.status, self.body_size, self.duration
        )
    }
}

impl StructuredLog for DispatchCompleted<'_> {
    fn log(&self) {
        tracing::info!(
            class_name = self.class_name,
            widget_id = self.widget_id,
            status = self.status,
            body_size = self.body_size,
            duration_ms = self.duration.as_millis() as u64,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "widget_dispatch",
            span_name = name,
            class_name = self.class_name,
            widget_id = self.widget_id,
        )
    }
}

/// Callback failed; the request ends with a fatal error page.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct DispatchFailed<'a> {
    pub class_name: &'a str,
    pub widget_id: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for DispatchFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Widget '{}' ({}) callback failed: {}",
            self.class_name, self.widget_id, self.error
        )
    }
}

impl StructuredLog for DispatchFailed<'_> {
    fn log(&self) {
        tracing::error!(
            class_name = self.class_name,
            widget_id = self.widget_id,
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "widget_dispatch",
            span_name = name,
            class_name = self.class_name,
            widget_id = self.widget_id,
        )
    }
}
