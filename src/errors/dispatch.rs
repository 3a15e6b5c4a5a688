// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors produced while dispatching a widget callback.

use thiserror::Error;

/// Fixed diagnostic for handlers that decline to implement a callback.
pub const AJAX_NOT_IMPLEMENTED: &str = "ajax method was not defined in derived widget class";

/// Failures raised by a widget's own callback.
///
/// Any of these ends the request with a fatal, user-visible error page.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WidgetError {
    /// The widget has no callback behaviour.
    #[error("{}", AJAX_NOT_IMPLEMENTED)]
    NotImplemented,

    /// The callback rejected its input.
    #[error("Bad widget request: {0}")]
    BadRequest(String),

    /// The callback failed while producing its response.
    #[error("Widget callback failed: {0}")]
    Failed(String),
}

/// Reasons a triggered dispatch did not produce a response.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DispatchError {
    /// The nonce was missing, malformed, expired or bound to another class.
    #[error("nonce rejected for widget class '{class_name}'")]
    InvalidNonce { class_name: String },

    /// The class name is not a registered widget.
    #[error("widget class '{class_name}' is not registered")]
    UnknownWidget { class_name: String },

    /// The widget's callback itself failed.
    #[error(transparent)]
    Widget(#[from] WidgetError),
}

impl DispatchError {
    /// Authorization failures end the request silently; widget failures do not.
    pub fn is_authorization_failure(&self) -> bool {
        matches!(
            self,
            DispatchError::InvalidNonce { .. } | DispatchError::UnknownWidget { .. }
        )
    }
}
