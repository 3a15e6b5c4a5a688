// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for startup wiring and the HTTP host.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// An init listener joined the request pipeline.
///
/// # Log Level
/// `info!` - Startup event
pub struct InitListenerRegistered<'a> {
    pub listener: &'a str,
    pub position: usize,
}

impl Display for InitListenerRegistered<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Init listener '{}' registered at position {}",
            self.listener, self.position
        )
    }
}

impl StructuredLog for InitListenerRegistered<'_> {
    fn log(&self) {
        tracing::info!(listener = self.listener, position = self.position, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("pipeline", span_name = name, listener = self.listener)
    }
}

/// A widget class became dispatchable.
///
/// # Log Level
/// `info!` - Startup event
pub struct WidgetRegistered<'a> {
    pub class_name: &'a str,
}

impl Display for WidgetRegistered<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Widget class '{}' registered", self.class_name)
    }
}

impl StructuredLog for WidgetRegistered<'_> {
    fn log(&self) {
        tracing::info!(class_name = self.class_name, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("registry", span_name = name, class_name = self.class_name)
    }
}

/// The HTTP host is accepting connections.
///
/// # Log Level
/// `info!` - Startup event
pub struct ServerListening<'a> {
    pub bind_addr: &'a str,
    pub public_base_url: &'a str,
    pub widget_count: usize,
}

impl Display for ServerListening<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Listening on {} (public {}) with {} widgets placed",
            self.bind_addr, self.public_base_url, self.widget_count
        )
    }
}

impl StructuredLog for ServerListening<'_> {
    fn log(&self) {
        tracing::info!(
            bind_addr = self.bind_addr,
            public_base_url = self.public_base_url,
            widget_count = self.widget_count,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!("server", span_name = name, bind_addr = self.bind_addr)
    }
}
