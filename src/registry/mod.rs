// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Registry of dispatchable widget classes.
//!
//! Class names arriving in a query string are only ever resolved through this
//! map. A name that was not registered at startup cannot produce a handler.

use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::RegistryError;
use crate::observability::messages::server::WidgetRegistered;
use crate::observability::messages::StructuredLog;
use crate::traits::WidgetCallbackHandler;

/// How a handler instance is going to be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetConstruction {
    /// Built only to answer a callback; must not place itself on a page.
    CallbackOnly,
    /// Built by the host to render onto a page.
    Renderable,
}

/// Builds a fresh handler for one request.
pub type WidgetFactory =
    Arc<dyn Fn(WidgetConstruction) -> Box<dyn WidgetCallbackHandler> + Send + Sync>;

#[derive(Clone, Default)]
pub struct WidgetRegistry(HashMap<String, WidgetFactory>);

impl WidgetRegistry {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Register a factory under `class_name`.
    pub fn register<F>(&mut self, class_name: impl Into<String>, factory: F) -> Result<(), RegistryError>
    where
        F: Fn(WidgetConstruction) -> Box<dyn WidgetCallbackHandler> + Send + Sync + 'static,
    {
        let class_name = class_name.into();
        if class_name.is_empty() {
            return Err(RegistryError::EmptyKey);
        }
        if self.0.contains_key(&class_name) {
            return Err(RegistryError::DuplicateWidget(class_name));
        }

        WidgetRegistered {
            class_name: &class_name,
        }
        .log();
        self.0.insert(class_name, Arc::new(factory));
        Ok(())
    }

    pub fn contains(&self, class_name: &str) -> bool {
        self.0.contains_key(class_name)
    }

    /// Registered class names, sorted.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.0.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Build a new handler, or `None` when the class is unknown.
    pub fn construct(
        &self,
        class_name: &str,
        construction: WidgetConstruction,
    ) -> Option<Box<dyn WidgetCallbackHandler>> {
        self.0.get(class_name).map(|factory| factory(construction))
    }
}

impl std::fmt::Debug for WidgetRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetRegistry")
            .field("widget_count", &self.0.len())
            .field("classes", &self.keys())
            .finish()
    }
}
