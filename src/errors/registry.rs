// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors for startup wiring: widget registration and pipeline composition.

use thiserror::Error;

/// Errors that can occur while populating the widget registry
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    /// A factory is already registered under this class name
    #[error("Widget class '{0}' is already registered")]
    DuplicateWidget(String),

    /// Class names must be non-empty so they can travel in a query string
    #[error("Widget class name must not be empty")]
    EmptyKey,
}

/// Errors that can occur while wiring request-init listeners
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    /// The same listener was loaded twice
    #[error("Init listener '{0}' is already registered")]
    DuplicateListener(String),
}
