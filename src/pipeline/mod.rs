// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The request-initialization phase.
//!
//! The host builds one [`RequestPipeline`] at startup, loads its listeners into
//! it and runs [`RequestPipeline::run_init`] for every request before normal
//! routing. Any listener may end the request there.

use std::sync::Arc;

use crate::errors::PipelineError;
use crate::observability::messages::server::InitListenerRegistered;
use crate::observability::messages::StructuredLog;
use crate::request::RequestContext;
use crate::traits::{AjaxResponse, InitListener};

/// How a request ends when a listener takes it over.
#[derive(Debug, Clone, PartialEq)]
pub enum Termination {
    /// Stop with no output.
    Exit,
    /// Stop and send this response.
    Respond(AjaxResponse),
    /// Stop with a fatal, user-visible error page.
    Die { message: String },
}

/// What a listener decided about the request.
#[derive(Debug, Clone, PartialEq)]
pub enum InitOutcome {
    Continue,
    Terminate(Termination),
}

#[derive(Default)]
pub struct RequestPipeline {
    listeners: Vec<Arc<dyn InitListener>>,
}

impl RequestPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_init_listener(&mut self, listener: Arc<dyn InitListener>) -> Result<(), PipelineError> {
        if self.listeners.iter().any(|l| l.name() == listener.name()) {
            return Err(PipelineError::DuplicateListener(listener.name().to_string()));
        }

        InitListenerRegistered {
            listener: listener.name(),
            position: self.listeners.len(),
        }
        .log();
        self.listeners.push(listener);
        Ok(())
    }

    pub fn listener_names(&self) -> Vec<&str> {
        self.listeners.iter().map(|l| l.name()).collect()
    }

    /// Run listeners in order, stopping at the first termination.
    pub async fn run_init(&self, ctx: &RequestContext) -> InitOutcome {
        for listener in &self.listeners {
            if let InitOutcome::Terminate(termination) = listener.on_init(ctx).await {
                return InitOutcome::Terminate(termination);
            }
        }
        InitOutcome::Continue
    }
}

impl std::fmt::Debug for RequestPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestPipeline")
            .field("listeners", &self.listener_names())
            .finish()
    }
}
