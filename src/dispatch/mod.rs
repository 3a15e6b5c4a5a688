// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Widget callback dispatch.
//!
//! [`CallbackDispatcher`] joins the request-initialization phase. For a
//! request carrying `widget_ajax` it:
//!
//! 1. verifies `nonce` against the class name,
//! 2. resolves the class name through the [`WidgetRegistry`],
//! 3. builds a [`WidgetConstruction::CallbackOnly`] instance and applies `widget_id`,
//! 4. fires the `widget_ajax_dispatch` action,
//! 5. runs the handler's `ajax` callback.
//!
//! Once `widget_ajax` is present the request always terminates here, even
//! when step 1 or 2 fails. Authorization failures end it with no output.

mod callback_url;

#[cfg(test)]
mod integration_tests;

pub use callback_url::{add_query_args, ajax_url};

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::Instrument;

use crate::config::consts::WIDGET_AJAX_DISPATCH;
use crate::errors::{DispatchError, PipelineError};
use crate::hooks::ActionHooks;
use crate::observability::messages::dispatch::{
    DispatchCompleted, DispatchFailed, DispatchRejected, DispatchTriggered,
};
use crate::observability::messages::StructuredLog;
use crate::pipeline::{InitOutcome, RequestPipeline, Termination};
use crate::registry::{WidgetConstruction, WidgetRegistry};
use crate::request::{CallbackRequest, RequestContext};
use crate::traits::{AjaxResponse, InitListener, NonceVerifier};

/// Name under which the dispatcher joins the request pipeline.
pub const LISTENER_NAME: &str = "widget_ajax";

pub struct CallbackDispatcher {
    registry: Arc<WidgetRegistry>,
    hooks: Arc<ActionHooks>,
    nonces: Arc<dyn NonceVerifier>,
}

impl CallbackDispatcher {
    pub fn new(
        registry: Arc<WidgetRegistry>,
        hooks: Arc<ActionHooks>,
        nonces: Arc<dyn NonceVerifier>,
    ) -> Self {
        Self {
            registry,
            hooks,
            nonces,
        }
    }

    /// Join the request-initialization phase. Fails if already loaded.
    pub fn load(self: Arc<Self>, pipeline: &mut RequestPipeline) -> Result<(), PipelineError> {
        pipeline.add_init_listener(self)
    }

    pub async fn handle_request_init(&self, ctx: &RequestContext) -> InitOutcome {
        let request = CallbackRequest::from_context(ctx);
        let Some(class_name) = request.class_name() else {
            return InitOutcome::Continue;
        };

        let triggered = DispatchTriggered {
            class_name,
            widget_id: request.instance_id(),
        };
        triggered.log();
        let span = triggered.span("handle_request_init");

        let termination = match self.dispatch(class_name, &request, ctx).instrument(span).await {
            Ok(response) => Termination::Respond(response),
            Err(err) if err.is_authorization_failure() => {
                DispatchRejected {
                    class_name,
                    reason: &err,
                }
                .log();
                Termination::Exit
            }
            Err(err) => Termination::Die {
                message: err.to_string(),
            },
        };

        InitOutcome::Terminate(termination)
    }

    /// Validate and run one callback.
    pub async fn dispatch(
        &self,
        class_name: &str,
        request: &CallbackRequest,
        ctx: &RequestContext,
    ) -> Result<AjaxResponse, DispatchError> {
        if !self
            .nonces
            .verify(request.nonce_or_empty(), class_name)
            .is_valid()
        {
            return Err(DispatchError::InvalidNonce {
                class_name: class_name.to_string(),
            });
        }

        let mut handler = self
            .registry
            .construct(class_name, WidgetConstruction::CallbackOnly)
            .ok_or_else(|| DispatchError::UnknownWidget {
                class_name: class_name.to_string(),
            })?;

        if let Some(id) = request.instance_id() {
            handler.set_id(id.to_string());
        }

        self.hooks
            .do_action(WIDGET_AJAX_DISPATCH, class_name, &mut *handler);

        let start = Instant::now();
        match handler.ajax(ctx).await {
            Ok(response) => {
                DispatchCompleted {
                    class_name,
                    widget_id: handler.id(),
                    status: response.status,
                    body_size: response.body.len(),
                    duration: start.elapsed(),
                }
                .log();
                Ok(response)
            }
            Err(err) => {
                DispatchFailed {
                    class_name,
                    widget_id: handler.id(),
                    error: &err,
                }
                .log();
                Err(err.into())
            }
        }
    }
}

impl std::fmt::Debug for CallbackDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackDispatcher")
            .field("registry", &self.registry)
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl InitListener for CallbackDispatcher {
    fn name(&self) -> &str {
        LISTENER_NAME
    }

    async fn on_init(&self, ctx: &RequestContext) -> InitOutcome {
        self.handle_request_init(ctx).await
    }
}
