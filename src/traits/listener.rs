// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;

use crate::pipeline::InitOutcome;
use crate::request::RequestContext;

/// A participant in the request-initialization phase.
#[async_trait]
pub trait InitListener: Send + Sync {
    /// Unique name; the pipeline refuses a second listener with the same name.
    fn name(&self) -> &str;

    async fn on_init(&self, ctx: &RequestContext) -> InitOutcome;
}
