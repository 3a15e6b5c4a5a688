// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use html_escape::encode_double_quoted_attribute;
use serde_json::json;
use url::Url;

use crate::errors::WidgetError;
use crate::request::RequestContext;
use crate::traits::{AjaxResponse, WidgetCallbackHandler};

/// Counts callbacks. The counter belongs to the factory, not the instance.
pub struct HitCounterWidget {
    id: String,
    hits: Arc<AtomicU64>,
}

impl HitCounterWidget {
    pub fn new(hits: Arc<AtomicU64>) -> Self {
        Self {
            id: String::new(),
            hits,
        }
    }
}

#[async_trait]
impl WidgetCallbackHandler for HitCounterWidget {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    async fn ajax(&mut self, _ctx: &RequestContext) -> Result<AjaxResponse, WidgetError> {
        let hits = self.hits.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(AjaxResponse::json(&json!({ "id": self.id, "hits": hits })))
    }

    fn render(&self, callback_url: &Url) -> String {
        format!(
            "<section class=\"widget widget-hit-counter\" id=\"{id}\">\
             <h3>Hits: {hits}</h3>\
             <a href=\"{url}\">hit me</a>\
             </section>",
            id = encode_double_quoted_attribute(&self.id),
            hits = self.hits.load(Ordering::SeqCst),
            url = encode_double_quoted_attribute(callback_url.as_str()),
        )
    }
}
