// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use html_escape::encode_double_quoted_attribute;
use serde_json::{json, Map, Value};
use url::Url;

use crate::config::consts::{PARAM_NONCE, PARAM_WIDGET_AJAX, PARAM_WIDGET_ID};
use crate::errors::WidgetError;
use crate::registry::WidgetConstruction;
use crate::request::RequestContext;
use crate::traits::{AjaxResponse, WidgetCallbackHandler};

/// Echoes the request's own query parameters back as JSON.
pub struct EchoWidget {
    id: String,
    construction: WidgetConstruction,
}

impl EchoWidget {
    pub fn new(construction: WidgetConstruction) -> Self {
        Self {
            id: String::new(),
            construction,
        }
    }
}

#[async_trait]
impl WidgetCallbackHandler for EchoWidget {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    async fn ajax(&mut self, ctx: &RequestContext) -> Result<AjaxResponse, WidgetError> {
        let params: Map<String, Value> = ctx
            .query()
            .iter()
            .filter(|(key, _)| ![PARAM_WIDGET_AJAX, PARAM_NONCE, PARAM_WIDGET_ID].contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), Value::String(value.clone())))
            .collect();

        Ok(AjaxResponse::json(&json!({
            "widget": super::ECHO,
            "id": self.id,
            "callback_only": self.construction == WidgetConstruction::CallbackOnly,
            "params": params,
        })))
    }

    fn render(&self, callback_url: &Url) -> String {
        format!(
            "<section class=\"widget widget-echo\" id=\"{id}\">\
             <h3>Echo</h3>\
             <a href=\"{url}\">echo this page's parameters</a>\
             </section>",
            id = encode_double_quoted_attribute(&self.id),
            url = encode_double_quoted_attribute(callback_url.as_str()),
        )
    }
}
