// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use async_trait::async_trait;
use html_escape::encode_double_quoted_attribute;
use url::Url;

use crate::dispatch::ajax_url;
use crate::errors::WidgetError;
use crate::request::RequestContext;
use crate::traits::NonceIssuer;

/// Response produced by a widget callback.
#[derive(Debug, Clone, PartialEq)]
pub struct AjaxResponse {
    pub status: u16,
    pub content_type: String,
    pub body: Vec<u8>,
}

impl AjaxResponse {
    pub fn new(status: u16, content_type: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            content_type: content_type.into(),
            body: body.into(),
        }
    }

    pub fn json(value: &serde_json::Value) -> Self {
        Self::new(200, "application/json", value.to_string())
    }

    pub fn html(body: impl Into<String>) -> Self {
        Self::new(200, "text/html; charset=utf-8", body.into())
    }

    pub fn text(body: impl Into<String>) -> Self {
        Self::new(200, "text/plain; charset=utf-8", body.into())
    }
}

/// A widget that can answer callback requests.
///
/// Implementors are registered by class name in the
/// [`WidgetRegistry`](crate::registry::WidgetRegistry) and constructed fresh
/// for every callback. `ajax` is required; a widget with nothing to say
/// returns [`WidgetError::NotImplemented`].
#[async_trait]
pub trait WidgetCallbackHandler: Send + Sync {
    /// Instance id, as rendered into callback URLs.
    fn id(&self) -> &str;

    fn set_id(&mut self, id: String);

    /// Run the widget's callback for the current request.
    async fn ajax(&mut self, ctx: &RequestContext) -> Result<AjaxResponse, WidgetError>;

    /// HTML fragment shown when the widget is placed on a page.
    fn render(&self, callback_url: &Url) -> String {
        format!(
            "<a class=\"widget-ajax\" data-widget-id=\"{}\" href=\"{}\">refresh</a>",
            encode_double_quoted_attribute(self.id()),
            encode_double_quoted_attribute(callback_url.as_str())
        )
    }

    /// Callback URL for this instance under `class_name`.
    fn ajax_url(&self, current: &Url, class_name: &str, nonces: &dyn NonceIssuer) -> Url {
        ajax_url(current, class_name, self.id(), nonces)
    }
}
