// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Per-request views of the incoming query string.
//!
//! A [`RequestContext`] is an immutable snapshot of the current URL and its
//! decoded query parameters. It is built once by the host and handed to every
//! init listener, so nothing downstream reads process-wide request state.

use url::Url;

use crate::config::consts::{PARAM_NONCE, PARAM_WIDGET_AJAX, PARAM_WIDGET_ID};

/// Immutable snapshot of the current request URL.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    url: Url,
    query: Vec<(String, String)>,
}

impl RequestContext {
    /// Build a context from an already parsed URL.
    pub fn from_url(url: Url) -> Self {
        let query = url.query_pairs().into_owned().collect();
        Self { url, query }
    }

    /// Parse an absolute URL string into a context.
    pub fn parse(input: &str) -> Result<Self, url::ParseError> {
        Url::parse(input).map(Self::from_url)
    }

    /// The full current URL, query string included.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Decoded query pairs in the order they appeared.
    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    /// Value of a query parameter. When a key repeats, the last occurrence wins.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .rev()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// The three callback parameters, as they arrived.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallbackRequest {
    pub widget_class_name: Option<String>,
    pub nonce: Option<String>,
    pub widget_instance_id: Option<String>,
}

impl CallbackRequest {
    pub fn from_context(ctx: &RequestContext) -> Self {
        Self {
            widget_class_name: ctx.param(PARAM_WIDGET_AJAX).map(str::to_owned),
            nonce: ctx.param(PARAM_NONCE).map(str::to_owned),
            widget_instance_id: ctx.param(PARAM_WIDGET_ID).map(str::to_owned),
        }
    }

    /// The class name, if the trigger parameter is present and non-empty.
    pub fn class_name(&self) -> Option<&str> {
        self.widget_class_name.as_deref().filter(|name| !name.is_empty())
    }

    /// The instance id, if one was supplied and is non-empty.
    pub fn instance_id(&self) -> Option<&str> {
        self.widget_instance_id.as_deref().filter(|id| !id.is_empty())
    }

    /// The nonce, or an empty string when it was not supplied.
    pub fn nonce_or_empty(&self) -> &str {
        self.nonce.as_deref().unwrap_or("")
    }
}
