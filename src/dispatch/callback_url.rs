// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use url::Url;

use crate::config::consts::{PARAM_NONCE, PARAM_WIDGET_AJAX, PARAM_WIDGET_ID};
use crate::traits::NonceIssuer;

/// Callback URL for a widget instance.
///
/// Sets `widget_ajax`, `widget_id` and a fresh `nonce` scoped to `class_name`
/// on top of `current`. Other query parameters are kept. An empty
/// `widget_id` drops that parameter instead of sending it blank.
///
/// ```
/// use widget_ajax::dispatch::ajax_url;
/// use widget_ajax::nonce::HmacNonces;
/// use url::Url;
///
/// let nonces = HmacNonces::new(b"doc-example-secret-value", 86_400).unwrap();
/// let current = Url::parse("http://example.test/blog?page=2").unwrap();
///
/// let url = ajax_url(&current, "echo", "echo-1", &nonces);
/// assert!(url.as_str().starts_with("http://example.test/blog?page=2&widget_ajax=echo&widget_id=echo-1&nonce="));
/// ```
pub fn ajax_url(current: &Url, class_name: &str, widget_id: &str, nonces: &dyn NonceIssuer) -> Url {
    let widget_id = Some(widget_id.to_string()).filter(|id| !id.is_empty());
    add_query_args(
        current,
        &[
            (PARAM_WIDGET_AJAX, Some(class_name.to_string())),
            (PARAM_WIDGET_ID, widget_id),
            (PARAM_NONCE, Some(nonces.create(class_name))),
        ],
    )
}

/// Replace query parameters on a URL. `None` removes the key.
pub fn add_query_args(current: &Url, args: &[(&str, Option<String>)]) -> Url {
    let kept: Vec<(String, String)> = current
        .query_pairs()
        .into_owned()
        .filter(|(key, _)| !args.iter().any(|(name, _)| name == key))
        .collect();

    let mut url = current.clone();
    {
        let mut pairs = url.query_pairs_mut();
        pairs.clear();
        pairs.extend_pairs(kept);
        for (name, value) in args {
            if let Some(value) = value {
                pairs.append_pair(name, value);
            }
        }
    }

    if url.query() == Some("") {
        url.set_query(None);
    }
    url
}
