// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use html_escape::encode_text;

/// Full-page fatal error, shown when a widget callback fails.
pub(crate) fn fatal_page(message: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>Error</title></head>\
         <body id=\"error-page\"><p>{}</p></body></html>",
        encode_text(message)
    )
}

pub(crate) fn index_page(fragments: &[String]) -> String {
    format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>Widgets</title></head>\
         <body><main>{}</main></body></html>",
        fragments.join("\n")
    )
}
