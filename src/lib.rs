// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod config;     // YAML config + validation
pub mod dispatch;   // widget callback dispatcher
pub mod errors;     // error handling
pub mod hooks;      // named action hooks
pub mod nonce;      // HMAC nonce tokens
pub mod observability;
pub mod pipeline;   // request-initialization phase
pub mod registry;   // widget class factories
pub mod request;    // request context + callback params
pub mod server;     // axum host
pub mod traits;     // unified abstractions
pub mod widgets;    // built-in demo widgets
