// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

use super::PipelineError;

/// Errors raised while assembling or running the HTTP host.
#[derive(Error, Debug)]
pub enum HostError {
    /// Neither the config nor the environment supplied a nonce secret.
    #[error("No nonce secret configured")]
    MissingNonceSecret,

    /// The secret could not key the nonce HMAC.
    #[error("Invalid nonce key: {0}")]
    NonceKey(String),

    #[error("Invalid public base URL: {0}")]
    BaseUrl(#[from] url::ParseError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
}
