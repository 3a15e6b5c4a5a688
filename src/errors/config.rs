// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;
use thiserror::Error;

/// Errors that can occur while validating a loaded configuration
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// No nonce secret in the file and none in the environment
    MissingNonceSecret,
    /// The nonce secret is too short to be useful as an HMAC key
    NonceSecretTooShort {
        /// Actual secret length in bytes
        length: usize,
        /// Required minimum length in bytes
        minimum: usize,
    },
    /// The nonce lifetime cannot be split into two ticks
    NonceLifetimeTooShort {
        /// Configured lifetime in seconds
        lifetime_seconds: u64,
    },
    /// A widget instance names a class that is not registered
    UnknownWidgetClass {
        /// The instance that references the class
        widget_id: String,
        /// The unregistered class name
        class_name: String,
    },
    /// Two widget instances share an id
    DuplicateWidgetId {
        /// The duplicate widget id
        widget_id: String,
    },
    /// The public base URL could not be parsed
    InvalidBaseUrl {
        /// The configured value
        value: String,
        /// Parser message
        reason: String,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::MissingNonceSecret => {
                write!(
                    f,
                    "No nonce secret configured: set 'nonce.secret' or the {} environment variable",
                    crate::config::consts::NONCE_SECRET_ENV
                )
            }
            ValidationError::NonceSecretTooShort { length, minimum } => {
                write!(
                    f,
                    "Nonce secret is {} bytes, at least {} are required",
                    length, minimum
                )
            }
            ValidationError::NonceLifetimeTooShort { lifetime_seconds } => {
                write!(
                    f,
                    "Nonce lifetime of {}s is too short, it must be at least 2 seconds",
                    lifetime_seconds
                )
            }
            ValidationError::UnknownWidgetClass {
                widget_id,
                class_name,
            } => {
                write!(
                    f,
                    "Widget '{}' uses class '{}' which is not registered",
                    widget_id, class_name
                )
            }
            ValidationError::DuplicateWidgetId { widget_id } => {
                write!(f, "Duplicate widget ID: '{}'", widget_id)
            }
            ValidationError::InvalidBaseUrl { value, reason } => {
                write!(f, "Invalid public base URL '{}': {}", value, reason)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Errors raised while loading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid YAML for [`crate::config::Config`].
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The file parsed but failed validation.
    #[error("Configuration validation failed:\n{}", join_errors(.0))]
    Invalid(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
