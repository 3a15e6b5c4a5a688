//! Configuration validation for the widget host.
//!
//! The checks run in a fixed order and every failure is collected, so a single
//! run reports all problems in the file:
//!
//! 1. **Nonce secret** - present (file or environment) and long enough to key an HMAC
//! 2. **Nonce lifetime** - splittable into two ticks of at least one second
//! 3. **Public base URL** - parses as an absolute URL
//! 4. **Widget instances** - unique ids, each naming a registered class
//!
//! # Example
//!
//! ```rust
//! use widget_ajax::config::{validate_config, Config};
//! use widget_ajax::errors::ValidationError;
//! use widget_ajax::registry::WidgetRegistry;
//!
//! let config: Config = serde_yaml::from_str(
//!     "nonce:\n  secret: short\nwidgets:\n  - class: echo\n    id: echo-1\n",
//! )
//! .unwrap();
//!
//! let errors = validate_config(&config, &WidgetRegistry::new()).unwrap_err();
//! assert!(errors.contains(&ValidationError::NonceSecretTooShort { length: 5, minimum: 16 }));
//! ```

use std::collections::HashSet;

use url::Url;

use crate::config::consts::MIN_NONCE_SECRET_LEN;
use crate::config::Config;
use crate::errors::ValidationError;
use crate::registry::WidgetRegistry;

/// Validates a loaded configuration against the registered widget classes.
///
/// # Returns
///
/// * `Ok(())` - Configuration is ready to serve
/// * `Err(Vec<ValidationError>)` - Every problem found
pub fn validate_config(config: &Config, registry: &WidgetRegistry) -> Result<(), Vec<ValidationError>> {
    let secret = config.nonce.resolve_secret();
    validate_with_secret(config, secret.as_deref(), registry)
}

fn validate_with_secret(
    config: &Config,
    secret: Option<&str>,
    registry: &WidgetRegistry,
) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match secret {
        None => errors.push(ValidationError::MissingNonceSecret),
        Some(secret) if secret.len() < MIN_NONCE_SECRET_LEN => {
            errors.push(ValidationError::NonceSecretTooShort {
                length: secret.len(),
                minimum: MIN_NONCE_SECRET_LEN,
            });
        }
        Some(_) => {}
    }

    if config.nonce.lifetime_seconds < 2 {
        errors.push(ValidationError::NonceLifetimeTooShort {
            lifetime_seconds: config.nonce.lifetime_seconds,
        });
    }

    if let Err(e) = Url::parse(&config.server.public_base_url) {
        errors.push(ValidationError::InvalidBaseUrl {
            value: config.server.public_base_url.clone(),
            reason: e.to_string(),
        });
    }

    if let Err(widget_errors) = validate_widget_instances(config, registry) {
        errors.extend(widget_errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Ids must be unique because they travel in `widget_id` and address the instance on the page.
fn validate_widget_instances(
    config: &Config,
    registry: &WidgetRegistry,
) -> Result<(), Vec<ValidationError>> {
    let mut seen_ids = HashSet::new();
    let mut errors = Vec::new();

    for widget in &config.widgets {
        if !seen_ids.insert(&widget.id) {
            errors.push(ValidationError::DuplicateWidgetId {
                widget_id: widget.id.clone(),
            });
        }
        if !registry.contains(&widget.class) {
            errors.push(ValidationError::UnknownWidgetClass {
                widget_id: widget.id.clone(),
                class_name: widget.class.clone(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
