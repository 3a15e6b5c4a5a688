// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod config;
mod dispatch;
mod host;
mod registry;

pub use config::{ConfigError, ValidationError};
pub use dispatch::{DispatchError, WidgetError, AJAX_NOT_IMPLEMENTED};
pub use host::HostError;
pub use registry::{PipelineError, RegistryError};
