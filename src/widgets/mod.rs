// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Widgets bundled with the host.

mod echo;
mod hit_counter;

pub use echo::EchoWidget;
pub use hit_counter::HitCounterWidget;

use std::sync::atomic::AtomicU64;
use std::sync::Arc;

use crate::errors::RegistryError;
use crate::registry::WidgetRegistry;

pub const ECHO: &str = "echo";
pub const HIT_COUNTER: &str = "hit_counter";

/// Register every bundled widget class.
pub fn register_builtin_widgets(registry: &mut WidgetRegistry) -> Result<(), RegistryError> {
    registry.register(ECHO, |construction| Box::new(EchoWidget::new(construction)))?;

    // Shared across instances so the count outlives each request
    let hits = Arc::new(AtomicU64::new(0));
    registry.register(HIT_COUNTER, move |_| Box::new(HitCounterWidget::new(hits.clone())))?;

    Ok(())
}
