// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::env;

use anyhow::Context;
use widget_ajax::config::load_and_validate_config;
use widget_ajax::hooks::ActionHooks;
use widget_ajax::observability::init_tracing;
use widget_ajax::registry::WidgetRegistry;
use widget_ajax::server::WidgetHost;
use widget_ajax::widgets::register_builtin_widgets;

#[tokio::main]
async fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() != 2 {
        eprintln!("Usage: {} <config.yaml>", args[0]);
        eprintln!("Example: {} configs/widget-ajax.yaml", args[0]);
        eprintln!("The nonce secret may come from WIDGET_AJAX_NONCE_SECRET instead of the file.");
        std::process::exit(1);
    }

    init_tracing();

    if let Err(e) = run(&args[1]).await {
        eprintln!("❌ {:#}", e);
        std::process::exit(1);
    }
}

async fn run(config_file: &str) -> anyhow::Result<()> {
    let mut registry = WidgetRegistry::new();
    register_builtin_widgets(&mut registry)?;

    let config = load_and_validate_config(config_file, &registry)
        .with_context(|| format!("failed to load {}", config_file))?;

    let host = WidgetHost::from_config(&config, registry, ActionHooks::new())?;
    host.serve().await?;

    Ok(())
}
