// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 mp-builder contributors

//! mp-builder - Meta-pipeline builder
//!
//! Assemble workflow steps into a validated DAG and draw it.

use clap::Parser;
use miette::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mp_builder::cli::{edit::NewStep, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_filter = if cli.verbose {
        "mp_builder=debug"
    } else {
        "mp_builder=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    if !mp_builder::utils::should_use_colors() {
        colored::control::set_override(false);
    }

    // Change to specified directory if provided
    if let Some(ref dir) = cli.directory {
        std::env::set_current_dir(dir).map_err(|e| {
            miette::miette!("Failed to change to directory '{}': {}", dir.display(), e)
        })?;
    }

    let settings = cli.resolve_settings()?;
    let verbose = cli.verbose;

    // Dispatch to command handlers
    match cli.command {
        Commands::Init { config, force } => mp_builder::cli::init::run(config, force, verbose).await,
        Commands::Validate { config } => {
            mp_builder::cli::validate::run(config, settings, verbose).await
        }
        Commands::Graph { config, format } => {
            mp_builder::cli::graph::run(config, format, settings, verbose).await
        }
        Commands::Order { config } => mp_builder::cli::order::run(config, settings, verbose).await,
        Commands::AddStep {
            config,
            parent,
            id,
            pipeline,
            pipeline_version,
            location,
        } => {
            let step = NewStep {
                parent,
                id,
                pipeline,
                pipeline_version,
                location,
            };
            mp_builder::cli::edit::add_step(config, step, settings, verbose).await
        }
        Commands::RemoveStep { id, config } => {
            mp_builder::cli::edit::remove_step(config, id, settings, verbose).await
        }
        Commands::Snapshot { action } => {
            mp_builder::cli::snapshot::run(action, settings, verbose).await
        }
        Commands::Catalog { filter, refresh } => {
            mp_builder::cli::catalog::run(filter, refresh, settings, verbose).await
        }
        Commands::Watch { config, debounce } => {
            mp_builder::cli::watch::run(config, debounce, settings, verbose).await
        }
    }
}
