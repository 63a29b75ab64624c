// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 mp-builder contributors

//! Watch command - re-validate and redraw on document changes

use colored::Colorize;
use miette::Result;
use notify::{RecursiveMode, Watcher};
use notify_debouncer_mini::{new_debouncer, DebouncedEventKind};
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::time::Duration;

use super::{graph::render, with_hint, GraphFormat};
use crate::catalog::{load_catalog, StaticCatalog};
use crate::config::load_config;
use crate::graph::WorkflowGraph;
use crate::settings::Settings;

/// Run the watch command
pub async fn run(config_path: PathBuf, debounce_ms: u64, settings: Settings, verbose: bool) -> Result<()> {
    if !config_path.exists() {
        return Err(miette::miette!(
            "Meta-pipeline document not found: {}\n\n\
             Run 'mp-builder init' to create one.",
            config_path.display()
        ));
    }

    println!("{}", "Starting watch mode...".bold());
    println!(
        "Watching {} for changes (debounce: {}ms)",
        config_path.display(),
        debounce_ms
    );
    println!("Press {} to exit.", "Ctrl+C".cyan());
    println!();

    // Look the catalog up once; every redraw reuses it
    let catalog = StaticCatalog::new(load_catalog(&settings).await);

    let (tx, rx) = channel();

    let mut debouncer = new_debouncer(Duration::from_millis(debounce_ms), tx)
        .map_err(|e| miette::miette!("Failed to create file watcher: {}", e))?;

    let watch_dir = match config_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    debouncer
        .watcher()
        .watch(&watch_dir, RecursiveMode::NonRecursive)
        .map_err(|e| miette::miette!("Failed to start watching: {}", e))?;

    redraw(&config_path, &catalog, &settings);

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let relevant = events
                    .iter()
                    .filter(|e| matches!(e.kind, DebouncedEventKind::Any))
                    .any(|e| same_file(&e.path, &config_path));

                if relevant {
                    println!();
                    println!("{}", "─".repeat(50).dimmed());
                    println!("{}: {}", "Change detected".yellow(), config_path.display());
                    println!();
                    redraw(&config_path, &catalog, &settings);
                } else if verbose {
                    tracing::debug!(events = events.len(), "Ignoring unrelated changes");
                }
            }
            Ok(Err(e)) => {
                eprintln!("{}: {:?}", "Watch error".red(), e);
            }
            Err(e) => {
                eprintln!("{}: {}", "Channel error".red(), e);
                break;
            }
        }
    }

    Ok(())
}

fn redraw(config_path: &Path, catalog: &StaticCatalog, settings: &Settings) {
    let start = std::time::Instant::now();

    let loaded = load_config(config_path, catalog)
        .and_then(|validated| WorkflowGraph::from_validated(&validated));

    let graph = match loaded {
        Ok(graph) => graph,
        Err(e) => {
            let e = with_hint(e);
            eprintln!("{}: {}", "Invalid meta-pipeline".red(), e);
            return;
        }
    };

    match render(&graph, GraphFormat::Ascii, settings) {
        Ok(drawing) => {
            println!("{}", drawing);
            println!(
                "{} ({} step(s), {:.2}s)",
                "Meta-pipeline is valid".green(),
                graph.step_count(),
                start.elapsed().as_secs_f64()
            );
        }
        Err(e) => eprintln!("{}: {}", "Failed to draw meta-pipeline".red(), e),
    }
}

fn same_file(changed: &Path, watched: &Path) -> bool {
    match (changed.canonicalize(), watched.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => changed.file_name() == watched.file_name(),
    }
}
