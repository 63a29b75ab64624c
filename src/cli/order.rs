// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 mp-builder contributors

//! Order command - print steps in execution order

use colored::Colorize;
use miette::Result;
use std::path::PathBuf;

use super::open_graph;
use crate::settings::Settings;

pub async fn run(config_path: PathBuf, settings: Settings, verbose: bool) -> Result<()> {
    let (_, graph) = open_graph(&config_path, &settings).await?;
    let order = graph.execution_order()?;

    if order.is_empty() {
        println!("{}", "No steps defined.".dimmed());
        return Ok(());
    }

    for (i, id) in order.iter().enumerate() {
        if verbose {
            let label = graph.node(id).map(|n| n.label()).unwrap_or_default();
            println!("{}. {} {}", i + 1, id, format!("({})", label).dimmed());
        } else {
            println!("{}", id);
        }
    }
    Ok(())
}
