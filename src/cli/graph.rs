// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 mp-builder contributors

//! Graph command - visualize the meta-pipeline

use miette::Result;
use std::path::PathBuf;

use super::{open_graph, GraphFormat};
use crate::graph::WorkflowGraph;
use crate::layout::LayoutEngine;
use crate::settings::Settings;
use crate::utils::print_warning;

/// Run the graph command
pub async fn run(config_path: PathBuf, format: GraphFormat, settings: Settings, _verbose: bool) -> Result<()> {
    let (_, graph) = open_graph(&config_path, &settings).await?;
    println!("{}", render(&graph, format, &settings)?);
    Ok(())
}

/// Render `graph` in the requested format
pub(crate) fn render(graph: &WorkflowGraph, format: GraphFormat, settings: &Settings) -> Result<String> {
    let output = match format {
        GraphFormat::Text => graph.to_text()?,
        GraphFormat::Dot => graph.to_dot(),
        GraphFormat::Mermaid => graph.to_mermaid(),
        GraphFormat::Ascii => {
            let layout = LayoutEngine::new(settings.node_height, settings.node_width).compute(graph);
            if !layout.detached().is_empty() {
                print_warning(&format!(
                    "Not reachable from the start: {}",
                    layout.detached().join(", ")
                ));
            }
            layout.render(graph)
        }
    };
    Ok(output)
}
