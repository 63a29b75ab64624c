// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 mp-builder contributors

//! add-step / remove-step commands - edit the document through the graph

use colored::Colorize;
use miette::Result;
use std::path::{Path, PathBuf};

use super::{open_graph, with_hint};
use crate::catalog::StaticCatalog;
use crate::config::{dump_config, ConfigValidator};
use crate::editor::{GraphEditor, PipelineBinding};
use crate::settings::Settings;
use crate::utils::{print_info, print_success};

/// Options for a new step
#[derive(Debug, Clone)]
pub struct NewStep {
    pub parent: String,
    pub id: Option<String>,
    pub pipeline: Option<String>,
    pub pipeline_version: String,
    pub location: Option<String>,
}

/// Run the add-step command
pub async fn add_step(config_path: PathBuf, step: NewStep, settings: Settings, verbose: bool) -> Result<()> {
    let mut editor = open_editor(&config_path, &settings).await?;

    let binding = step.pipeline.map(|name| PipelineBinding {
        name,
        version: step.pipeline_version,
        location: step.location,
    });
    let id = editor
        .add_bound_step(&step.parent, step.id.as_deref(), binding)
        .map_err(with_hint)?;

    save(&mut editor, &config_path, verbose)?;
    print_success(&format!("Added {} after {}", id.bold(), step.parent));
    Ok(())
}

/// Run the remove-step command
pub async fn remove_step(config_path: PathBuf, id: String, settings: Settings, verbose: bool) -> Result<()> {
    let mut editor = open_editor(&config_path, &settings).await?;

    let removed = editor.remove_step(&id).map_err(with_hint)?;

    save(&mut editor, &config_path, verbose)?;
    print_success(&format!("Removed {}", removed.join(", ").bold()));
    Ok(())
}

async fn open_editor(config_path: &Path, settings: &Settings) -> Result<GraphEditor> {
    let (validated, graph) = open_graph(config_path, settings).await.map_err(with_hint)?;
    Ok(GraphEditor::new(graph).with_catalog(validated.catalog))
}

fn save(editor: &mut GraphEditor, config_path: &Path, verbose: bool) -> Result<()> {
    let config = editor.graph().to_config();

    // Never write a document that would not load again
    let catalog = StaticCatalog::new(editor.catalog().to_vec());
    ConfigValidator::new(&catalog)
        .validate_config(&config)
        .map_err(with_hint)?;

    dump_config(&config, config_path)?;

    let events = editor.drain_events();
    if verbose {
        for event in events {
            print_info(&event.to_string());
        }
    }
    Ok(())
}
