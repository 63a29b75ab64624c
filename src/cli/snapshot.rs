// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 mp-builder contributors

//! Snapshot command - save and restore graph snapshots

use miette::Result;

use super::{open_graph, with_hint, SnapshotAction};
use crate::config::dump_config;
use crate::settings::Settings;
use crate::snapshot::GraphSnapshot;
use crate::utils::print_success;

/// Run the snapshot command
pub async fn run(action: SnapshotAction, settings: Settings, _verbose: bool) -> Result<()> {
    match action {
        SnapshotAction::Save { output, config } => {
            let (_, graph) = open_graph(&config, &settings).await.map_err(with_hint)?;
            GraphSnapshot::from_graph(&graph).save(&output)?;
            print_success(&format!(
                "Saved {} step(s) to {}",
                graph.step_count(),
                output.display()
            ));
        }
        SnapshotAction::Load { input, output } => {
            let graph = GraphSnapshot::load(&input)?.into_graph().map_err(with_hint)?;
            let config = graph.to_config();
            match output {
                Some(path) => {
                    dump_config(&config, &path)?;
                    print_success(&format!("Restored {}", path.display()));
                }
                None => print!("{}", config.to_yaml()?),
            }
        }
    }
    Ok(())
}
