// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 mp-builder contributors

//! CLI command definitions and handlers
//!
//! Defines the command-line interface for mp-builder.

pub mod catalog;
pub mod edit;
pub mod graph;
pub mod init;
pub mod order;
pub mod snapshot;
pub mod validate;
pub mod watch;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::{Path, PathBuf};

use crate::catalog::{load_catalog, StaticCatalog};
use crate::config::{load_config, ValidatedConfig};
use crate::errors::{MpBuilderError, MpBuilderResult};
use crate::graph::WorkflowGraph;
use crate::settings::Settings;
use crate::utils::print_warning;

/// Default meta-pipeline document
pub const DEFAULT_CONFIG: &str = "metaworkflow.yaml";

/// Meta-pipeline builder
///
/// Assemble nf-core style workflows into a validated DAG.
#[derive(Parser, Debug)]
#[clap(
    name = "mp-builder",
    version,
    about = "Assemble, validate and lay out meta-pipelines of workflow steps",
    long_about = None,
    after_help = "Examples:\n\
        mp-builder init                        Create metaworkflow.yaml\n\
        mp-builder validate                    Check the document\n\
        mp-builder graph --format ascii        Draw the meta-pipeline\n\
        mp-builder add-step --parent node0     Append a step after the start\n\n\
        See 'mp-builder <command> --help' for more information on a specific command."
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[clap(short, long, global = true)]
    pub verbose: bool,

    /// Change to directory before executing
    #[clap(short = 'C', long, global = true, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Never query the pipeline catalog over the network
    #[clap(long, global = true)]
    pub offline: bool,

    /// Pipeline catalog URL
    #[clap(long, global = true, env = "MP_BUILDER_CATALOG_URL", value_name = "URL")]
    pub catalog_url: Option<String>,

    /// Settings file (default: mp-builder.toml in the user config directory)
    #[clap(long, global = true, value_name = "FILE")]
    pub settings: Option<PathBuf>,
}

impl Cli {
    /// Settings from file, with command-line overrides applied
    pub fn resolve_settings(&self) -> MpBuilderResult<Settings> {
        let mut settings = Settings::load(self.settings.as_deref())?;
        if self.offline {
            settings.offline = true;
        }
        if let Some(url) = &self.catalog_url {
            settings.catalog_url = url.clone();
        }
        Ok(settings)
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a starter meta-pipeline document
    Init {
        /// Document to create
        #[clap(default_value = DEFAULT_CONFIG)]
        config: PathBuf,

        /// Overwrite an existing document
        #[clap(long)]
        force: bool,
    },

    /// Validate a meta-pipeline document
    Validate {
        /// Document to validate
        #[clap(default_value = DEFAULT_CONFIG)]
        config: PathBuf,
    },

    /// Show the meta-pipeline as a graph
    Graph {
        /// Document to draw
        #[clap(default_value = DEFAULT_CONFIG)]
        config: PathBuf,

        /// Output format
        #[clap(short, long, value_enum, default_value = "text")]
        format: GraphFormat,
    },

    /// Print the execution order of the steps
    Order {
        /// Document to order
        #[clap(default_value = DEFAULT_CONFIG)]
        config: PathBuf,
    },

    /// Add a step after an existing one and save the document
    AddStep {
        /// Document to edit
        #[clap(default_value = DEFAULT_CONFIG)]
        config: PathBuf,

        /// Step the new one runs after
        #[clap(short, long, default_value = crate::graph::ROOT_ID)]
        parent: String,

        /// Id of the new step (generated when omitted)
        #[clap(long)]
        id: Option<String>,

        /// Pipeline the step runs
        #[clap(long)]
        pipeline: Option<String>,

        /// Pipeline version
        #[clap(long, default_value = "", requires = "pipeline")]
        pipeline_version: String,

        /// Pipeline repository URL or local path
        #[clap(long, requires = "pipeline")]
        location: Option<String>,
    },

    /// Remove a step and everything downstream of it, then save the document
    RemoveStep {
        /// Step to remove
        id: String,

        /// Document to edit
        #[clap(default_value = DEFAULT_CONFIG)]
        config: PathBuf,
    },

    /// Save or restore graph snapshots
    Snapshot {
        #[clap(subcommand)]
        action: SnapshotAction,
    },

    /// List pipelines known to the catalog
    Catalog {
        /// Only show pipelines whose name contains this text
        filter: Option<String>,

        /// Ignore the cached catalog
        #[clap(long)]
        refresh: bool,
    },

    /// Watch mode - re-validate and redraw on document changes
    Watch {
        /// Document to watch
        #[clap(default_value = DEFAULT_CONFIG)]
        config: PathBuf,

        /// Debounce delay in milliseconds
        #[clap(long, default_value = "500")]
        debounce: u64,
    },
}

/// Snapshot actions
#[derive(Subcommand, Debug, Clone)]
pub enum SnapshotAction {
    /// Write the graph of a document to a snapshot file
    Save {
        /// Snapshot file to write
        output: PathBuf,

        /// Document to snapshot
        #[clap(short, long, default_value = DEFAULT_CONFIG)]
        config: PathBuf,
    },

    /// Restore a document from a snapshot file
    Load {
        /// Snapshot file to read
        input: PathBuf,

        /// Document to write (default: stdout)
        #[clap(short, long)]
        output: Option<PathBuf>,
    },
}

/// Graph output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GraphFormat {
    /// Numbered execution plan
    Text,
    /// Box drawing of the layout
    Ascii,
    Dot,
    Mermaid,
}

/// Validate a document and build its graph, printing catalog warnings
pub(crate) async fn open_graph(
    path: &Path,
    settings: &Settings,
) -> MpBuilderResult<(ValidatedConfig, WorkflowGraph)> {
    if !path.exists() {
        return Err(MpBuilderError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }

    let catalog = StaticCatalog::new(load_catalog(settings).await);
    let validated = load_config(path, &catalog)?;
    for warning in &validated.warnings {
        print_warning(warning);
    }

    let graph = WorkflowGraph::from_validated(&validated)?;
    Ok((validated, graph))
}

/// Print a recovery hint for `err`, if there is one, and hand it back
pub(crate) fn with_hint(err: MpBuilderError) -> MpBuilderError {
    if let Some(suggestion) = err.recovery() {
        eprintln!();
        eprint!("{}", suggestion.to_string().dimmed());
    }
    err
}
