// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 mp-builder contributors

//! # mp-builder - Meta-pipeline builder
//!
//! `mp-builder` assembles independently developed workflows (nf-core style
//! pipelines) into a meta-pipeline: a directed acyclic graph of steps hanging
//! off a virtual start node, where each edge says how one step feeds the next.
//!
//! ## Features
//!
//! - **Declarative documents** - YAML steps and transitions, validated with every issue reported at once
//! - **Workflow graph** - cycle checks, execution order, cascading removal
//! - **Layout** - deterministic columns and connector glyphs, drawable as text
//! - **Pipeline catalog** - soft validation against the nf-core catalog
//!
//! ## Quick Start
//!
//! ```bash
//! # Create a starter document
//! mp-builder init
//!
//! # Validate it and draw it
//! mp-builder validate
//! mp-builder graph --format ascii
//!
//! # Append a step after the start node
//! mp-builder add-step --parent node0 --pipeline sarek --pipeline-version 3.4.0
//! ```

pub mod catalog;
pub mod cli;
pub mod config;
pub mod editor;
pub mod errors;
pub mod graph;
pub mod layout;
pub mod settings;
pub mod snapshot;
pub mod utils;

// Re-export commonly used types
pub use catalog::{Catalog, CatalogEntry};
pub use config::{load_config, MetaworkflowConfig, ValidatedConfig};
pub use editor::{GraphEditor, GraphEvent};
pub use errors::{MpBuilderError, MpBuilderResult};
pub use graph::{WorkflowGraph, WorkflowNode, ROOT_ID};
pub use layout::{Layout, LayoutEngine};
pub use snapshot::GraphSnapshot;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
