// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 mp-builder contributors

//! Persisted graph snapshots
//!
//! A snapshot is an adjacency-list JSON document: the node list (root first,
//! insertion order) and, index-aligned with it, the outgoing transitions of
//! each node with their metadata. Unlike the declarative document it keeps
//! every node attribute, including catalog resolution.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::TransitionMetadata;
use crate::errors::{MpBuilderError, MpBuilderResult};
use crate::graph::{DocumentHeader, WorkflowGraph, WorkflowNode, ROOT_ID};

/// One outgoing transition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjacencyEntry {
    /// Target node id
    pub id: String,
    #[serde(flatten)]
    pub metadata: TransitionMetadata,
}

/// Serializable form of a [`WorkflowGraph`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub directed: bool,
    pub root: String,
    graph: DocumentHeader,
    pub nodes: Vec<WorkflowNode>,
    pub adjacency: Vec<Vec<AdjacencyEntry>>,
}

impl GraphSnapshot {
    pub fn from_graph(graph: &WorkflowGraph) -> Self {
        let nodes: Vec<WorkflowNode> = graph.nodes().cloned().collect();
        let adjacency = nodes
            .iter()
            .map(|node| {
                graph
                    .successors(&node.id)
                    .unwrap_or_default()
                    .into_iter()
                    .map(|target| AdjacencyEntry {
                        id: target.to_string(),
                        metadata: graph
                            .transition(&node.id, target)
                            .cloned()
                            .unwrap_or_default(),
                    })
                    .collect()
            })
            .collect();

        Self {
            directed: true,
            root: ROOT_ID.to_string(),
            graph: graph.header().clone(),
            nodes,
            adjacency,
        }
    }

    /// Rebuild the graph and validate it
    pub fn into_graph(self) -> MpBuilderResult<WorkflowGraph> {
        if !self.directed {
            return Err(snapshot_error("only directed graphs are supported"));
        }
        if self.root != ROOT_ID {
            return Err(snapshot_error(format!(
                "root must be '{}', found '{}'",
                ROOT_ID, self.root
            )));
        }
        if self.adjacency.len() != self.nodes.len() {
            return Err(snapshot_error(format!(
                "{} nodes but {} adjacency lists",
                self.nodes.len(),
                self.adjacency.len()
            )));
        }

        let mut graph = WorkflowGraph::new();
        graph.set_header(self.graph);

        let mut nodes = self.nodes.iter();
        match nodes.next() {
            Some(first) if first.id == ROOT_ID && first.is_root => {}
            _ => return Err(snapshot_error("the first node must be the root")),
        }
        for node in nodes {
            if node.is_root {
                return Err(snapshot_error(format!("'{}' is marked as root", node.id)));
            }
            graph.add_node(node.clone())?;
        }

        for (source, targets) in self.nodes.iter().zip(&self.adjacency) {
            for entry in targets {
                graph.add_edge(&source.id, &entry.id, &entry.metadata)?;
            }
        }

        graph.validate()?;
        Ok(graph)
    }

    pub fn to_json(&self) -> MpBuilderResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> MpBuilderResult<Self> {
        serde_json::from_str(json).map_err(|e| snapshot_error(e.to_string()))
    }

    pub fn save(&self, path: &Path) -> MpBuilderResult<()> {
        std::fs::write(path, self.to_json()?).map_err(|e| MpBuilderError::FileWriteError {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
        tracing::debug!(path = %path.display(), nodes = self.nodes.len(), "Saved snapshot");
        Ok(())
    }

    pub fn load(path: &Path) -> MpBuilderResult<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| MpBuilderError::FileReadError {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
        Self::from_json(&json)
    }
}

fn snapshot_error(message: impl Into<String>) -> MpBuilderError {
    MpBuilderError::Snapshot {
        message: message.into(),
    }
}
