// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 mp-builder contributors

//! Structure-changed notifications

use std::fmt;

/// A committed change to the graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphEvent {
    StepAdded { id: String, parent: String },
    /// The removed step first, then its descendants
    StepsRemoved { ids: Vec<String> },
    StepRenamed { id: String, name: String },
    PipelineBound { id: String, name: String, version: String },
    TransitionUpdated { source: String, target: String },
}

impl GraphEvent {
    /// Whether the change moves nodes around, so a layout must be recomputed
    pub fn is_structural(&self) -> bool {
        matches!(self, GraphEvent::StepAdded { .. } | GraphEvent::StepsRemoved { .. })
    }
}

impl fmt::Display for GraphEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphEvent::StepAdded { id, parent } => write!(f, "added {} after {}", id, parent),
            GraphEvent::StepsRemoved { ids } => write!(f, "removed {}", ids.join(", ")),
            GraphEvent::StepRenamed { id, name } => write!(f, "renamed {} to {}", id, name),
            GraphEvent::PipelineBound { id, name, version } => {
                write!(f, "bound {} to {} {}", id, name, version)
            }
            GraphEvent::TransitionUpdated { source, target } => {
                write!(f, "updated transition {} → {}", source, target)
            }
        }
    }
}
