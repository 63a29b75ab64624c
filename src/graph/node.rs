// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 mp-builder contributors

//! Graph node and edge payloads

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogEntry;
use crate::config::{TransitionMetadata, Workflow};

/// Id of the virtual root node
pub const ROOT_ID: &str = "node0";

/// A workflow step, or the virtual root
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowNode {
    pub id: String,

    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline_location: Option<String>,

    /// Whether `name` matched a catalog entry when the node was built
    #[serde(default)]
    pub is_cataloged: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Location supplied by the catalog; never exported to the document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_location: Option<String>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_root: bool,
}

impl WorkflowNode {
    /// The virtual root
    pub fn root() -> Self {
        Self {
            id: ROOT_ID.to_string(),
            name: String::new(),
            version: String::new(),
            pipeline_location: None,
            is_cataloged: false,
            description: None,
            catalog_location: None,
            is_root: true,
        }
    }

    /// A step not yet bound to any pipeline; its name defaults to the id
    pub fn placeholder(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            is_root: false,
            ..Self::root()
        }
    }

    /// Build a node from a declared workflow
    pub fn from_workflow(wf: &Workflow) -> Self {
        Self {
            id: wf.id.clone(),
            name: wf.name.clone(),
            version: wf.version.clone(),
            pipeline_location: wf.pipeline_location.clone(),
            is_cataloged: false,
            description: wf.description.clone(),
            catalog_location: None,
            is_root: false,
        }
    }

    /// The declared workflow this node was built from
    pub fn to_workflow(&self) -> Workflow {
        Workflow {
            id: self.id.clone(),
            name: self.name.clone(),
            version: self.version.clone(),
            pipeline_location: self.pipeline_location.clone(),
            description: self.description.clone(),
        }
    }

    /// Attach catalog metadata for a matching entry
    pub fn resolve(&mut self, entry: &CatalogEntry) {
        self.is_cataloged = true;
        self.catalog_location = Some(entry.location.clone());
        if self.description.is_none() && !entry.description.is_empty() {
            self.description = Some(entry.description.clone());
        }
    }

    /// Explicit location, falling back to the catalog's
    pub fn location(&self) -> Option<&str> {
        self.pipeline_location
            .as_deref()
            .filter(|loc| !loc.trim().is_empty())
            .or(self.catalog_location.as_deref())
    }

    /// Short label for renderers
    pub fn label(&self) -> String {
        if self.is_root {
            "START".to_string()
        } else if self.version.is_empty() || self.name == self.id {
            self.name.clone()
        } else {
            format!("{} {}", self.name, self.version)
        }
    }
}

/// Edge payload: transition metadata plus insertion sequence
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct EdgeData {
    pub metadata: TransitionMetadata,
    pub seq: u64,
}
