// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 mp-builder contributors

//! Meta-pipeline document structures
//!
//! Defines the schema for `metapipeline.yaml` files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::errors::MpBuilderResult;

/// Meta-pipeline definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaworkflowConfig {
    /// Document format version, `MAJOR.MINOR.PATCH`
    pub config_version: String,

    /// Declared workflow steps
    #[serde(default)]
    pub workflows: Vec<Workflow>,

    /// Options passed to every workflow
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_opts: Option<WorkflowOptions>,

    /// User supplied options passed to every workflow
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_opts_custom: Option<WorkflowOptions>,

    /// Transitions between workflows
    #[serde(default)]
    pub transitions: Vec<Transition>,
}

impl MetaworkflowConfig {
    /// An empty document at the newest supported version
    pub fn empty() -> Self {
        Self {
            config_version: super::CONFIG_VERSION_MAX.to_string(),
            workflows: Vec::new(),
            workflow_opts: None,
            workflow_opts_custom: None,
            transitions: Vec::new(),
        }
    }

    /// Parse a document from YAML without semantic validation
    pub fn from_yaml(yaml: &str) -> MpBuilderResult<Self> {
        serde_yaml::from_str(yaml).map_err(Into::into)
    }

    /// Serialize the document to YAML
    pub fn to_yaml(&self) -> MpBuilderResult<String> {
        serde_yaml::to_string(self).map_err(Into::into)
    }

    /// Convert to the generic document form accepted by the validator
    pub fn to_value(&self) -> MpBuilderResult<serde_json::Value> {
        serde_json::to_value(self).map_err(Into::into)
    }
}

/// A single workflow step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    /// Unique step id
    pub id: String,

    /// Pipeline name, looked up in the catalog
    pub name: String,

    /// Pipeline version or revision
    pub version: String,

    /// Repository URL or local path of the pipeline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline_location: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Workflow {
    /// The explicit pipeline location, ignoring blank values
    pub fn location(&self) -> Option<&str> {
        self.pipeline_location
            .as_deref()
            .filter(|loc| !loc.trim().is_empty())
    }
}

/// Options string passed through to workflows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowOptions {
    pub wf_opts: String,
}

/// A transition feeding one workflow into the next
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    /// Target workflow id
    pub run: String,

    /// Source workflow id; the root when absent
    #[serde(rename = "from", default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,

    /// How the output of `from` is adapted for `run`
    #[serde(flatten)]
    pub metadata: TransitionMetadata,
}

/// Opaque transition metadata, carried by the graph and restored verbatim
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransitionMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adapter: Option<String>,

    #[serde(rename = "params-file", default, skip_serializing_if = "Option::is_none")]
    pub params_file: Option<PathBuf>,

    #[serde(rename = "config-file", default, skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Vec<serde_json::Map<String, serde_json::Value>>>,
}

impl TransitionMetadata {
    /// Overwrite every field that `other` sets, keeping the rest
    pub fn merge(&mut self, other: &TransitionMetadata) {
        if other.adapter.is_some() {
            self.adapter = other.adapter.clone();
        }
        if other.params_file.is_some() {
            self.params_file = other.params_file.clone();
        }
        if other.config_file.is_some() {
            self.config_file = other.config_file.clone();
        }
        if other.params.is_some() {
            self.params = other.params.clone();
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
