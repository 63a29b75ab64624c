// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 mp-builder contributors

//! Error types for mp-builder
//!
//! Every failure of the config model, the workflow graph and the editor is
//! surfaced as a typed [`MpBuilderError`] carrying a diagnostic code and a
//! hint on how to fix it.

mod recovery;

pub use recovery::RecoverySuggestion;

use miette::Diagnostic;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for mp-builder operations
pub type MpBuilderResult<T> = Result<T, MpBuilderError>;

/// A single schema problem found while validating a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    /// Dotted path to the offending field, e.g. `workflows[1].name`
    pub path: String,
    /// What is wrong with it
    pub message: String,
}

impl FieldIssue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

fn format_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(|issue| format!("  - {}", issue))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Main error type for mp-builder
#[derive(Error, Debug, Diagnostic)]
pub enum MpBuilderError {
    // ─────────────────────────────────────────────────────────────────────────
    // Config Model Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Configuration is invalid ({} issue(s)):\n{}", .issues.len(), format_issues(.issues))]
    #[diagnostic(
        code(mp_builder::schema_validation),
        help("Fix the listed fields and run 'mp-builder validate' again")
    )]
    SchemaValidation { issues: Vec<FieldIssue> },

    #[error("Workflows outside the catalog must specify a pipeline_location: {}", .names.join(", "))]
    #[diagnostic(
        code(mp_builder::missing_pipeline_location),
        help("Add a 'pipeline_location' (repository URL or local path) to each listed workflow")
    )]
    MissingPipelineLocation { names: Vec<String> },

    // ─────────────────────────────────────────────────────────────────────────
    // Graph Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Transition {source_id} -> {target_id} refers to an unknown workflow")]
    #[diagnostic(
        code(mp_builder::unknown_reference),
        help("Check that both ends of the transition are declared under 'workflows'")
    )]
    UnknownReference { source_id: String, target_id: String },

    #[error("Workflow graph contains a cycle: {}", .cycle.join(" → "))]
    #[diagnostic(
        code(mp_builder::cycle_detected),
        help("Remove one of the transitions along the cycle")
    )]
    CycleDetected { cycle: Vec<String> },

    #[error("Invalid workflow id: '{id}'")]
    #[diagnostic(
        code(mp_builder::invalid_identifier),
        help("Workflow ids must be non-empty strings and must not use the reserved root id")
    )]
    InvalidIdentifier { id: String },

    #[error("Workflow '{id}' is the start node and cannot be modified or removed")]
    #[diagnostic(code(mp_builder::protected_node))]
    ProtectedNode { id: String },

    #[error("Workflow '{id}' not found in graph")]
    #[diagnostic(code(mp_builder::node_not_found))]
    NodeNotFound { id: String },

    #[error("Workflow '{id}' already exists")]
    #[diagnostic(code(mp_builder::duplicate_node))]
    DuplicateNode { id: String },

    #[error("No transition from '{source_id}' to '{target_id}'")]
    #[diagnostic(code(mp_builder::edge_not_found))]
    EdgeNotFound { source_id: String, target_id: String },

    // ─────────────────────────────────────────────────────────────────────────
    // File Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("Configuration file not found: {path}")]
    #[diagnostic(
        code(mp_builder::config_not_found),
        help("Create one with 'mp-builder init'")
    )]
    ConfigNotFound { path: PathBuf },

    #[error("Failed to read file '{path}': {error}")]
    #[diagnostic(code(mp_builder::file_read_error))]
    FileReadError { path: PathBuf, error: String },

    #[error("Failed to write file '{path}': {error}")]
    #[diagnostic(code(mp_builder::file_write_error))]
    FileWriteError { path: PathBuf, error: String },

    #[error("Invalid graph snapshot: {message}")]
    #[diagnostic(code(mp_builder::snapshot_error))]
    Snapshot { message: String },

    #[error("Catalog error: {message}")]
    #[diagnostic(code(mp_builder::catalog_error))]
    Catalog { message: String },

    // ─────────────────────────────────────────────────────────────────────────
    // IO/System Errors
    // ─────────────────────────────────────────────────────────────────────────
    #[error("IO error: {message}")]
    #[diagnostic(code(mp_builder::io_error))]
    Io { message: String },

    #[error("YAML parsing error: {message}")]
    #[diagnostic(code(mp_builder::yaml_error))]
    Yaml { message: String },

    #[error("JSON parsing error: {message}")]
    #[diagnostic(code(mp_builder::json_error))]
    Json { message: String },

    #[error("TOML parsing error: {message}")]
    #[diagnostic(code(mp_builder::toml_error))]
    Toml { message: String },
}

impl From<std::io::Error> for MpBuilderError {
    fn from(e: std::io::Error) -> Self {
        Self::Io { message: e.to_string() }
    }
}

impl From<serde_yaml::Error> for MpBuilderError {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Yaml { message: e.to_string() }
    }
}

impl From<serde_json::Error> for MpBuilderError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json { message: e.to_string() }
    }
}

impl From<toml::de::Error> for MpBuilderError {
    fn from(e: toml::de::Error) -> Self {
        Self::Toml { message: e.to_string() }
    }
}

impl MpBuilderError {
    /// Build a schema error from a single issue
    pub fn schema(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::SchemaValidation {
            issues: vec![FieldIssue::new(path, message)],
        }
    }

    /// Suggest how the user can recover from this error, if we know
    pub fn recovery(&self) -> Option<RecoverySuggestion> {
        match self {
            Self::CycleDetected { cycle } => Some(RecoverySuggestion::break_cycle(cycle)),
            Self::MissingPipelineLocation { names } => {
                Some(RecoverySuggestion::add_pipeline_location(names))
            }
            Self::ConfigNotFound { .. } => Some(RecoverySuggestion::create_config()),
            Self::SchemaValidation { issues } => Some(RecoverySuggestion::fix_schema(issues)),
            Self::UnknownReference {
                source_id,
                target_id,
            } => Some(RecoverySuggestion::fix_reference(source_id, target_id)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_lists_every_issue() {
        let err = MpBuilderError::SchemaValidation {
            issues: vec![
                FieldIssue::new("workflows[0].name", "missing required field"),
                FieldIssue::new("transitions[1].run", "unknown workflow id 'x'"),
            ],
        };

        let text = err.to_string();
        assert!(text.contains("2 issue(s)"));
        assert!(text.contains("workflows[0].name: missing required field"));
        assert!(text.contains("transitions[1].run: unknown workflow id 'x'"));
    }

    #[test]
    fn test_cycle_message_shows_path() {
        let err = MpBuilderError::CycleDetected {
            cycle: vec!["a".into(), "b".into(), "a".into()],
        };
        assert_eq!(err.to_string(), "Workflow graph contains a cycle: a → b → a");
        assert!(err.recovery().is_some());
    }
}
