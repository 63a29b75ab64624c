// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 mp-builder contributors

//! Error recovery suggestions
//!
//! Provides actionable suggestions for recovering from errors.

use super::FieldIssue;

/// A recovery suggestion with concrete steps
#[derive(Debug, Clone)]
pub struct RecoverySuggestion {
    /// Brief description of what to do
    pub action: String,
    /// Detailed steps
    pub steps: Vec<String>,
    /// Commands to run
    pub commands: Vec<String>,
}

impl RecoverySuggestion {
    /// Suggest breaking a cycle between workflows
    pub fn break_cycle(cycle: &[String]) -> Self {
        Self {
            action: "Remove circular transition".into(),
            steps: vec![
                format!("Detected cycle: {}", cycle.join(" → ")),
                "Every transition must lead further downstream".into(),
                "Drop or redirect one transition along the cycle".into(),
            ],
            commands: vec![
                "# Visualize the meta-pipeline:".into(),
                "mp-builder graph --format mermaid".into(),
            ],
        }
    }

    /// Suggest adding a pipeline location to workflows outside the catalog
    pub fn add_pipeline_location(names: &[String]) -> Self {
        Self {
            action: "Bind workflows to a pipeline location".into(),
            steps: vec![
                format!("Not found in the pipeline catalog: {}", names.join(", ")),
                "Set 'pipeline_location' to a repository URL or a local path".into(),
            ],
            commands: vec![
                "# Example:".into(),
                "  pipeline_location: https://github.com/my-org/my-pipeline".into(),
            ],
        }
    }

    /// Suggest creating a configuration file
    pub fn create_config() -> Self {
        Self {
            action: "Create a meta-pipeline configuration".into(),
            steps: vec![
                "No configuration found at the given path".into(),
                "Initialize a new one or pass the path explicitly".into(),
            ],
            commands: vec![
                "# Initialize a starter configuration:".into(),
                "mp-builder init".into(),
            ],
        }
    }

    /// Suggest fixing schema issues
    pub fn fix_schema(issues: &[FieldIssue]) -> Self {
        Self {
            action: format!("Fix {} schema issue(s)", issues.len()),
            steps: issues.iter().map(|i| i.to_string()).collect(),
            commands: vec![],
        }
    }

    /// Suggest fixing a dangling transition
    pub fn fix_reference(source_id: &str, target_id: &str) -> Self {
        Self {
            action: format!("Fix transition {} -> {}", source_id, target_id),
            steps: vec![
                "Declare the missing workflow under 'workflows'".into(),
                "Or correct the 'from'/'run' id of the transition".into(),
            ],
            commands: vec![],
        }
    }
}

impl std::fmt::Display for RecoverySuggestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "→ {}", self.action)?;

        for step in &self.steps {
            writeln!(f, "  {}", step)?;
        }

        if !self.commands.is_empty() {
            writeln!(f)?;
            for cmd in &self.commands {
                writeln!(f, "  {}", cmd)?;
            }
        }

        Ok(())
    }
}
