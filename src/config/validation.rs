// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 mp-builder contributors

//! Document validation
//!
//! Walks the raw document so that every schema problem is reported in one
//! pass, then checks workflow names against the pipeline catalog.

use serde_json::{Map, Value};
use std::collections::HashSet;

use super::{ConfigVersion, MetaworkflowConfig};
use crate::catalog::{Catalog, CatalogEntry};
use crate::errors::{FieldIssue, MpBuilderError, MpBuilderResult};
use crate::graph::ROOT_ID;

const WORKFLOW_FIELDS: &[&str] = &["id", "name", "version", "pipeline_location", "description"];
const WORKFLOW_REQUIRED: &[&str] = &["id", "name", "version"];
const TRANSITION_FIELDS: &[&str] = &["run", "from", "adapter", "params-file", "config-file", "params"];
const OPTIONS_FIELDS: &[&str] = &["wf_opts"];

/// A document that passed validation
#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    pub config: MetaworkflowConfig,
    pub version: ConfigVersion,
    /// Catalog snapshot used during validation
    pub catalog: Vec<CatalogEntry>,
    /// Non-fatal findings
    pub warnings: Vec<String>,
}

impl ValidatedConfig {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Validates declarative documents
pub struct ConfigValidator<'a> {
    catalog: &'a dyn Catalog,
}

impl<'a> ConfigValidator<'a> {
    pub fn new(catalog: &'a dyn Catalog) -> Self {
        Self { catalog }
    }

    /// Validate a raw document.
    ///
    /// Schema problems are aggregated into a single
    /// [`MpBuilderError::SchemaValidation`]. Only a schema-clean document is
    /// checked against the catalog.
    pub fn validate(&self, document: &Value) -> MpBuilderResult<ValidatedConfig> {
        let mut issues = Vec::new();
        let version = check_schema(document, &mut issues);

        if !issues.is_empty() {
            return Err(MpBuilderError::SchemaValidation { issues });
        }

        let config: MetaworkflowConfig = serde_json::from_value(document.clone())?;
        let version = match version {
            Some(v) => v,
            None => {
                return Err(MpBuilderError::schema(
                    "config_version",
                    "missing required field",
                ))
            }
        };

        let catalog = self.catalog.lookup();
        let warnings = check_catalog(&config, &catalog)?;

        Ok(ValidatedConfig {
            config,
            version,
            catalog,
            warnings,
        })
    }

    /// Validate an already typed document
    pub fn validate_config(&self, config: &MetaworkflowConfig) -> MpBuilderResult<ValidatedConfig> {
        self.validate(&config.to_value()?)
    }
}

fn check_schema(document: &Value, issues: &mut Vec<FieldIssue>) -> Option<ConfigVersion> {
    let Some(root) = document.as_object() else {
        issues.push(FieldIssue::new("", "document must be a mapping"));
        return None;
    };

    let version = match root.get("config_version") {
        None => {
            issues.push(FieldIssue::new("config_version", "missing required field"));
            None
        }
        Some(Value::String(raw)) => match ConfigVersion::parse_supported(raw) {
            Ok(v) => Some(v),
            Err(reason) => {
                issues.push(FieldIssue::new("config_version", reason));
                None
            }
        },
        Some(_) => {
            issues.push(FieldIssue::new("config_version", "expected a string"));
            None
        }
    };

    let ids = check_workflows(root, issues);
    check_transitions(root, &ids, issues);

    for key in ["workflow_opts", "workflow_opts_custom"] {
        match root.get(key) {
            None | Some(Value::Null) => {}
            Some(Value::Object(opts)) => {
                check_entity(key, opts, OPTIONS_FIELDS, OPTIONS_FIELDS, issues);
                check_string(key, opts, "wf_opts", issues);
            }
            Some(_) => issues.push(FieldIssue::new(key, "expected a mapping")),
        }
    }

    version
}

fn list<'v>(root: &'v Map<String, Value>, key: &str, issues: &mut Vec<FieldIssue>) -> &'v [Value] {
    match root.get(key) {
        Some(Value::Array(items)) => items,
        Some(_) => {
            issues.push(FieldIssue::new(key, "expected a list"));
            &[]
        }
        None => {
            issues.push(FieldIssue::new(key, "missing required field"));
            &[]
        }
    }
}

fn check_entity(
    path: &str,
    entity: &Map<String, Value>,
    known: &[&str],
    required: &[&str],
    issues: &mut Vec<FieldIssue>,
) {
    for key in entity.keys() {
        if !known.contains(&key.as_str()) {
            issues.push(FieldIssue::new(format!("{}.{}", path, key), "unknown field"));
        }
    }
    for key in required {
        if !entity.contains_key(*key) {
            issues.push(FieldIssue::new(
                format!("{}.{}", path, key),
                "missing required field",
            ));
        }
    }
}

fn check_string<'v>(
    path: &str,
    entity: &'v Map<String, Value>,
    key: &str,
    issues: &mut Vec<FieldIssue>,
) -> Option<&'v str> {
    match entity.get(key) {
        Some(Value::String(s)) => Some(s),
        // an explicit null is the same as leaving an optional field out
        Some(Value::Null) | None => None,
        Some(_) => {
            issues.push(FieldIssue::new(format!("{}.{}", path, key), "expected a string"));
            None
        }
    }
}

fn check_workflows(root: &Map<String, Value>, issues: &mut Vec<FieldIssue>) -> HashSet<String> {
    let mut ids = HashSet::new();

    for (i, item) in list(root, "workflows", issues).iter().enumerate() {
        let path = format!("workflows[{}]", i);
        let Some(wf) = item.as_object() else {
            issues.push(FieldIssue::new(path, "expected a mapping"));
            continue;
        };

        check_entity(&path, wf, WORKFLOW_FIELDS, WORKFLOW_REQUIRED, issues);
        for key in ["name", "version", "pipeline_location", "description"] {
            check_string(&path, wf, key, issues);
        }

        if let Some(id) = check_string(&path, wf, "id", issues) {
            if id.trim().is_empty() {
                issues.push(FieldIssue::new(format!("{}.id", path), "must not be empty"));
            } else if id == ROOT_ID {
                issues.push(FieldIssue::new(
                    format!("{}.id", path),
                    format!("'{}' is reserved for the root", ROOT_ID),
                ));
            } else if !ids.insert(id.to_string()) {
                issues.push(FieldIssue::new(
                    format!("{}.id", path),
                    format!("duplicate workflow id '{}'", id),
                ));
            }
        }
    }

    ids
}

fn check_transitions(root: &Map<String, Value>, ids: &HashSet<String>, issues: &mut Vec<FieldIssue>) {
    for (i, item) in list(root, "transitions", issues).iter().enumerate() {
        let path = format!("transitions[{}]", i);
        let Some(tr) = item.as_object() else {
            issues.push(FieldIssue::new(path, "expected a mapping"));
            continue;
        };

        check_entity(&path, tr, TRANSITION_FIELDS, &["run"], issues);
        for key in ["adapter", "params-file", "config-file"] {
            check_string(&path, tr, key, issues);
        }

        if let Some(run) = check_string(&path, tr, "run", issues) {
            if !ids.contains(run) {
                issues.push(FieldIssue::new(
                    format!("{}.run", path),
                    format!("references unknown workflow id '{}'", run),
                ));
            }
        }

        if let Some(from) = check_string(&path, tr, "from", issues) {
            if !ids.contains(from) {
                issues.push(FieldIssue::new(
                    format!("{}.from", path),
                    format!("references unknown workflow id '{}'", from),
                ));
            }
        }

        match tr.get("params") {
            None | Some(Value::Null) => {}
            Some(Value::Array(params)) => {
                for (j, p) in params.iter().enumerate() {
                    if !p.is_object() {
                        issues.push(FieldIssue::new(
                            format!("{}.params[{}]", path, j),
                            "expected a mapping",
                        ));
                    }
                }
            }
            Some(_) => issues.push(FieldIssue::new(format!("{}.params", path), "expected a list")),
        }
    }
}

/// Check workflow names against the catalog.
///
/// An empty catalog only produces a warning. With a reachable catalog,
/// unknown pipelines must carry an explicit location.
fn check_catalog(config: &MetaworkflowConfig, catalog: &[CatalogEntry]) -> MpBuilderResult<Vec<String>> {
    let mut warnings = Vec::new();

    if catalog.is_empty() {
        let msg = "Workflows could not be validated against the pipeline catalog".to_string();
        tracing::warn!("{}", msg);
        warnings.push(msg);
        return Ok(warnings);
    }

    let known: HashSet<&str> = catalog.iter().map(|e| e.name.as_str()).collect();
    let unknown: Vec<_> = config
        .workflows
        .iter()
        .filter(|w| !known.contains(w.name.as_str()))
        .collect();

    if unknown.is_empty() {
        return Ok(warnings);
    }

    let names: Vec<_> = unknown.iter().map(|w| w.name.as_str()).collect();
    let msg = format!(
        "Workflows not found in the pipeline catalog, compatibility is not guaranteed: {}",
        names.join(", ")
    );
    tracing::warn!("{}", msg);
    warnings.push(msg);

    let without_location: Vec<String> = unknown
        .iter()
        .filter(|w| w.location().is_none())
        .map(|w| w.name.clone())
        .collect();

    if !without_location.is_empty() {
        return Err(MpBuilderError::MissingPipelineLocation {
            names: without_location,
        });
    }

    Ok(warnings)
}
