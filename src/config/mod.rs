// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 mp-builder contributors

//! Declarative meta-pipeline configuration
//!
//! Schema types for the step/transition document, version checks and the
//! aggregating validator that turns a raw document into a [`ValidatedConfig`].

mod document;
mod validation;
mod version;

pub use document::*;
pub use validation::{ConfigValidator, ValidatedConfig};
pub use version::{ConfigVersion, CONFIG_VERSION_MAX, CONFIG_VERSION_MIN};

use std::path::Path;

use crate::catalog::Catalog;
use crate::errors::{MpBuilderError, MpBuilderResult};

/// Read a document from disk and validate it against the catalog
pub fn load_config(path: &Path, catalog: &dyn Catalog) -> MpBuilderResult<ValidatedConfig> {
    let document = read_document(path)?;
    ConfigValidator::new(catalog).validate(&document)
}

/// Read a YAML document from disk without validating it
pub fn read_document(path: &Path) -> MpBuilderResult<serde_json::Value> {
    if !path.exists() {
        return Err(MpBuilderError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| MpBuilderError::FileReadError {
        path: path.to_path_buf(),
        error: e.to_string(),
    })?;

    parse_document(&content)
}

/// Parse a YAML (or JSON) string into a raw document
pub fn parse_document(content: &str) -> MpBuilderResult<serde_json::Value> {
    let value: serde_json::Value = serde_yaml::from_str(content)?;
    Ok(value)
}

/// Write a configuration to disk as YAML
pub fn dump_config(config: &MetaworkflowConfig, path: &Path) -> MpBuilderResult<()> {
    let yaml = config.to_yaml()?;
    std::fs::write(path, yaml).map_err(|e| MpBuilderError::FileWriteError {
        path: path.to_path_buf(),
        error: e.to_string(),
    })
}
