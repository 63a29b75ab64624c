// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 mp-builder contributors

//! Init command - create a starter meta-pipeline document

use colored::Colorize;
use miette::Result;
use std::path::PathBuf;

use crate::config::CONFIG_VERSION_MAX;

/// Run the init command
pub async fn run(config_path: PathBuf, force: bool, verbose: bool) -> Result<()> {
    println!("{}", "Initializing meta-pipeline...".bold());
    println!();

    if config_path.exists() && !force {
        return Err(miette::miette!(
            "{} already exists. Use --force to overwrite it.",
            config_path.display()
        ));
    }

    let content = generate_template();
    std::fs::write(&config_path, &content).map_err(|e| {
        miette::miette!("Failed to write {}: {}", config_path.display(), e)
    })?;

    println!("  {} Created {}", "✓".green(), config_path.display());
    println!();
    println!("{}", "Meta-pipeline initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Edit {} to list your workflows", config_path.display().to_string().cyan());
    println!("  2. Run {} to check it", "mp-builder validate".cyan());
    println!("  3. Run {} to see it", "mp-builder graph --format ascii".cyan());
    println!();

    if verbose {
        println!("{}", "Generated document:".dimmed());
        println!("{}", "─".repeat(50).dimmed());
        println!("{}", content.dimmed());
    }

    Ok(())
}

fn generate_template() -> String {
    format!(
        r#"# mp-builder meta-pipeline
#
# Workflows are the steps; transitions say which step feeds which.
# A transition without "from" starts right after the start node.

config_version: "{version}"

workflows:
  - id: preprocessing
    name: fetchngs
    version: "1.12.0"
    pipeline_location: https://github.com/nf-core/fetchngs
    description: Download raw reads

  - id: quantification
    name: rnaseq
    version: "3.14.0"
    pipeline_location: https://github.com/nf-core/rnaseq

transitions:
  - run: preprocessing

  - run: quantification
    from: preprocessing
    # adapter: samplesheet
    # params-file: params/rnaseq.yaml
"#,
        version = CONFIG_VERSION_MAX
    )
}
