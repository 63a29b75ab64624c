// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 mp-builder contributors

//! Textual exports of the workflow graph (Mermaid, DOT, execution plan)

use super::WorkflowGraph;
use crate::errors::MpBuilderResult;

impl WorkflowGraph {
    /// Generate Mermaid diagram of the graph
    pub fn to_mermaid(&self) -> String {
        let mut out = String::from("graph LR\n");

        for node in self.nodes() {
            out.push_str(&format!("    {}[\"{}\"]\n", node.id, mermaid_escape(&node.label())));
        }

        for (source, target, meta) in self.edges() {
            match &meta.adapter {
                Some(adapter) => {
                    out.push_str(&format!(
                        "    {} -->|{}| {}\n",
                        source,
                        mermaid_escape(adapter),
                        target
                    ))
                }
                None => out.push_str(&format!("    {} --> {}\n", source, target)),
            }
        }

        out
    }

    /// Generate DOT diagram of the graph
    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph metapipeline {\n");
        out.push_str("    rankdir=LR;\n");
        out.push_str("    node [shape=box, style=rounded];\n\n");

        for node in self.nodes() {
            out.push_str(&format!(
                "    \"{}\" [label=\"{}\"];\n",
                dot_escape(&node.id),
                dot_escape(&node.label())
            ));
        }

        for (source, target, _) in self.edges() {
            out.push_str(&format!(
                "    \"{}\" -> \"{}\";\n",
                dot_escape(source),
                dot_escape(target)
            ));
        }

        out.push_str("}\n");
        out
    }

    /// Generate text representation of execution order
    pub fn to_text(&self) -> MpBuilderResult<String> {
        let order = self.execution_order()?;
        let mut out = String::new();

        for (i, id) in order.iter().enumerate() {
            let Some(node) = self.node(id) else { continue };
            let after: Vec<&str> = self
                .predecessors(id)
                .unwrap_or_default()
                .into_iter()
                .filter(|p| self.node(p).is_some_and(|n| !n.is_root))
                .collect();

            out.push_str(&format!("{}. {} ({})", i + 1, node.id, node.label()));

            if !after.is_empty() {
                out.push_str(&format!(" [after: {}]", after.join(", ")));
            }

            out.push('\n');
        }

        Ok(out)
    }
}

/// Mermaid has no backslash escapes inside `["..."]`; quotes become entities
fn mermaid_escape(text: &str) -> String {
    text.replace('"', "#quot;")
}

fn dot_escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}
