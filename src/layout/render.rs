// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 mp-builder contributors

//! Plain-text rendering of a [`Layout`]

use super::{Column, Layout, Slot, CONNECTOR_WIDTH};
use crate::graph::WorkflowGraph;

impl Layout {
    /// Draw the layout as box-drawing text, one node box per slot.
    ///
    /// The node label sits on the middle line of its box so that it lines up
    /// with the connector arrows. Trailing whitespace is trimmed.
    pub fn render(&self, graph: &WorkflowGraph) -> String {
        let mut blocks: Vec<Vec<String>> = Vec::with_capacity(self.columns.len() * 2);

        for column in &self.columns {
            blocks.push(self.render_column(column, graph));
            if let Some(connector) = &column.connector {
                blocks.push(
                    connector
                        .lines()
                        .iter()
                        .map(|line| format!("{:<width$}", line, width = CONNECTOR_WIDTH))
                        .collect(),
                );
            }
        }

        let height = blocks.iter().map(Vec::len).max().unwrap_or(0);
        let widths: Vec<usize> = blocks
            .iter()
            .map(|b| b.iter().map(|l| l.chars().count()).max().unwrap_or(0))
            .collect();

        let mut out = String::new();
        for row in 0..height {
            let mut line = String::new();
            for (block, width) in blocks.iter().zip(&widths) {
                let cell = block.get(row).map(String::as_str).unwrap_or("");
                line.push_str(&format!("{:<width$}", cell, width = *width));
            }
            out.push_str(line.trim_end());
            out.push('\n');
        }
        out
    }

    fn render_column(&self, column: &Column, graph: &WorkflowGraph) -> Vec<String> {
        let mut lines = Vec::with_capacity(column.slots.len() * self.node_height);
        for slot in &column.slots {
            match slot {
                Slot::Spacer => {
                    lines.extend(std::iter::repeat(" ".repeat(self.node_width)).take(self.node_height))
                }
                Slot::Node(id) => {
                    let label = graph.node(id).map(|n| n.label()).unwrap_or_else(|| id.clone());
                    lines.extend(self.node_box(id, &label));
                }
            }
        }
        lines
    }

    fn node_box(&self, id: &str, label: &str) -> Vec<String> {
        let inner = self.node_width - 2;
        let middle = self.node_height / 2;
        let fit = |text: &str| -> String {
            let text: String = text.chars().take(inner).collect();
            format!("│{:^inner$}│", text, inner = inner)
        };

        let mut lines = Vec::with_capacity(self.node_height);
        lines.push(format!("┌{}┐", "─".repeat(inner)));
        for row in 1..self.node_height - 1 {
            if row == middle {
                lines.push(fit(label));
            } else if row + 1 == middle && id != label {
                lines.push(fit(id));
            } else {
                lines.push(fit(""));
            }
        }
        lines.push(format!("└{}┘", "─".repeat(inner)));
        lines
    }
}
