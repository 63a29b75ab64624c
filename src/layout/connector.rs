// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 mp-builder contributors

//! Connector glyphs between two adjacent layout columns
//!
//! A connector is a column of fixed-width text lines. Each upstream node
//! occupies `node_height` lines; its outgoing arrows start on its middle line.

/// One child: straight arrow
pub const ARROW: &str = "────→";
/// First of several children
pub const BRANCH_FIRST: &str = "──┬─→";
/// A child between the first and the last
pub const BRANCH_MID: &str = "  ├─→";
/// Last of several children
pub const BRANCH_LAST: &str = "  └─→";
/// Vertical continuation of a branch
pub const VERTICAL: &str = "  │  ";
/// Nothing drawn on this line
pub const BLANK: &str = "     ";

/// Width in characters of every connector line
pub const CONNECTOR_WIDTH: usize = 5;

/// Connector block between a column and the next one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connector {
    lines: Vec<&'static str>,
}

impl Connector {
    /// Synthesize the connector lines.
    ///
    /// `in_breadths` holds the breadth of each upstream node, top to bottom;
    /// `out_breadths[i]` the sorted breadths of the direct children of the
    /// i-th upstream node. Gaps in breadth are filled with blank lines (between
    /// upstream nodes) or vertical bars (inside one node's branch).
    pub fn synthesize(in_breadths: &[usize], out_breadths: &[Vec<usize>], node_height: usize) -> Self {
        debug_assert_eq!(in_breadths.len(), out_breadths.len());

        let mut lines = vec![""; node_height / 2];

        for (b, (in_breadth, children)) in in_breadths.iter().zip(out_breadths).enumerate() {
            let prev_breadth = if b == 0 {
                0
            } else {
                out_breadths[b - 1]
                    .last()
                    .copied()
                    .unwrap_or(in_breadths[b - 1])
            };

            // skip down to this node's slot
            for j in 0..in_breadth.saturating_sub(prev_breadth) {
                let rows = if j > 0 || b == 0 {
                    node_height
                } else {
                    node_height - 1
                };
                lines.extend(std::iter::repeat(BLANK).take(rows));
            }

            match children.len() {
                0 => lines.push(BLANK),
                1 => lines.push(ARROW),
                n => {
                    for (i, child) in children.iter().enumerate() {
                        if i == 0 {
                            lines.push(BRANCH_FIRST);
                            continue;
                        }

                        for j in 0..child.saturating_sub(children[i - 1]) {
                            let rows = if j > 0 { node_height } else { node_height - 1 };
                            lines.extend(std::iter::repeat(VERTICAL).take(rows));
                        }

                        lines.push(if i == n - 1 { BRANCH_LAST } else { BRANCH_MID });
                    }
                }
            }
        }

        Self { lines }
    }

    /// Lines top to bottom; the leading lines are empty strings
    pub fn lines(&self) -> &[&'static str] {
        &self.lines
    }

    pub fn height(&self) -> usize {
        self.lines.len()
    }
}

impl std::fmt::Display for Connector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
