// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 mp-builder contributors

//! Layered layout of the workflow graph
//!
//! Each node gets a depth (column) and a breadth (slot within the column),
//! derived from a depth-first walk that numbers leaves in visitation order.
//! Columns are then built from BFS layers, padded with spacer slots so that
//! nodes line up with their ancestors, and joined by synthesized connector
//! glyphs. The layout is a pure function of the graph structure and is
//! recomputed from scratch after every change.

mod connector;
mod render;

pub use connector::{
    Connector, ARROW, BLANK, BRANCH_FIRST, BRANCH_LAST, BRANCH_MID, CONNECTOR_WIDTH, VERTICAL,
};

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use crate::graph::WorkflowGraph;

/// Default node box height, in text lines
pub const NODE_HEIGHT: usize = 5;

/// Default node box width, in characters
pub const NODE_WIDTH: usize = 24;

/// Placement of a node
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Position {
    pub depth: usize,
    pub breadth: usize,
}

/// One slot of a column
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    /// Empty space the height of a node
    Spacer,
    /// A node, by id
    Node(String),
}

/// A drawn layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub slots: Vec<Slot>,
    /// Connector to the next column; `None` for the last one
    pub connector: Option<Connector>,
}

impl Column {
    /// Ids of the nodes drawn in this column, top to bottom
    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().filter_map(|slot| match slot {
            Slot::Node(id) => Some(id.as_str()),
            Slot::Spacer => None,
        })
    }
}

/// Result of a layout pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    positions: BTreeMap<String, Position>,
    columns: Vec<Column>,
    detached: Vec<String>,
    node_height: usize,
    node_width: usize,
}

impl Layout {
    pub fn position(&self, id: &str) -> Option<Position> {
        self.positions.get(id).copied()
    }

    pub fn positions(&self) -> &BTreeMap<String, Position> {
        &self.positions
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Nodes not reachable from the root; they get no column
    pub fn detached(&self) -> &[String] {
        &self.detached
    }

    pub fn node_height(&self) -> usize {
        self.node_height
    }

    pub fn node_width(&self) -> usize {
        self.node_width
    }
}

/// Computes [`Layout`]s
#[derive(Debug, Clone, Copy)]
pub struct LayoutEngine {
    node_height: usize,
    node_width: usize,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new(NODE_HEIGHT, NODE_WIDTH)
    }
}

impl LayoutEngine {
    /// Node boxes need at least three lines (borders plus one text line)
    pub fn new(node_height: usize, node_width: usize) -> Self {
        Self {
            node_height: node_height.max(3),
            node_width: node_width.max(8),
        }
    }

    /// Lay out a graph that already passed [`WorkflowGraph::validate`]
    pub fn compute(&self, graph: &WorkflowGraph) -> Layout {
        let positions = assign_positions(graph);
        let columns = self.build_columns(graph, &positions);

        let placed: HashSet<&str> = columns.iter().flat_map(|c| c.node_ids()).collect();
        let detached = graph
            .node_ids()
            .into_iter()
            .filter(|id| !placed.contains(id))
            .map(String::from)
            .collect();

        tracing::debug!(columns = columns.len(), "Computed layout");

        Layout {
            positions: positions
                .into_iter()
                .map(|(id, pos)| (id.to_string(), pos))
                .collect(),
            columns,
            detached,
            node_height: self.node_height,
            node_width: self.node_width,
        }
    }

    fn build_columns(&self, graph: &WorkflowGraph, positions: &HashMap<&str, Position>) -> Vec<Column> {
        let Some(root) = graph.node_ids().first().copied() else {
            return Vec::new();
        };

        let pos = |id: &str| positions.get(id).copied().unwrap_or_default();
        let mut layers = bfs_layers(graph, root);
        let mut drawn: Vec<Vec<&str>> = Vec::with_capacity(layers.len());
        let mut columns = Vec::with_capacity(layers.len());

        for i in 0..layers.len() {
            let mut layer = std::mem::take(&mut layers[i]);
            layer.sort_by_key(|id| pos(id).breadth);
            let has_next = i + 1 < layers.len();

            let mut slots = Vec::new();
            let mut nodes = Vec::new();
            for id in layer {
                let p = pos(id);

                // reachable through a longer path too: draw it further right
                if p.depth > i && has_next {
                    layers[i + 1].push(id);
                    continue;
                }

                while slots.len() < p.breadth {
                    slots.push(Slot::Spacer);
                }
                slots.push(Slot::Node(id.to_string()));
                nodes.push(id);
            }

            drawn.push(nodes);
            columns.push(Column {
                slots,
                connector: None,
            });
        }

        for (i, nodes) in drawn.iter().enumerate().take(columns.len().saturating_sub(1)) {
            let in_breadths: Vec<usize> = nodes.iter().map(|id| pos(id).breadth).collect();
            let out_breadths: Vec<Vec<usize>> = nodes
                .iter()
                .map(|id| {
                    let mut children: Vec<usize> = graph
                        .successors(id)
                        .unwrap_or_default()
                        .into_iter()
                        .map(|child| pos(child).breadth)
                        .collect();
                    children.sort_unstable();
                    children
                })
                .collect();

            columns[i].connector = Some(Connector::synthesize(
                &in_breadths,
                &out_breadths,
                self.node_height,
            ));
        }

        columns
    }
}

/// Assign depth and breadth to every node reachable from the first node.
///
/// Worklist walk: successors are pushed to the front, so the walk is depth
/// first. A node's depth is one more than the deepest of its ancestors as
/// recorded *so far*; ancestors not yet visited count as depth 0. In
/// diamond-shaped graphs this can place a node shallower than its longest
/// path from the root. Breadth is the number of leaves visited before it.
fn assign_positions(graph: &WorkflowGraph) -> HashMap<&str, Position> {
    let mut positions: HashMap<&str, Position> = graph
        .node_ids()
        .into_iter()
        .map(|id| (id, Position::default()))
        .collect();
    let mut visited: HashSet<&str> = HashSet::new();

    let Some(root) = graph.node_ids().first().copied() else {
        return positions;
    };

    let mut worklist = VecDeque::from([root]);
    let mut leaves = 0;

    while let Some(current) = worklist.pop_front() {
        if !visited.insert(current) {
            continue;
        }

        let depth = graph
            .ancestors(current)
            .unwrap_or_default()
            .into_iter()
            .map(|a| positions.get(a).map_or(0, |p| p.depth) + 1)
            .max()
            .unwrap_or(0);

        positions.insert(
            current,
            Position {
                depth,
                breadth: leaves,
            },
        );

        let successors = graph.successors(current).unwrap_or_default();
        if successors.is_empty() {
            leaves += 1;
        }
        for next in successors.into_iter().rev() {
            worklist.push_front(next);
        }
    }

    positions
}

/// Nodes grouped by edge distance from `root`
fn bfs_layers<'g>(graph: &'g WorkflowGraph, root: &'g str) -> Vec<Vec<&'g str>> {
    let mut seen: HashSet<&str> = HashSet::from([root]);
    let mut layers = Vec::new();
    let mut current = vec![root];

    while !current.is_empty() {
        let mut next = Vec::new();
        for id in &current {
            for child in graph.successors(id).unwrap_or_default() {
                if seen.insert(child) {
                    next.push(child);
                }
            }
        }
        layers.push(current);
        current = next;
    }

    layers
}
