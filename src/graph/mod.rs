// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 mp-builder contributors

//! Workflow graph
//!
//! The authoritative DAG of workflow steps. Nodes and edges live in an
//! indexed store (`petgraph::StableDiGraph`) keyed by workflow id, so removal
//! is a plain delete by id. Insertion order is tracked explicitly because the
//! execution order and the layout both break ties by it.

mod export;
mod node;

pub use node::{WorkflowNode, ROOT_ID};

use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::{Dfs, EdgeRef, IntoEdgeReferences, Walker};
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use crate::catalog::{find_entry, CatalogEntry};
use crate::config::{
    MetaworkflowConfig, Transition, TransitionMetadata, ValidatedConfig, WorkflowOptions,
    CONFIG_VERSION_MAX,
};
use crate::errors::{MpBuilderError, MpBuilderResult};
use node::EdgeData;

/// Document-level fields carried through a round trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct DocumentHeader {
    pub config_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_opts: Option<WorkflowOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflow_opts_custom: Option<WorkflowOptions>,
}

impl Default for DocumentHeader {
    fn default() -> Self {
        Self {
            config_version: CONFIG_VERSION_MAX.to_string(),
            workflow_opts: None,
            workflow_opts_custom: None,
        }
    }
}

/// DAG of workflow steps rooted at a virtual start node
#[derive(Debug, Clone)]
pub struct WorkflowGraph {
    graph: StableDiGraph<WorkflowNode, EdgeData>,
    index: HashMap<String, NodeIndex>,
    /// Node indices in insertion order; the root is always first
    order: Vec<NodeIndex>,
    next_edge_seq: u64,
    header: DocumentHeader,
}

impl WorkflowGraph {
    /// Create a graph holding only the root
    pub fn new() -> Self {
        let mut graph = Self {
            graph: StableDiGraph::new(),
            index: HashMap::new(),
            order: Vec::new(),
            next_edge_seq: 0,
            header: DocumentHeader::default(),
        };
        let root = graph.graph.add_node(WorkflowNode::root());
        graph.index.insert(ROOT_ID.to_string(), root);
        graph.order.push(root);
        graph
    }

    /// Build a graph from a validated document
    pub fn from_validated(validated: &ValidatedConfig) -> MpBuilderResult<Self> {
        Self::from_config(&validated.config, &validated.catalog)
    }

    /// Build a graph from a document.
    ///
    /// Transitions without `from` hang off the root. Repeated transitions
    /// between the same pair are merged field by field, last write wins.
    pub fn from_config(
        config: &MetaworkflowConfig,
        catalog: &[CatalogEntry],
    ) -> MpBuilderResult<Self> {
        let mut graph = Self::new();
        graph.header = DocumentHeader {
            config_version: config.config_version.clone(),
            workflow_opts: config.workflow_opts.clone(),
            workflow_opts_custom: config.workflow_opts_custom.clone(),
        };

        for wf in &config.workflows {
            let mut node = WorkflowNode::from_workflow(wf);
            if let Some(entry) = find_entry(catalog, &wf.name) {
                node.resolve(entry);
            }
            graph.add_node(node)?;
        }

        for transition in &config.transitions {
            let source = transition.from.as_deref().unwrap_or(ROOT_ID);
            let target = transition.run.as_str();

            let source_known = source == ROOT_ID || graph.contains(source);
            let target_known = target != ROOT_ID && graph.contains(target);
            if !source_known || !target_known {
                return Err(MpBuilderError::UnknownReference {
                    source_id: source.to_string(),
                    target_id: target.to_string(),
                });
            }

            graph.add_edge(source, target, &transition.metadata)?;
        }

        graph.validate()?;

        tracing::debug!(
            steps = graph.step_count(),
            transitions = graph.graph.edge_count(),
            "Built workflow graph"
        );

        Ok(graph)
    }

    pub(crate) fn header(&self) -> &DocumentHeader {
        &self.header
    }

    pub(crate) fn set_header(&mut self, header: DocumentHeader) {
        self.header = header;
    }

    /// Version of the document this graph was built from
    pub fn config_version(&self) -> &str {
        &self.header.config_version
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Validation
    // ─────────────────────────────────────────────────────────────────────────

    /// Check the structural invariants.
    ///
    /// Runs, in order: cycle check (including the root), dangling edge check,
    /// id well-formedness. The first failing class is returned.
    pub fn validate(&self) -> MpBuilderResult<()> {
        if let Some(cycle) = self.find_cycle() {
            return Err(MpBuilderError::CycleDetected { cycle });
        }

        for edge in self.graph.edge_references() {
            let source = &self.graph[edge.source()].id;
            let target = &self.graph[edge.target()].id;
            if self.index.get(source) != Some(&edge.source())
                || self.index.get(target) != Some(&edge.target())
            {
                return Err(MpBuilderError::UnknownReference {
                    source_id: source.clone(),
                    target_id: target.clone(),
                });
            }
        }

        for node in self.nodes() {
            if !node.is_root && (node.id.trim().is_empty() || node.id == ROOT_ID) {
                return Err(MpBuilderError::InvalidIdentifier {
                    id: node.id.clone(),
                });
            }
        }

        Ok(())
    }

    /// Find a cycle, returned as the node ids along it with the first repeated at the end
    pub fn find_cycle(&self) -> Option<Vec<String>> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Active,
            Done,
        }

        let mut marks: HashMap<NodeIndex, Mark> = HashMap::new();
        for &start in &self.order {
            if marks.contains_key(&start) {
                continue;
            }

            // Each frame is a node on the current path plus its unexplored successors
            let mut stack: Vec<(NodeIndex, std::vec::IntoIter<NodeIndex>)> = Vec::new();
            marks.insert(start, Mark::Active);
            stack.push((start, self.ordered_successors(start).into_iter()));

            while let Some((node, successors)) = stack.last_mut() {
                let node = *node;
                let Some(next) = successors.next() else {
                    marks.insert(node, Mark::Done);
                    stack.pop();
                    continue;
                };

                match marks.get(&next) {
                    Some(Mark::Active) => {
                        let from = stack.iter().position(|(n, _)| *n == next).unwrap_or(0);
                        let mut cycle: Vec<String> = stack[from..]
                            .iter()
                            .map(|(n, _)| self.graph[*n].id.clone())
                            .collect();
                        cycle.push(self.graph[next].id.clone());
                        return Some(cycle);
                    }
                    Some(Mark::Done) => {}
                    None => {
                        marks.insert(next, Mark::Active);
                        stack.push((next, self.ordered_successors(next).into_iter()));
                    }
                }
            }
        }
        None
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutation
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert a node. Ids must be unique.
    pub fn add_node(&mut self, node: WorkflowNode) -> MpBuilderResult<()> {
        if self.index.contains_key(&node.id) {
            return Err(MpBuilderError::DuplicateNode { id: node.id });
        }
        let id = node.id.clone();
        let idx = self.graph.add_node(node);
        self.index.insert(id, idx);
        self.order.push(idx);
        Ok(())
    }

    /// Add an edge, or merge `metadata` into the existing one
    pub fn add_edge(
        &mut self,
        source: &str,
        target: &str,
        metadata: &TransitionMetadata,
    ) -> MpBuilderResult<()> {
        let (Some(&from), Some(&to)) = (self.index.get(source), self.index.get(target)) else {
            return Err(MpBuilderError::UnknownReference {
                source_id: source.to_string(),
                target_id: target.to_string(),
            });
        };

        if let Some(edge) = self.graph.find_edge(from, to) {
            self.graph[edge].metadata.merge(metadata);
        } else {
            let seq = self.next_edge_seq;
            self.next_edge_seq += 1;
            self.graph.add_edge(
                from,
                to,
                EdgeData {
                    metadata: metadata.clone(),
                    seq,
                },
            );
        }
        Ok(())
    }

    /// Remove `id` and every node reachable from it.
    ///
    /// This is a full closure cut: a descendant is removed even when it is
    /// also reachable through a path that does not pass through `id`.
    /// Returns the removed ids, `id` first.
    pub fn remove_descendant_closure(&mut self, id: &str) -> MpBuilderResult<Vec<String>> {
        if id == ROOT_ID {
            return Err(MpBuilderError::ProtectedNode { id: id.to_string() });
        }
        let start = *self
            .index
            .get(id)
            .ok_or_else(|| MpBuilderError::NodeNotFound { id: id.to_string() })?;

        let closure: Vec<NodeIndex> = Dfs::new(&self.graph, start).iter(&self.graph).collect();
        let doomed: HashSet<NodeIndex> = closure.iter().copied().collect();

        let mut removed = Vec::with_capacity(closure.len());
        for idx in closure {
            if let Some(node) = self.graph.remove_node(idx) {
                self.index.remove(&node.id);
                removed.push(node.id);
            }
        }
        self.order.retain(|idx| !doomed.contains(idx));

        tracing::debug!(removed = ?removed, "Removed descendant closure");
        Ok(removed)
    }

    /// Mutable access to a node's payload. The id must not be changed.
    pub fn node_mut(&mut self, id: &str) -> Option<&mut WorkflowNode> {
        let idx = *self.index.get(id)?;
        self.graph.node_weight_mut(idx)
    }

    /// Mutable access to a transition's metadata
    pub fn transition_mut(&mut self, source: &str, target: &str) -> Option<&mut TransitionMetadata> {
        let edge = self.graph.find_edge(*self.index.get(source)?, *self.index.get(target)?)?;
        self.graph.edge_weight_mut(edge).map(|data| &mut data.metadata)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// The virtual root
    pub fn root(&self) -> &WorkflowNode {
        &self.graph[self.order[0]]
    }

    pub fn node(&self, id: &str) -> Option<&WorkflowNode> {
        self.index.get(id).map(|idx| &self.graph[*idx])
    }

    /// All nodes, root first, in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &WorkflowNode> + '_ {
        self.order.iter().map(move |idx| &self.graph[*idx])
    }

    /// All node ids in insertion order
    pub fn node_ids(&self) -> Vec<&str> {
        self.nodes().map(|n| n.id.as_str()).collect()
    }

    /// Number of non-root nodes
    pub fn step_count(&self) -> usize {
        self.order.len() - 1
    }

    pub fn transition_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Metadata of the transition `source -> target`
    pub fn transition(&self, source: &str, target: &str) -> Option<&TransitionMetadata> {
        let edge = self.graph.find_edge(*self.index.get(source)?, *self.index.get(target)?)?;
        self.graph.edge_weight(edge).map(|data| &data.metadata)
    }

    /// All edges as `(source, target, metadata)` in insertion order
    pub fn edges(&self) -> Vec<(&str, &str, &TransitionMetadata)> {
        let mut edges: Vec<_> = self.graph.edge_references().collect();
        edges.sort_by_key(|e| e.weight().seq);
        edges
            .into_iter()
            .map(|e| {
                (
                    self.graph[e.source()].id.as_str(),
                    self.graph[e.target()].id.as_str(),
                    &e.weight().metadata,
                )
            })
            .collect()
    }

    fn ordered_neighbors(&self, idx: NodeIndex, dir: Direction) -> Vec<NodeIndex> {
        let mut edges: Vec<_> = self.graph.edges_directed(idx, dir).collect();
        edges.sort_by_key(|e| e.weight().seq);
        edges
            .into_iter()
            .map(|e| if e.source() == idx { e.target() } else { e.source() })
            .collect()
    }

    fn ordered_successors(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        self.ordered_neighbors(idx, Direction::Outgoing)
    }

    /// Direct successors of `id`, in edge insertion order
    pub fn successors(&self, id: &str) -> Option<Vec<&str>> {
        let idx = *self.index.get(id)?;
        Some(
            self.ordered_neighbors(idx, Direction::Outgoing)
                .into_iter()
                .map(|n| self.graph[n].id.as_str())
                .collect(),
        )
    }

    /// Direct predecessors of `id`, in edge insertion order
    pub fn predecessors(&self, id: &str) -> Option<Vec<&str>> {
        let idx = *self.index.get(id)?;
        Some(
            self.ordered_neighbors(idx, Direction::Incoming)
                .into_iter()
                .map(|n| self.graph[n].id.as_str())
                .collect(),
        )
    }

    /// Every node reachable from `id`, excluding `id` itself
    pub fn descendants(&self, id: &str) -> Option<Vec<&str>> {
        let start = *self.index.get(id)?;
        Some(
            Dfs::new(&self.graph, start)
                .iter(&self.graph)
                .filter(|idx| *idx != start)
                .map(|idx| self.graph[idx].id.as_str())
                .collect(),
        )
    }

    /// Every node from which `id` is reachable, excluding `id` itself
    pub fn ancestors(&self, id: &str) -> Option<Vec<&str>> {
        let start = *self.index.get(id)?;
        let reversed = petgraph::visit::Reversed(&self.graph);
        Some(
            Dfs::new(reversed, start)
                .iter(reversed)
                .filter(|idx| *idx != start)
                .map(|idx| self.graph[idx].id.as_str())
                .collect(),
        )
    }

    /// Topological order of the non-root nodes.
    ///
    /// Among nodes that are ready at the same time, the one inserted first
    /// goes first, so the result is deterministic.
    pub fn execution_order(&self) -> MpBuilderResult<Vec<String>> {
        let rank: HashMap<NodeIndex, usize> =
            self.order.iter().enumerate().map(|(i, idx)| (*idx, i)).collect();

        let mut in_degree: HashMap<NodeIndex, usize> = self
            .order
            .iter()
            .map(|idx| {
                (
                    *idx,
                    self.graph.neighbors_directed(*idx, Direction::Incoming).count(),
                )
            })
            .collect();

        let mut ready: BinaryHeap<Reverse<(usize, NodeIndex)>> = in_degree
            .iter()
            .filter(|(_, degree)| **degree == 0)
            .map(|(idx, _)| Reverse((rank[idx], *idx)))
            .collect();

        let mut sorted = Vec::with_capacity(self.order.len());
        while let Some(Reverse((_, idx))) = ready.pop() {
            sorted.push(idx);
            for next in self.graph.neighbors_directed(idx, Direction::Outgoing) {
                if let Some(degree) = in_degree.get_mut(&next) {
                    *degree -= 1;
                    if *degree == 0 {
                        ready.push(Reverse((rank[&next], next)));
                    }
                }
            }
        }

        if sorted.len() < self.order.len() {
            let cycle = self.find_cycle().unwrap_or_default();
            return Err(MpBuilderError::CycleDetected { cycle });
        }

        Ok(sorted
            .into_iter()
            .filter(|idx| !self.graph[*idx].is_root)
            .map(|idx| self.graph[idx].id.clone())
            .collect())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Export
    // ─────────────────────────────────────────────────────────────────────────

    /// Convert back to the declarative document
    pub fn to_config(&self) -> MetaworkflowConfig {
        let workflows = self
            .nodes()
            .filter(|n| !n.is_root)
            .map(WorkflowNode::to_workflow)
            .collect();

        let transitions = self
            .edges()
            .into_iter()
            .map(|(source, target, metadata)| Transition {
                run: target.to_string(),
                from: (source != ROOT_ID).then(|| source.to_string()),
                metadata: metadata.clone(),
            })
            .collect();

        MetaworkflowConfig {
            config_version: self.header.config_version.clone(),
            workflows,
            workflow_opts: self.header.workflow_opts.clone(),
            workflow_opts_custom: self.header.workflow_opts_custom.clone(),
            transitions,
        }
    }

    /// The declarative document as a generic value
    pub fn to_config_dict(&self) -> MpBuilderResult<serde_json::Value> {
        self.to_config().to_value()
    }
}

impl Default for WorkflowGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Graphs are equal when they hold the same nodes and the same edges with
/// the same metadata; insertion order is not compared.
impl PartialEq for WorkflowGraph {
    fn eq(&self, other: &Self) -> bool {
        if self.order.len() != other.order.len() || self.transition_count() != other.transition_count() {
            return false;
        }

        let same_nodes = self
            .nodes()
            .all(|n| other.node(&n.id).is_some_and(|o| o == n));

        same_nodes
            && self
                .edges()
                .into_iter()
                .all(|(s, t, meta)| other.transition(s, t) == Some(meta))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Workflow;
    use std::path::PathBuf;

    fn workflow(id: &str, name: &str) -> Workflow {
        Workflow {
            id: id.into(),
            name: name.into(),
            version: "1.0.0".into(),
            pipeline_location: Some(format!("https://git.example.org/{}", name)),
            description: None,
        }
    }

    fn transition(from: Option<&str>, run: &str) -> Transition {
        Transition {
            run: run.into(),
            from: from.map(String::from),
            metadata: TransitionMetadata::default(),
        }
    }

    fn config(workflows: Vec<Workflow>, transitions: Vec<Transition>) -> MetaworkflowConfig {
        MetaworkflowConfig {
            workflows,
            transitions,
            ..MetaworkflowConfig::empty()
        }
    }

    /// node0 -> node1, node0 -> node2, node1 -> node3
    fn scenario_b() -> WorkflowGraph {
        let mut g = WorkflowGraph::new();
        for id in ["node1", "node2", "node3"] {
            g.add_node(WorkflowNode::placeholder(id)).unwrap();
        }
        let meta = TransitionMetadata::default();
        g.add_edge("node0", "node1", &meta).unwrap();
        g.add_edge("node0", "node2", &meta).unwrap();
        g.add_edge("node1", "node3", &meta).unwrap();
        g
    }

    #[test]
    fn test_new_graph_has_only_root() {
        let g = WorkflowGraph::new();
        assert_eq!(g.node_ids(), vec![ROOT_ID]);
        assert!(g.root().is_root);
        assert_eq!(g.step_count(), 0);
        assert!(g.execution_order().unwrap().is_empty());
        assert!(g.validate().is_ok());
    }

    #[test]
    fn test_from_config_links_root() {
        let g = WorkflowGraph::from_config(
            &config(
                vec![workflow("a", "rnaseq"), workflow("b", "sarek")],
                vec![transition(None, "a"), transition(Some("a"), "b")],
            ),
            &[],
        )
        .unwrap();

        assert_eq!(g.successors(ROOT_ID).unwrap(), vec!["a"]);
        assert_eq!(g.successors("a").unwrap(), vec!["b"]);
        assert_eq!(g.predecessors("b").unwrap(), vec!["a"]);
        assert_eq!(g.execution_order().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_from_config_resolves_catalog() {
        let mut wf = workflow("a", "rnaseq");
        wf.pipeline_location = None;
        let catalog = vec![CatalogEntry::new("rnaseq", "https://github.com/nf-core/rnaseq", "")];

        let g = WorkflowGraph::from_config(&config(vec![wf], vec![]), &catalog).unwrap();
        let node = g.node("a").unwrap();
        assert!(node.is_cataloged);
        assert_eq!(node.location(), Some("https://github.com/nf-core/rnaseq"));
        assert_eq!(node.pipeline_location, None);
    }

    #[test]
    fn test_unknown_reference() {
        let result = WorkflowGraph::from_config(
            &config(vec![workflow("a", "x")], vec![transition(Some("ghost"), "a")]),
            &[],
        );
        assert!(matches!(
            result,
            Err(MpBuilderError::UnknownReference { ref source_id, .. }) if source_id == "ghost"
        ));

        let result = WorkflowGraph::from_config(
            &config(vec![workflow("a", "x")], vec![transition(None, "ghost")]),
            &[],
        );
        assert!(matches!(result, Err(MpBuilderError::UnknownReference { .. })));
    }

    #[test]
    fn test_duplicate_transitions_merge() {
        let mut first = transition(Some("a"), "b");
        first.metadata.adapter = Some("one".into());
        first.metadata.params_file = Some(PathBuf::from("p.yaml"));
        let mut second = transition(Some("a"), "b");
        second.metadata.adapter = Some("two".into());

        let g = WorkflowGraph::from_config(
            &config(
                vec![workflow("a", "x"), workflow("b", "y")],
                vec![transition(None, "a"), first, second],
            ),
            &[],
        )
        .unwrap();

        assert_eq!(g.transition_count(), 2);
        let meta = g.transition("a", "b").unwrap();
        assert_eq!(meta.adapter.as_deref(), Some("two"));
        assert_eq!(meta.params_file, Some(PathBuf::from("p.yaml")));
    }

    #[test]
    fn test_cycle_reports_path() {
        let mut g = scenario_b();
        g.add_edge("node3", "node0", &TransitionMetadata::default()).unwrap();

        match g.validate() {
            Err(MpBuilderError::CycleDetected { cycle }) => {
                assert_eq!(cycle, vec!["node0", "node1", "node3", "node0"]);
            }
            other => panic!("expected cycle, got {other:?}"),
        }
        assert!(g.execution_order().is_err());
    }

    #[test]
    fn test_cycle_between_steps_in_config() {
        let result = WorkflowGraph::from_config(
            &config(
                vec![workflow("a", "x"), workflow("b", "y")],
                vec![transition(Some("a"), "b"), transition(Some("b"), "a")],
            ),
            &[],
        );
        match result {
            Err(MpBuilderError::CycleDetected { cycle }) => assert_eq!(cycle, vec!["a", "b", "a"]),
            other => panic!("expected cycle, got {other:?}"),
        }
    }

    #[test]
    fn test_long_chain_validates() {
        let mut g = WorkflowGraph::new();
        let meta = TransitionMetadata::default();
        let mut parent = ROOT_ID.to_string();
        for i in 1..=50_000 {
            let id = format!("s{i}");
            g.add_node(WorkflowNode::placeholder(&id)).unwrap();
            g.add_edge(&parent, &id, &meta).unwrap();
            parent = id;
        }
        assert!(g.validate().is_ok());

        g.add_edge(&parent, "s1", &meta).unwrap();
        match g.validate() {
            Err(MpBuilderError::CycleDetected { cycle }) => {
                assert_eq!(cycle.len(), 50_001);
                assert_eq!(cycle.first().map(String::as_str), Some("s1"));
                assert_eq!(cycle.last().map(String::as_str), Some("s1"));
            }
            other => panic!("expected cycle, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_identifier() {
        let result = WorkflowGraph::from_config(&config(vec![workflow("", "x")], vec![]), &[]);
        assert!(matches!(result, Err(MpBuilderError::InvalidIdentifier { .. })));
    }

    #[test]
    fn test_cycle_checked_before_identifiers() {
        let mut g = WorkflowGraph::new();
        g.add_node(WorkflowNode::placeholder("")).unwrap();
        g.add_node(WorkflowNode::placeholder("a")).unwrap();
        g.add_edge("a", "a", &TransitionMetadata::default()).unwrap();
        assert!(matches!(g.validate(), Err(MpBuilderError::CycleDetected { .. })));
    }

    #[test]
    fn test_execution_order_respects_edges_and_insertion() {
        let mut g = WorkflowGraph::new();
        for id in ["d", "c", "b", "a"] {
            g.add_node(WorkflowNode::placeholder(id)).unwrap();
        }
        let meta = TransitionMetadata::default();
        g.add_edge("a", "d", &meta).unwrap();
        g.add_edge("b", "c", &meta).unwrap();

        let order = g.execution_order().unwrap();
        assert_eq!(order, vec!["b", "c", "a", "d"]);

        for (s, t, _) in g.edges() {
            let si = order.iter().position(|n| n == s).unwrap();
            let ti = order.iter().position(|n| n == t).unwrap();
            assert!(si < ti);
        }
    }

    #[test]
    fn test_remove_descendant_closure() {
        let mut g = scenario_b();
        let removed = g.remove_descendant_closure("node1").unwrap();

        assert_eq!(removed, vec!["node1", "node3"]);
        assert_eq!(g.node_ids(), vec!["node0", "node2"]);
        assert_eq!(g.edges().len(), 1);
        assert_eq!(g.successors("node0").unwrap(), vec!["node2"]);
    }

    #[test]
    fn test_closure_cut_removes_shared_descendants() {
        // a -> c and b -> c: removing a also removes c
        let mut g = WorkflowGraph::new();
        for id in ["a", "b", "c"] {
            g.add_node(WorkflowNode::placeholder(id)).unwrap();
        }
        let meta = TransitionMetadata::default();
        g.add_edge(ROOT_ID, "a", &meta).unwrap();
        g.add_edge(ROOT_ID, "b", &meta).unwrap();
        g.add_edge("a", "c", &meta).unwrap();
        g.add_edge("b", "c", &meta).unwrap();

        g.remove_descendant_closure("a").unwrap();
        assert_eq!(g.node_ids(), vec![ROOT_ID, "b"]);
        assert!(g.successors("b").unwrap().is_empty());
    }

    #[test]
    fn test_root_is_protected() {
        let mut g = scenario_b();
        assert!(matches!(
            g.remove_descendant_closure(ROOT_ID),
            Err(MpBuilderError::ProtectedNode { .. })
        ));
        assert!(matches!(
            g.remove_descendant_closure("ghost"),
            Err(MpBuilderError::NodeNotFound { .. })
        ));
    }

    #[test]
    fn test_insertion_order_survives_index_reuse() {
        let mut g = scenario_b();
        g.remove_descendant_closure("node1").unwrap();
        g.add_node(WorkflowNode::placeholder("node4")).unwrap();
        g.add_edge("node2", "node4", &TransitionMetadata::default()).unwrap();

        assert_eq!(g.node_ids(), vec!["node0", "node2", "node4"]);
        assert_eq!(g.execution_order().unwrap(), vec!["node2", "node4"]);
    }

    #[test]
    fn test_ancestors_and_descendants() {
        let g = scenario_b();
        let mut desc = g.descendants("node0").unwrap();
        desc.sort();
        assert_eq!(desc, vec!["node1", "node2", "node3"]);

        let mut anc = g.ancestors("node3").unwrap();
        anc.sort();
        assert_eq!(anc, vec!["node0", "node1"]);
    }

    #[test]
    fn test_round_trip() {
        let mut t = transition(Some("a"), "b");
        t.metadata.adapter = Some("bam".into());
        t.metadata.params = Some(vec![serde_json::json!({"genome": "GRCh38"})
            .as_object()
            .unwrap()
            .clone()]);

        let original = WorkflowGraph::from_config(
            &config(
                vec![workflow("a", "x"), workflow("b", "y"), workflow("c", "z")],
                vec![transition(None, "a"), t, transition(Some("a"), "c")],
            ),
            &[],
        )
        .unwrap();

        let exported = original.to_config();
        let rebuilt = WorkflowGraph::from_config(&exported, &[]).unwrap();

        assert_eq!(rebuilt, original);
        assert_eq!(rebuilt.to_config(), exported);
    }

    #[test]
    fn test_root_transition_exports_without_from() {
        let g = WorkflowGraph::from_config(
            &config(
                vec![workflow("a", "x"), workflow("b", "y")],
                vec![transition(None, "a")],
            ),
            &[],
        )
        .unwrap();

        let dict = g.to_config_dict().unwrap();
        let transitions = dict["transitions"].as_array().unwrap();
        assert_eq!(transitions.len(), 1);
        assert_eq!(transitions[0]["run"], "a");
        assert!(transitions[0].get("from").is_none());
        assert_eq!(dict["workflows"].as_array().unwrap().len(), 2);
    }
}
