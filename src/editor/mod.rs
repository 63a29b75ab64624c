// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 mp-builder contributors

//! Graph editing
//!
//! [`GraphEditor`] owns the authoritative [`WorkflowGraph`] and is the only
//! way to change it incrementally. Every operation is staged on a copy,
//! re-validated, and only then swapped in, so a rejected edit leaves no
//! trace. Each committed edit bumps the revision and queues a
//! [`GraphEvent`] for projections (layouts, exports) to pick up.

mod events;

pub use events::GraphEvent;

use std::collections::VecDeque;

use crate::catalog::{find_entry, CatalogEntry};
use crate::config::TransitionMetadata;
use crate::errors::{MpBuilderError, MpBuilderResult};
use crate::graph::{WorkflowGraph, WorkflowNode, ROOT_ID};
use crate::layout::{Layout, LayoutEngine};

/// Pipeline a step should run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineBinding {
    pub name: String,
    pub version: String,
    pub location: Option<String>,
}

/// Mutation façade over a [`WorkflowGraph`]
#[derive(Debug, Clone)]
pub struct GraphEditor {
    graph: WorkflowGraph,
    catalog: Vec<CatalogEntry>,
    next_number: u64,
    revision: u64,
    events: VecDeque<GraphEvent>,
}

impl GraphEditor {
    pub fn new(graph: WorkflowGraph) -> Self {
        Self {
            graph,
            catalog: Vec::new(),
            next_number: 1,
            revision: 0,
            events: VecDeque::new(),
        }
    }

    /// Use `entries` to resolve pipelines bound with [`Self::bind_pipeline`]
    pub fn with_catalog(mut self, entries: Vec<CatalogEntry>) -> Self {
        self.catalog = entries;
        self
    }

    /// Catalog entries used for resolution
    pub fn catalog(&self) -> &[CatalogEntry] {
        &self.catalog
    }

    pub fn graph(&self) -> &WorkflowGraph {
        &self.graph
    }

    pub fn into_graph(self) -> WorkflowGraph {
        self.graph
    }

    /// Number of committed edits
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Take all queued events, oldest first
    pub fn drain_events(&mut self) -> Vec<GraphEvent> {
        self.events.drain(..).collect()
    }

    /// Lay out the current graph
    pub fn layout(&self, engine: &LayoutEngine) -> Layout {
        engine.compute(&self.graph)
    }

    /// Add a step after `parent` and return its id.
    ///
    /// Without `new_id`, ids are `node<N>` with `N` taken from a counter that
    /// only grows and skips ids already in the graph.
    pub fn add_step(&mut self, parent: &str, new_id: Option<&str>) -> MpBuilderResult<String> {
        self.add_bound_step(parent, new_id, None)
    }

    /// Add a step after `parent` that runs `binding`, as a single edit.
    ///
    /// With a non-empty catalog, an unbound step is only accepted when its id
    /// happens to name a catalog pipeline.
    pub fn add_bound_step(
        &mut self,
        parent: &str,
        new_id: Option<&str>,
        binding: Option<PipelineBinding>,
    ) -> MpBuilderResult<String> {
        if !self.graph.contains(parent) {
            return Err(MpBuilderError::NodeNotFound {
                id: parent.to_string(),
            });
        }

        let (id, next_number) = match new_id {
            Some(id) => (id.to_string(), self.next_number),
            None => self.generate_id(),
        };

        let entry = binding
            .as_ref()
            .and_then(|b| find_entry(&self.catalog, &b.name))
            .cloned();
        self.commit(|graph| {
            let mut node = WorkflowNode::placeholder(id.as_str());
            if let Some(binding) = &binding {
                apply_binding(&mut node, binding, entry.as_ref());
            }
            graph.add_node(node)?;
            graph.add_edge(parent, &id, &TransitionMetadata::default())
        })?;
        self.next_number = next_number;

        tracing::info!(id = %id, parent = %parent, "Added step");
        self.emit(GraphEvent::StepAdded {
            id: id.clone(),
            parent: parent.to_string(),
        });
        if let Some(binding) = binding {
            self.emit(GraphEvent::PipelineBound {
                id: id.clone(),
                name: binding.name,
                version: binding.version,
            });
        }
        Ok(id)
    }

    /// Remove `id` together with every step reachable from it.
    ///
    /// Returns the removed ids, `id` first.
    pub fn remove_step(&mut self, id: &str) -> MpBuilderResult<Vec<String>> {
        let removed = self.commit(|graph| graph.remove_descendant_closure(id))?;

        tracing::info!(removed = ?removed, "Removed step");
        self.emit(GraphEvent::StepsRemoved {
            ids: removed.clone(),
        });
        Ok(removed)
    }

    /// Change the display name of a step
    pub fn rename_step(&mut self, id: &str, name: &str) -> MpBuilderResult<()> {
        self.commit(|graph| {
            let node = step_mut(graph, id)?;
            node.name = name.to_string();
            Ok(())
        })?;

        tracing::info!(id = %id, name = %name, "Renamed step");
        self.emit(GraphEvent::StepRenamed {
            id: id.to_string(),
            name: name.to_string(),
        });
        Ok(())
    }

    /// Point a step at another pipeline, re-resolving it against the catalog
    pub fn bind_pipeline(&mut self, id: &str, binding: PipelineBinding) -> MpBuilderResult<()> {
        let entry = find_entry(&self.catalog, &binding.name).cloned();
        self.commit(|graph| {
            let node = step_mut(graph, id)?;
            apply_binding(node, &binding, entry.as_ref());
            Ok(())
        })?;

        if self.catalog.is_empty() && binding.location.is_none() {
            tracing::warn!(id = %id, pipeline = %binding.name, "Bound pipeline has no known location");
        }
        tracing::info!(id = %id, pipeline = %binding.name, version = %binding.version, "Bound pipeline");
        self.emit(GraphEvent::PipelineBound {
            id: id.to_string(),
            name: binding.name,
            version: binding.version,
        });
        Ok(())
    }

    /// Merge `metadata` into the transition `source -> target`
    pub fn update_transition(
        &mut self,
        source: &str,
        target: &str,
        metadata: &TransitionMetadata,
    ) -> MpBuilderResult<()> {
        self.commit(|graph| {
            let current = graph
                .transition_mut(source, target)
                .ok_or_else(|| MpBuilderError::EdgeNotFound {
                    source_id: source.to_string(),
                    target_id: target.to_string(),
                })?;
            current.merge(metadata);
            Ok(())
        })?;

        tracing::info!(source = %source, target = %target, "Updated transition");
        self.emit(GraphEvent::TransitionUpdated {
            source: source.to_string(),
            target: target.to_string(),
        });
        Ok(())
    }

    /// Next free generated id and the counter value after it
    fn generate_id(&self) -> (String, u64) {
        let mut number = self.next_number;
        loop {
            let id = format!("node{}", number);
            number += 1;
            if !self.graph.contains(&id) {
                return (id, number);
            }
        }
    }

    /// Apply `op` to a copy of the graph and keep the copy only if it validates.
    ///
    /// Besides the structural checks, every step must still be loadable from
    /// the saved document: known to the catalog or carrying its own location.
    /// An empty catalog means the lookup failed, and that check is skipped.
    fn commit<T>(
        &mut self,
        op: impl FnOnce(&mut WorkflowGraph) -> MpBuilderResult<T>,
    ) -> MpBuilderResult<T> {
        let mut staged = self.graph.clone();
        let out = op(&mut staged)?;
        staged.validate()?;

        if !self.catalog.is_empty() {
            let names = unlocated_steps(&staged, &self.catalog);
            if !names.is_empty() {
                return Err(MpBuilderError::MissingPipelineLocation { names });
            }
        }

        self.graph = staged;
        self.revision += 1;
        Ok(out)
    }

    fn emit(&mut self, event: GraphEvent) {
        tracing::debug!(revision = self.revision, event = %event, "Graph changed");
        self.events.push_back(event);
    }
}

impl Default for GraphEditor {
    fn default() -> Self {
        Self::new(WorkflowGraph::new())
    }
}

fn apply_binding(node: &mut WorkflowNode, binding: &PipelineBinding, entry: Option<&CatalogEntry>) {
    node.name = binding.name.clone();
    node.version = binding.version.clone();
    node.pipeline_location = binding.location.clone();
    node.is_cataloged = false;
    node.catalog_location = None;
    if let Some(entry) = entry {
        node.resolve(entry);
    }
}

/// Names of steps neither in `catalog` nor carrying a declared location
fn unlocated_steps(graph: &WorkflowGraph, catalog: &[CatalogEntry]) -> Vec<String> {
    graph
        .nodes()
        .filter(|node| !node.is_root)
        .filter(|node| find_entry(catalog, &node.name).is_none())
        .filter(|node| node.to_workflow().location().is_none())
        .map(|node| node.name.clone())
        .collect()
}

/// Mutable non-root node
fn step_mut<'g>(graph: &'g mut WorkflowGraph, id: &str) -> MpBuilderResult<&'g mut WorkflowNode> {
    if id == ROOT_ID {
        return Err(MpBuilderError::ProtectedNode { id: id.to_string() });
    }
    graph
        .node_mut(id)
        .ok_or_else(|| MpBuilderError::NodeNotFound { id: id.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// node0 -> node1, node0 -> node2, node1 -> node3
    fn scenario_b() -> GraphEditor {
        let mut editor = GraphEditor::default();
        assert_eq!(editor.add_step(ROOT_ID, None).unwrap(), "node1");
        assert_eq!(editor.add_step(ROOT_ID, None).unwrap(), "node2");
        assert_eq!(editor.add_step("node1", None).unwrap(), "node3");
        editor
    }

    #[test]
    fn test_add_step_links_parent() {
        let editor = scenario_b();
        let graph = editor.graph();

        assert_eq!(graph.successors(ROOT_ID).unwrap(), vec!["node1", "node2"]);
        assert_eq!(graph.successors("node1").unwrap(), vec!["node3"]);
        assert_eq!(editor.revision(), 3);
    }

    #[test]
    fn test_generated_ids_skip_existing() {
        let mut editor = GraphEditor::default();
        editor.add_step(ROOT_ID, Some("node2")).unwrap();

        assert_eq!(editor.add_step(ROOT_ID, None).unwrap(), "node1");
        assert_eq!(editor.add_step(ROOT_ID, None).unwrap(), "node3");
    }

    #[test]
    fn test_generated_ids_are_not_reused() {
        let mut editor = scenario_b();
        editor.remove_step("node3").unwrap();
        assert_eq!(editor.add_step("node2", None).unwrap(), "node4");
    }

    #[test]
    fn test_add_step_rejects_bad_input() {
        let mut editor = scenario_b();

        assert!(matches!(
            editor.add_step("ghost", None),
            Err(MpBuilderError::NodeNotFound { .. })
        ));
        assert!(matches!(
            editor.add_step(ROOT_ID, Some("node1")),
            Err(MpBuilderError::DuplicateNode { .. })
        ));
        assert!(matches!(
            editor.add_step(ROOT_ID, Some(" ")),
            Err(MpBuilderError::InvalidIdentifier { .. })
        ));
        assert_eq!(editor.revision(), 3);
        assert_eq!(editor.graph().step_count(), 3);
    }

    #[test]
    fn test_remove_step_cascades() {
        let mut editor = scenario_b();
        let removed = editor.remove_step("node1").unwrap();

        assert_eq!(removed, vec!["node1", "node3"]);
        let graph = editor.graph();
        assert_eq!(graph.node_ids(), vec!["node0", "node2"]);
        assert_eq!(graph.edges().len(), 1);
        assert_eq!(graph.successors(ROOT_ID).unwrap(), vec!["node2"]);
    }

    #[test]
    fn test_cascade_removes_every_descendant() {
        let mut editor = scenario_b();
        editor.add_step("node3", Some("deep")).unwrap();
        editor.add_step("node2", Some("side")).unwrap();

        let before: Vec<String> = editor
            .graph()
            .descendants("node1")
            .unwrap()
            .into_iter()
            .map(String::from)
            .collect();
        editor.remove_step("node1").unwrap();

        for id in before.iter().map(String::as_str).chain(["node1"]) {
            assert!(!editor.graph().contains(id), "{id} survived");
        }
        assert!(editor.graph().contains("side"));
    }

    #[test]
    fn test_root_cannot_be_removed() {
        let mut editor = scenario_b();
        assert!(matches!(
            editor.remove_step(ROOT_ID),
            Err(MpBuilderError::ProtectedNode { .. })
        ));
        assert_eq!(editor.graph().step_count(), 3);
        assert!(matches!(
            editor.rename_step(ROOT_ID, "x"),
            Err(MpBuilderError::ProtectedNode { .. })
        ));
    }

    fn rnaseq_catalog() -> Vec<CatalogEntry> {
        vec![CatalogEntry::new(
            "rnaseq",
            "https://github.com/nf-core/rnaseq",
            "RNA sequencing analysis pipeline",
        )]
    }

    fn binding(name: &str, version: &str, location: Option<&str>) -> PipelineBinding {
        PipelineBinding {
            name: name.into(),
            version: version.into(),
            location: location.map(String::from),
        }
    }

    #[test]
    fn test_rename_and_bind() {
        let mut editor = scenario_b();

        editor.rename_step("node1", "align").unwrap();
        assert_eq!(editor.graph().node("node1").unwrap().name, "align");

        editor
            .bind_pipeline("node1", binding("in-house", "0.1", Some("./pipelines/in-house")))
            .unwrap();
        let node = editor.graph().node("node1").unwrap();
        assert!(!node.is_cataloged);
        assert_eq!(node.location(), Some("./pipelines/in-house"));
        assert_eq!(node.label(), "in-house 0.1");
    }

    #[test]
    fn test_bound_step_resolves_against_catalog() {
        let mut editor = GraphEditor::default().with_catalog(rnaseq_catalog());
        let id = editor
            .add_bound_step(ROOT_ID, None, Some(binding("rnaseq", "3.14.0", None)))
            .unwrap();

        let node = editor.graph().node(&id).unwrap();
        assert!(node.is_cataloged);
        assert_eq!(node.location(), Some("https://github.com/nf-core/rnaseq"));
        assert_eq!(node.label(), "rnaseq 3.14.0");

        let events = editor.drain_events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[1], GraphEvent::PipelineBound { .. }));

        editor
            .bind_pipeline(&id, binding("in-house", "0.1", Some("./pipelines/in-house")))
            .unwrap();
        let node = editor.graph().node(&id).unwrap();
        assert!(!node.is_cataloged);
        assert_eq!(node.location(), Some("./pipelines/in-house"));
    }

    #[test]
    fn test_steps_must_stay_loadable() {
        let mut editor = GraphEditor::default().with_catalog(rnaseq_catalog());

        assert!(matches!(
            editor.add_step(ROOT_ID, None),
            Err(MpBuilderError::MissingPipelineLocation { ref names }) if names == &["node1"]
        ));
        assert!(matches!(
            editor.add_bound_step(ROOT_ID, None, Some(binding("in-house", "0.1", None))),
            Err(MpBuilderError::MissingPipelineLocation { .. })
        ));
        assert_eq!(editor.graph().step_count(), 0);
        assert_eq!(editor.revision(), 0);

        let id = editor
            .add_bound_step(ROOT_ID, None, Some(binding("rnaseq", "3.14.0", None)))
            .unwrap();
        assert!(matches!(
            editor.rename_step(&id, "align"),
            Err(MpBuilderError::MissingPipelineLocation { .. })
        ));
        assert!(matches!(
            editor.bind_pipeline(&id, binding("in-house", "0.1", Some(" "))),
            Err(MpBuilderError::MissingPipelineLocation { .. })
        ));
        assert_eq!(editor.graph().node(&id).unwrap().name, "rnaseq");

        // What the editor accepts, the document validator accepts too
        let config = editor.graph().to_config();
        let catalog = crate::catalog::StaticCatalog::new(rnaseq_catalog());
        assert!(crate::config::ConfigValidator::new(&catalog)
            .validate_config(&config)
            .is_ok());
    }

    #[test]
    fn test_update_transition_merges() {
        let mut editor = scenario_b();
        let meta = TransitionMetadata {
            adapter: Some("bam-to-fastq".into()),
            ..TransitionMetadata::default()
        };
        editor.update_transition("node1", "node3", &meta).unwrap();

        let update = TransitionMetadata {
            config_file: Some("extra.config".into()),
            ..TransitionMetadata::default()
        };
        editor.update_transition("node1", "node3", &update).unwrap();

        let stored = editor.graph().transition("node1", "node3").unwrap();
        assert_eq!(stored.adapter.as_deref(), Some("bam-to-fastq"));
        assert!(stored.config_file.is_some());

        assert!(matches!(
            editor.update_transition("node2", "node3", &meta),
            Err(MpBuilderError::EdgeNotFound { .. })
        ));
    }

    #[test]
    fn test_events_are_queued_in_order() {
        let mut editor = scenario_b();
        editor.remove_step("node2").unwrap();

        let events = editor.drain_events();
        assert_eq!(events.len(), 4);
        assert_eq!(
            events[0],
            GraphEvent::StepAdded {
                id: "node1".into(),
                parent: ROOT_ID.into()
            }
        );
        assert_eq!(
            events[3],
            GraphEvent::StepsRemoved {
                ids: vec!["node2".into()]
            }
        );
        assert!(events.iter().all(GraphEvent::is_structural));
        assert!(editor.drain_events().is_empty());
    }

    #[test]
    fn test_failed_edit_emits_nothing() {
        let mut editor = scenario_b();
        editor.drain_events();

        let _ = editor.remove_step(ROOT_ID);
        let _ = editor.rename_step("ghost", "x");
        assert!(editor.drain_events().is_empty());
        assert_eq!(editor.revision(), 3);
    }

    #[test]
    fn test_layout_follows_edits() {
        let mut editor = scenario_b();
        let engine = LayoutEngine::default();

        let layout = editor.layout(&engine);
        assert_eq!(layout.position("node3").unwrap().depth, 2);

        editor.remove_step("node1").unwrap();
        let layout = editor.layout(&engine);
        assert_eq!(layout.columns().len(), 2);
        assert!(layout.position("node3").is_none());
    }
}
