//! Workflow graph runtime representation.

use std::collections::HashMap;
use std::iter;

use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};

use super::{Edge, Node, NodeId, WorkflowDefinition, WorkflowMetadata};
use crate::error::{WorkflowError, WorkflowResult};
use crate::registry::StepRegistry;

/// A workflow: a set of uniquely identified nodes and their predecessor
/// relation.
///
/// Construction only enforces unique node IDs. Missing predecessors, cycles
/// and unknown step types are reported by [`validate`](Self::validate),
/// which never modifies the graph and may be called any number of times.
#[derive(Debug, Clone, Default)]
pub struct WorkflowGraph {
    /// Nodes in insertion order.
    nodes: Vec<Node>,
    /// Mapping from NodeId to position in `nodes`.
    positions: HashMap<NodeId, usize>,
    /// Workflow metadata.
    pub metadata: WorkflowMetadata,
}

impl WorkflowGraph {
    /// Creates a new empty workflow graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new workflow graph with metadata.
    pub fn with_metadata(metadata: WorkflowMetadata) -> Self {
        Self {
            metadata,
            ..Default::default()
        }
    }

    /// Builds a graph from nodes, rejecting duplicate IDs.
    pub fn from_nodes(nodes: impl IntoIterator<Item = Node>) -> WorkflowResult<Self> {
        let mut graph = Self::new();
        for node in nodes {
            graph.add_node(node)?;
        }
        Ok(graph)
    }

    /// Builds a graph from a workflow template.
    ///
    /// Each edge appends its `source` to the predecessors of its `dest`, in
    /// edge order. An edge whose `dest` does not exist is reported as a
    /// dangling reference held by its `source`.
    pub fn from_definition(definition: WorkflowDefinition) -> WorkflowResult<Self> {
        let mut graph = Self::with_metadata(definition.metadata);
        for node in definition.nodes {
            graph.add_node(node)?;
        }

        for edge in definition.edges {
            let Some(&position) = graph.positions.get(&edge.dest) else {
                return Err(WorkflowError::DanglingReference {
                    node_id: edge.source,
                    missing: edge.dest,
                });
            };
            graph.nodes[position].previous.push(edge.source);
        }

        Ok(graph)
    }

    /// Converts the graph back into a template with dependencies on the nodes.
    pub fn to_definition(&self) -> WorkflowDefinition {
        WorkflowDefinition {
            metadata: self.metadata.clone(),
            nodes: self.nodes.clone(),
            edges: Vec::new(),
        }
    }

    /// Adds a node, rejecting a duplicate ID.
    pub fn add_node(&mut self, node: Node) -> WorkflowResult<()> {
        if self.positions.contains_key(&node.id) {
            return Err(WorkflowError::DuplicateNode(node.id));
        }
        self.positions.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
        Ok(())
    }

    /// Returns the number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns whether the graph is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns a node.
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.positions.get(id).map(|&position| &self.nodes[position])
    }

    /// Returns whether a node exists.
    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.positions.contains_key(id)
    }

    /// Returns all nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    /// Returns all node IDs in insertion order.
    pub fn node_ids(&self) -> impl Iterator<Item = &NodeId> {
        self.nodes.iter().map(|node| &node.id)
    }

    /// Returns the declared predecessors of a node.
    pub fn predecessors(&self, id: &NodeId) -> &[NodeId] {
        self.node(id).map(|node| node.previous.as_slice()).unwrap_or_default()
    }

    /// Returns the nodes listing `id` as a predecessor.
    ///
    /// A dependent appears once per time it lists `id`.
    pub fn dependents<'a>(
        &'a self,
        id: &NodeId,
    ) -> impl Iterator<Item = &'a NodeId> + use<'a> {
        let id = id.clone();
        self.nodes.iter().flat_map(move |node| {
            let listed = node.previous.iter().filter(|previous| **previous == id).count();
            iter::repeat_n(&node.id, listed)
        })
    }

    /// Returns every predecessor relation as an edge.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.nodes.iter().flat_map(|node| {
            node.previous
                .iter()
                .map(|previous| Edge::new(previous.clone(), node.id.clone()))
        })
    }

    /// Validates the graph against a step registry.
    ///
    /// Checks, in order, and reports the first violation:
    /// 1. every predecessor exists ([`WorkflowError::DanglingReference`]);
    /// 2. the graph is acyclic ([`WorkflowError::CyclicDependency`]);
    /// 3. every step type is registered ([`WorkflowError::UnknownStepType`]).
    pub fn validate(&self, registry: &StepRegistry) -> WorkflowResult<()> {
        self.check_structure()?;

        for node in &self.nodes {
            if !registry.contains(&node.step_type) {
                return Err(WorkflowError::UnknownStepType {
                    node_id: Some(node.id.clone()),
                    step_type: node.step_type.clone(),
                });
            }
        }

        Ok(())
    }

    /// Checks that every predecessor exists and that the graph is acyclic.
    pub fn check_structure(&self) -> WorkflowResult<()> {
        self.topological_order().map(|_| ())
    }

    /// Returns one valid execution order.
    ///
    /// Fails when a predecessor is missing or the graph contains a cycle,
    /// self loops included.
    pub fn topological_order(&self) -> WorkflowResult<Vec<NodeId>> {
        self.check_references()?;

        let graph = self.to_petgraph();
        let order = toposort(&graph, None).map_err(|cycle| WorkflowError::CyclicDependency {
            node_id: graph[cycle.node_id()].clone(),
        })?;

        Ok(order.into_iter().map(|index| graph[index].clone()).collect())
    }

    fn check_references(&self) -> WorkflowResult<()> {
        for node in &self.nodes {
            if let Some(missing) = node
                .previous
                .iter()
                .find(|previous| !self.positions.contains_key(*previous))
            {
                return Err(WorkflowError::DanglingReference {
                    node_id: node.id.clone(),
                    missing: missing.clone(),
                });
            }
        }
        Ok(())
    }

    /// Builds the petgraph view. Every predecessor must exist.
    fn to_petgraph(&self) -> DiGraph<NodeId, ()> {
        let mut graph = DiGraph::with_capacity(self.nodes.len(), self.nodes.len());
        let indices: Vec<NodeIndex> = self
            .nodes
            .iter()
            .map(|node| graph.add_node(node.id.clone()))
            .collect();

        for (position, node) in self.nodes.iter().enumerate() {
            for previous in &node.previous {
                if let Some(&source) = self.positions.get(previous) {
                    graph.add_edge(indices[source], indices[position], ());
                }
            }
        }

        graph
    }
}
