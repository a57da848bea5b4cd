//! Workflow graph structures.
//!
//! - [`WorkflowGraph`]: the dependency graph executed by the engine
//! - [`WorkflowDefinition`]: serializable template (JSON-friendly)
//! - [`WorkflowMetadata`]: name and description of a workflow
//! - [`Node`]: one step instantiation with parameters and predecessors
//! - [`Edge`]: a dependency given separately from the nodes
//! - [`NodeId`]: user-assigned node identifier

mod definition;
mod edge;
#[allow(clippy::module_inception)]
mod graph;
mod id;
mod node;

pub use definition::{WorkflowDefinition, WorkflowMetadata};
pub use edge::Edge;
pub use graph::WorkflowGraph;
pub use id::NodeId;
pub use node::Node;
