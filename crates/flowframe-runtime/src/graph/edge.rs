//! Workflow edge.

use serde::{Deserialize, Serialize};

use super::NodeId;

/// A dependency between two nodes: `dest` runs after `source` and receives
/// its output.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// Node whose output is consumed.
    pub source: NodeId,
    /// Node that consumes the output.
    pub dest: NodeId,
}

impl Edge {
    /// Creates an edge.
    pub fn new(source: impl Into<NodeId>, dest: impl Into<NodeId>) -> Self {
        Self {
            source: source.into(),
            dest: dest.into(),
        }
    }
}
