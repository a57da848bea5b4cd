//! Response types for search provider operations.

use serde::{Deserialize, Serialize};

/// Response to an index creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateIndexResponse {
    /// Whether the cluster acknowledged the request.
    #[serde(default)]
    pub acknowledged: bool,
    /// Whether the requisite shard copies started before the timeout.
    #[serde(default)]
    pub shards_acknowledged: bool,
    /// Name of the created index.
    pub index: String,
}

impl CreateIndexResponse {
    /// Creates an acknowledged response for the given index.
    pub fn acknowledged(index: impl Into<String>) -> Self {
        Self {
            acknowledged: true,
            shards_acknowledged: true,
            index: index.into(),
        }
    }
}

/// Generic acknowledgement returned by cluster management APIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcknowledgedResponse {
    /// Whether the cluster acknowledged the request.
    #[serde(default)]
    pub acknowledged: bool,
}

impl AcknowledgedResponse {
    /// Creates an acknowledged response.
    pub const fn acknowledged() -> Self {
        Self { acknowledged: true }
    }
}
