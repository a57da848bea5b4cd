//! Cluster health as reported by `GET /_cluster/health`.

use std::time::Duration;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display};

/// Cluster status colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(Serialize, Deserialize, AsRefStr, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ClusterStatus {
    /// All primary and replica shards are allocated.
    Green,
    /// All primaries are allocated, some replicas are not.
    Yellow,
    /// At least one primary shard is unallocated.
    Red,
}

/// Health summary of the backing cluster.
///
/// Deserializes directly from the cluster health response; fields the
/// provisioning steps do not care about are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterHealth {
    pub cluster_name: String,
    pub status: ClusterStatus,
    #[serde(default)]
    pub timed_out: bool,
    #[serde(default)]
    pub number_of_nodes: u32,
    #[serde(default)]
    pub number_of_data_nodes: u32,
    #[serde(default)]
    pub active_primary_shards: u32,
    #[serde(default)]
    pub active_shards: u32,
    #[serde(default)]
    pub unassigned_shards: u32,
    /// Round trip of the health request, filled in by the client.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_ms: Option<u64>,
    /// When the report was received.
    #[serde(default = "Timestamp::now")]
    pub checked_at: Timestamp,
}

impl ClusterHealth {
    /// Creates a report with the given status and no shard statistics.
    pub fn new(cluster_name: impl Into<String>, status: ClusterStatus) -> Self {
        Self {
            cluster_name: cluster_name.into(),
            status,
            timed_out: false,
            number_of_nodes: 0,
            number_of_data_nodes: 0,
            active_primary_shards: 0,
            active_shards: 0,
            unassigned_shards: 0,
            response_ms: None,
            checked_at: Timestamp::now(),
        }
    }

    /// Records how long the health request took.
    #[must_use]
    pub fn with_response_time(mut self, elapsed: Duration) -> Self {
        self.response_ms = Some(u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// Returns whether indices and pipelines can be created.
    ///
    /// A yellow cluster accepts writes; a red one, or a report that timed
    /// out before the cluster answered, does not.
    pub fn is_operational(&self) -> bool {
        self.status != ClusterStatus::Red && !self.timed_out
    }
}
