use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::null_as_default;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClusterSummary {
    pub total_nodes: u64,
    pub healthy_nodes: u64,
    #[serde(rename = "totalGPUs")]
    pub total_gpus: u64,
    #[serde(rename = "allocatedGPUs")]
    pub allocated_gpus: u64,
    pub total_queues: u64,
    /// Job status → number of jobs. Key order is the order the donut chart
    /// lays segments out in.
    #[serde(default, deserialize_with = "null_as_default")]
    pub job_counts: BTreeMap<String, u64>,
}
