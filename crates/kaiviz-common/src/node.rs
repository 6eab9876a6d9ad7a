use serde::{Deserialize, Serialize};

use crate::{null_as_default, ResourceStats};

/// One physical GPU on a node.
///
/// `occupied_by` and `fragmented` are set independently by the backend;
/// an occupied slot is rendered as occupied regardless of `fragmented`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GpuSlot {
    pub id: i64,
    /// Task or pod name holding the slot, empty when free.
    #[serde(default)]
    pub occupied_by: String,
    /// Idle but unusable because of placement constraints.
    #[serde(default)]
    pub fragmented: bool,
}

impl GpuSlot {
    pub fn is_occupied(&self) -> bool {
        !self.occupied_by.is_empty()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NodeView {
    pub name: String,
    pub status: String,
    #[serde(default)]
    pub allocatable: ResourceStats,
    #[serde(default)]
    pub used: ResourceStats,
    #[serde(default, deserialize_with = "null_as_default")]
    pub gpu_slots: Vec<GpuSlot>,
}

impl NodeView {
    pub fn is_ready(&self) -> bool {
        self.status == "Ready"
    }

    pub fn has_gpu(&self) -> bool {
        !self.gpu_slots.is_empty()
    }
}
