pub mod job;
pub mod node;
pub mod queue;
pub mod resources;
pub mod summary;

pub use job::{JobView, TaskView};
pub use node::{GpuSlot, NodeView};
pub use queue::QueueView;
pub use resources::{QueueResources, ResourceStats};
pub use summary::ClusterSummary;

pub mod telemetry;

use serde::{Deserialize, Deserializer};

/// The visualizer backend encodes empty Go slices, maps and pointers as `null`.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
