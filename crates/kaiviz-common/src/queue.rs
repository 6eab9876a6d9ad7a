use serde::{Deserialize, Serialize};

use crate::{null_as_default, QueueResources};

/// A queue and its sub-queues.
///
/// The nesting is the hierarchy; `parent` is carried for display only.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueueView {
    pub name: String,
    #[serde(default)]
    pub parent: String,
    #[serde(default)]
    pub weight: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub resources: QueueResources,
    #[serde(default, deserialize_with = "null_as_default")]
    pub children: Vec<QueueView>,
}
