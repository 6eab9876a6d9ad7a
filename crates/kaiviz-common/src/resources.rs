use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// CPU / memory / GPU quantities as reported by the scheduler.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResourceStats {
    /// CPU in milli-cores.
    #[serde(rename = "milliCPU", default)]
    pub milli_cpu: i64,

    /// Memory in bytes.
    #[serde(default)]
    pub memory: i64,

    /// Whole GPU devices.
    #[serde(default)]
    pub gpu: i64,

    #[serde(
        rename = "scalarResources",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub scalar_resources: Option<BTreeMap<String, i64>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct QueueResources {
    #[serde(default)]
    pub guaranteed: ResourceStats,
    #[serde(default)]
    pub allocated: ResourceStats,
    /// Zero in any dimension means "no limit".
    #[serde(default)]
    pub max: ResourceStats,
}
