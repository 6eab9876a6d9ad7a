use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::null_as_default;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TaskView {
    pub name: String,
    pub status: String,
    #[serde(default)]
    pub node_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct JobView {
    pub uid: String,
    pub name: String,
    pub namespace: String,
    #[serde(default)]
    pub queue: String,
    pub status: String,
    pub create_time: DateTime<Utc>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tasks: Vec<TaskView>,
}
