use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use kaiviz_common::{ClusterSummary, JobView, NodeView, QueueView};

use crate::api::{ApiError, VisualizerApi};

#[derive(Default)]
struct FakeState {
    summary: ClusterSummary,
    jobs: Vec<JobView>,
    nodes: Vec<NodeView>,
    queues: Vec<QueueView>,
    failure: Option<ApiError>,
    job_namespaces: Vec<String>,
}

/// In-memory backend that answers immediately.
#[derive(Clone, Default)]
pub(crate) struct FakeApi {
    state: Arc<Mutex<FakeState>>,
}

impl FakeApi {
    pub fn set_summary(&self, summary: ClusterSummary) {
        self.state.lock().unwrap().summary = summary;
    }

    pub fn set_queues(&self, queues: Vec<QueueView>) {
        self.state.lock().unwrap().queues = queues;
    }

    pub fn fail_with(&self, err: ApiError) {
        self.state.lock().unwrap().failure = Some(err);
    }

    pub fn clear_failure(&self) {
        self.state.lock().unwrap().failure = None;
    }

    pub fn job_namespaces(&self) -> Vec<String> {
        self.state.lock().unwrap().job_namespaces.clone()
    }

    fn answer<T: Clone>(&self, pick: impl FnOnce(&FakeState) -> &T) -> Result<T, ApiError> {
        let state = self.state.lock().unwrap();
        match &state.failure {
            Some(err) => Err(err.clone()),
            None => Ok(pick(&*state).clone()),
        }
    }
}

#[async_trait]
impl VisualizerApi for FakeApi {
    async fn cluster_summary(&self) -> Result<ClusterSummary, ApiError> {
        self.answer(|s| &s.summary)
    }

    async fn jobs(&self, namespace: &str) -> Result<Vec<JobView>, ApiError> {
        self.state
            .lock()
            .unwrap()
            .job_namespaces
            .push(namespace.to_string());
        self.answer(|s| &s.jobs)
    }

    async fn nodes(&self) -> Result<Vec<NodeView>, ApiError> {
        self.answer(|s| &s.nodes)
    }

    async fn queues(&self) -> Result<Vec<QueueView>, ApiError> {
        self.answer(|s| &s.queues)
    }
}
