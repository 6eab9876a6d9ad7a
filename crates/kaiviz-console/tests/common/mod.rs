#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

/// Canned responses of a fake visualizer backend.
pub struct Backend {
    pub summary: Value,
    pub jobs: Value,
    pub nodes: Value,
    pub queues: Value,
    /// Answer every request with this status instead.
    pub fail: Option<StatusCode>,
    /// Answer every request with this body instead.
    pub raw_body: Option<String>,
    /// `namespace` query of every `/jobs` request, in arrival order.
    pub namespaces: Vec<Option<String>>,
}

pub type Shared = Arc<Mutex<Backend>>;

impl Default for Backend {
    fn default() -> Self {
        Self {
            summary: json!({
                "totalNodes": 3,
                "healthyNodes": 2,
                "totalGPUs": 16,
                "allocatedGPUs": 5,
                "totalQueues": 4,
                "jobCounts": {"Running": 3, "Pending": 1}
            }),
            jobs: json!([
                {
                    "uid": "a1",
                    "name": "llama-finetune",
                    "namespace": "team-a",
                    "queue": "research",
                    "status": "Running",
                    "createTime": "2025-03-01T08:30:00Z",
                    "tasks": [{"name": "llama-finetune-0", "status": "Running", "nodeName": "dgx-01"}]
                },
                {
                    "uid": "a2",
                    "name": "bert-eval",
                    "namespace": "team-a",
                    "queue": "research",
                    "status": "Pending",
                    "createTime": "2025-03-01T09:00:00Z",
                    "tasks": null
                }
            ]),
            nodes: json!([
                {
                    "name": "dgx-01",
                    "status": "Ready",
                    "allocatable": {"milliCPU": 64000, "memory": 549755813888u64, "gpu": 2},
                    "used": {"milliCPU": 16000, "memory": 137438953472u64, "gpu": 1},
                    "gpuSlots": [
                        {"id": 0, "occupiedBy": "llama-finetune-0", "fragmented": false},
                        {"id": 1, "occupiedBy": "", "fragmented": true}
                    ]
                },
                {
                    "name": "cpu-01",
                    "status": "NotReady",
                    "allocatable": {"milliCPU": 8000, "memory": 34359738368u64, "gpu": 0},
                    "used": {"milliCPU": 0, "memory": 0, "gpu": 0},
                    "gpuSlots": null
                }
            ]),
            queues: json!([
                {
                    "name": "root",
                    "parent": "",
                    "weight": 1,
                    "resources": {
                        "guaranteed": {"milliCPU": 8000, "memory": 0, "gpu": 4},
                        "allocated": {"milliCPU": 12000, "memory": 0, "gpu": 2},
                        "max": {"milliCPU": 0, "memory": 0, "gpu": 8}
                    },
                    "children": [
                        {"name": "research", "parent": "root", "weight": 2, "resources": null, "children": null}
                    ]
                }
            ]),
            fail: None,
            raw_body: None,
            namespaces: Vec::new(),
        }
    }
}

/// Serves `backend` on an ephemeral port and returns the API base URL.
pub async fn spawn_backend(backend: Shared) -> String {
    let app = Router::new()
        .route("/api/v1/visualizer/summary", get(summary))
        .route("/api/v1/visualizer/jobs", get(jobs))
        .route("/api/v1/visualizer/nodes", get(nodes))
        .route("/api/v1/visualizer/queues", get(queues))
        .with_state(backend);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/api/v1/visualizer")
}

/// A base URL nothing listens on.
pub async fn dead_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/api/v1/visualizer")
}

pub fn client() -> reqwest::Client {
    kaiviz_console::HttpVisualizerApi::build_client(Duration::from_secs(2), Duration::from_secs(5))
        .unwrap()
}

/// Polls `check` until it holds or two seconds pass.
pub async fn eventually(mut check: impl FnMut() -> bool) {
    let result = tokio::time::timeout(Duration::from_secs(2), async {
        while !check() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await;
    assert!(result.is_ok(), "condition not reached within 2s");
}

fn respond(backend: &Backend, body: &Value) -> Response {
    if let Some(status) = backend.fail {
        return status.into_response();
    }
    if let Some(raw) = &backend.raw_body {
        return ([(header::CONTENT_TYPE, "application/json")], raw.clone()).into_response();
    }
    Json(body.clone()).into_response()
}

async fn summary(State(backend): State<Shared>) -> Response {
    let backend = backend.lock().unwrap();
    respond(&backend, &backend.summary)
}

async fn jobs(
    State(backend): State<Shared>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    let mut backend = backend.lock().unwrap();
    backend.namespaces.push(query.get("namespace").cloned());
    respond(&backend, &backend.jobs)
}

async fn nodes(State(backend): State<Shared>) -> Response {
    let backend = backend.lock().unwrap();
    respond(&backend, &backend.nodes)
}

async fn queues(State(backend): State<Shared>) -> Response {
    let backend = backend.lock().unwrap();
    respond(&backend, &backend.queues)
}
