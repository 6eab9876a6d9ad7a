mod common;

use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use kaiviz_console::{ApiError, ErrorBroadcaster, HttpVisualizerApi, VisualizerApi};

use common::{client, dead_url, spawn_backend, Backend, Shared};

async fn api_with(backend: Backend) -> (HttpVisualizerApi, ErrorBroadcaster, Shared) {
    let shared: Shared = Arc::new(Mutex::new(backend));
    let url = spawn_backend(shared.clone()).await;
    let errors = ErrorBroadcaster::default();
    let api = HttpVisualizerApi::new(client(), url, errors.clone());
    (api, errors, shared)
}

#[tokio::test]
async fn test_summary_decodes() {
    let (api, errors, _) = api_with(Backend::default()).await;
    let summary = api.cluster_summary().await.unwrap();
    assert_eq!(summary.total_nodes, 3);
    assert_eq!(summary.allocated_gpus, 5);
    let statuses: Vec<&str> = summary.job_counts.keys().map(String::as_str).collect();
    assert_eq!(statuses, vec!["Pending", "Running"]);
    assert_eq!(errors.current(), None);
}

#[tokio::test]
async fn test_jobs_namespace_query() {
    let (api, _, backend) = api_with(Backend::default()).await;

    let jobs = api.jobs("team-a").await.unwrap();
    assert_eq!(jobs.len(), 2);
    assert!(jobs[1].tasks.is_empty());

    api.jobs("").await.unwrap();
    assert_eq!(
        backend.lock().unwrap().namespaces,
        vec![Some("team-a".to_string()), None]
    );
}

#[tokio::test]
async fn test_nodes_and_queues_decode() {
    let (api, _, _) = api_with(Backend::default()).await;

    let nodes = api.nodes().await.unwrap();
    assert_eq!(nodes.len(), 2);
    assert!(nodes[0].gpu_slots[0].is_occupied());
    assert!(nodes[1].gpu_slots.is_empty());

    let queues = api.queues().await.unwrap();
    assert_eq!(queues[0].children[0].name, "research");
    assert_eq!(queues[0].resources.allocated.milli_cpu, 12000);
    assert!(queues[0].children[0].children.is_empty());
}

#[tokio::test]
async fn test_server_error_is_broadcast_and_returned() {
    let (api, errors, _) = api_with(Backend {
        fail: Some(StatusCode::INTERNAL_SERVER_ERROR),
        ..Default::default()
    })
    .await;
    let mut banner = errors.subscribe();

    let err = api.nodes().await.unwrap_err();
    assert_eq!(
        err,
        ApiError::Server {
            status: 500,
            reason: "Internal Server Error".to_string()
        }
    );
    banner.changed().await.unwrap();
    assert_eq!(
        banner.borrow().as_deref(),
        Some("Server error: 500 Internal Server Error")
    );
}

#[tokio::test]
async fn test_client_error_is_request_error() {
    let (api, errors, _) = api_with(Backend {
        fail: Some(StatusCode::NOT_FOUND),
        ..Default::default()
    })
    .await;

    let err = api.queues().await.unwrap_err();
    assert!(matches!(err, ApiError::Request { status: 404, .. }));
    assert_eq!(errors.current().as_deref(), Some("Request error: 404 Not Found"));
}

#[tokio::test]
async fn test_unreachable_backend() {
    let errors = ErrorBroadcaster::default();
    let api = HttpVisualizerApi::new(client(), dead_url().await, errors.clone());

    let err = api.cluster_summary().await.unwrap_err();
    assert_eq!(err, ApiError::Unreachable);
    assert_eq!(
        errors.current().as_deref(),
        Some("API server is unreachable. Check if KAI Scheduler is running.")
    );
}

#[tokio::test]
async fn test_malformed_body_is_unexpected() {
    let (api, errors, _) = api_with(Backend {
        raw_body: Some("{\"totalNodes\": \"many\"".to_string()),
        ..Default::default()
    })
    .await;

    let err = api.cluster_summary().await.unwrap_err();
    assert!(matches!(err, ApiError::Unexpected { .. }), "{err:?}");
    let message = errors.current().unwrap();
    assert!(message.starts_with("Unexpected error: "), "{message}");
}
