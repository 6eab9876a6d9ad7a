use std::sync::Arc;
use std::time::Duration;

use crate::api::{HttpVisualizerApi, VisualizerApi};
use crate::clock::{Clock, DEFAULT_REFRESH_INTERVAL};
use crate::error_banner::{ErrorBroadcaster, DEFAULT_AUTO_CLEAR};
use crate::namespace::NamespaceSelector;
use crate::route::Route;
use crate::views::{DashboardView, JobsView, NodesView, QueuesView, View, DEFAULT_PAGE_SIZE};

#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    pub refresh_interval: Duration,
    /// Empty for all namespaces.
    pub namespace: String,
    pub page_size: usize,
    pub error_clear: Duration,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            refresh_interval: DEFAULT_REFRESH_INTERVAL,
            namespace: String::new(),
            page_size: DEFAULT_PAGE_SIZE,
            error_clear: DEFAULT_AUTO_CLEAR,
        }
    }
}

/// Application root. Owns the shared clock, namespace selector and error
/// banner; every view opened from it observes the same instances.
pub struct Console {
    clock: Clock,
    namespace: NamespaceSelector,
    errors: ErrorBroadcaster,
    api: Arc<dyn VisualizerApi>,
    page_size: usize,
}

impl Console {
    /// `errors` must be the broadcaster `api` reports to.
    pub fn new(config: ConsoleConfig, api: Arc<dyn VisualizerApi>, errors: ErrorBroadcaster) -> Self {
        tracing::info!(
            interval_ms = config.refresh_interval.as_millis() as u64,
            namespace = %config.namespace,
            "console started"
        );
        Self {
            clock: Clock::new(config.refresh_interval),
            namespace: NamespaceSelector::new(config.namespace),
            errors,
            api,
            page_size: config.page_size,
        }
    }

    /// Console backed by the HTTP visualizer API at `base_url`.
    pub fn connect(config: ConsoleConfig, http: reqwest::Client, base_url: &str) -> Self {
        let errors = ErrorBroadcaster::new(config.error_clear);
        let api = HttpVisualizerApi::new(http, base_url, errors.clone());
        Self::new(config, Arc::new(api), errors)
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn namespace(&self) -> &NamespaceSelector {
        &self.namespace
    }

    pub fn errors(&self) -> &ErrorBroadcaster {
        &self.errors
    }

    /// Mounts the view for `route`. The previous view, if any, should be
    /// dropped by the caller to stop its fetches.
    pub fn open(&self, route: &Route) -> View {
        tracing::debug!(route = %route, "opening view");
        match route {
            Route::Dashboard => View::Dashboard(DashboardView::new(&self.clock, self.api.clone())),
            Route::Jobs { status } => View::Jobs(JobsView::new(
                &self.clock,
                &self.namespace,
                self.api.clone(),
                self.page_size,
                status.as_deref(),
            )),
            Route::Nodes => View::Nodes(NodesView::new(&self.clock, self.api.clone())),
            Route::Queues => View::Queues(QueuesView::new(&self.clock, self.api.clone())),
        }
    }
}
