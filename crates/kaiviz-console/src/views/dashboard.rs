use std::sync::Arc;

use kaiviz_common::ClusterSummary;

use crate::api::VisualizerApi;
use crate::clock::Clock;
use crate::donut::DonutChart;
use crate::pipeline::{ticks, Pipeline, PipelineState};
use crate::route::Route;

/// Cluster summary counters and the job-status donut.
#[derive(Debug)]
pub struct DashboardView {
    pipeline: Pipeline<ClusterSummary>,
    hovered: Option<usize>,
}

/// Derived from the latest summary.
#[derive(Debug, Clone)]
pub struct DashboardModel {
    pub summary: Arc<ClusterSummary>,
    pub chart: DonutChart,
    pub hovered: Option<usize>,
    pub loading: bool,
}

impl DashboardModel {
    pub fn nodes_label(&self) -> String {
        format!("{} / {}", self.summary.healthy_nodes, self.summary.total_nodes)
    }

    pub fn gpus_label(&self) -> String {
        format!(
            "{} / {}",
            self.summary.allocated_gpus, self.summary.total_gpus
        )
    }
}

impl DashboardView {
    pub fn new(clock: &Clock, api: Arc<dyn VisualizerApi>) -> Self {
        let pipeline = Pipeline::spawn("summary", ticks(clock), move |_tick| {
            let api = api.clone();
            async move { api.cluster_summary().await }
        });
        Self {
            pipeline,
            hovered: None,
        }
    }

    pub fn state(&self) -> PipelineState<ClusterSummary> {
        self.pipeline.state()
    }

    /// `None` until the first summary arrives.
    pub fn model(&self) -> Option<DashboardModel> {
        let state = self.pipeline.state();
        let summary = state.data?;
        let chart = DonutChart::from_counts(&summary.job_counts);
        let hovered = self.hovered.filter(|i| *i < chart.segments.len());
        Some(DashboardModel {
            summary,
            chart,
            hovered,
            loading: state.loading,
        })
    }

    /// Highlights one donut segment; `None` clears the highlight.
    pub fn hover(&mut self, segment: Option<usize>) {
        self.hovered = segment;
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn click(&self, segment: usize) -> Option<Route> {
        self.model()?.chart.click(segment)
    }

    pub async fn changed(&mut self) -> bool {
        self.pipeline.changed().await
    }
}
