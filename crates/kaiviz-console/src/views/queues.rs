use std::sync::Arc;

use kaiviz_common::QueueView;

use crate::api::VisualizerApi;
use crate::clock::Clock;
use crate::pipeline::{ticks, Pipeline, PipelineState};
use crate::queue_tree::{QueueFlatNode, QueueTree};
use crate::resource_bar::ResourceBar;

#[derive(Debug, Clone)]
pub struct QueueRow<'a> {
    /// Index into the flattened tree, for `toggle`.
    pub index: usize,
    pub node: &'a QueueFlatNode,
    pub expanded: bool,
    /// CPU, memory, GPU.
    pub bars: [ResourceBar; 3],
}

/// Queue hierarchy as an expandable flat tree, refreshed on every tick.
#[derive(Debug)]
pub struct QueuesView {
    pipeline: Pipeline<Vec<QueueView>>,
    tree: QueueTree,
    applied: u64,
}

impl QueuesView {
    pub fn new(clock: &Clock, api: Arc<dyn VisualizerApi>) -> Self {
        let pipeline = Pipeline::spawn("queues", ticks(clock), move |_tick| {
            let api = api.clone();
            async move { api.queues().await }
        });
        Self {
            pipeline,
            tree: QueueTree::default(),
            applied: 0,
        }
    }

    pub fn state(&self) -> PipelineState<Vec<QueueView>> {
        self.pipeline.state()
    }

    /// Rebuilds the tree if a newer fetch result has landed. Returns
    /// whether it did.
    pub fn sync(&mut self) -> bool {
        let state = self.pipeline.state();
        if state.generation == self.applied {
            return false;
        }
        if let Some(roots) = &state.data {
            self.tree = QueueTree::from_roots(roots);
            tracing::trace!(generation = state.generation, rows = self.tree.nodes().len(), "queue tree rebuilt");
        }
        self.applied = state.generation;
        true
    }

    pub fn tree(&self) -> &QueueTree {
        &self.tree
    }

    pub fn toggle(&mut self, index: usize) -> bool {
        self.tree.toggle(index)
    }

    pub fn expand_all(&mut self) {
        self.tree.expand_all();
    }

    pub fn collapse_all(&mut self) {
        self.tree.collapse_all();
    }

    pub fn rows(&self) -> Vec<QueueRow<'_>> {
        self.tree
            .visible()
            .into_iter()
            .map(|(index, node)| QueueRow {
                index,
                node,
                expanded: self.tree.is_expanded(index),
                bars: ResourceBar::for_queue(&node.resources),
            })
            .collect()
    }

    pub async fn changed(&mut self) -> bool {
        let alive = self.pipeline.changed().await;
        self.sync();
        alive
    }
}
