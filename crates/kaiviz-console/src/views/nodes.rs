use std::sync::Arc;

use kaiviz_common::{GpuSlot, NodeView};

use crate::api::VisualizerApi;
use crate::clock::Clock;
use crate::pipeline::{ticks, Pipeline, PipelineState};
use crate::resource_bar::{ResourceBar, ResourceUnit};

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeFilter {
    /// Case-insensitive substring of the node name.
    pub text: String,
    pub gpu_only: bool,
}

impl NodeFilter {
    pub fn matches(&self, node: &NodeView) -> bool {
        let text = self.text.to_lowercase();
        node.name.to_lowercase().contains(&text) && (!self.gpu_only || node.has_gpu())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotClass {
    Occupied,
    Fragmented,
    Free,
}

impl SlotClass {
    pub fn of(slot: &GpuSlot) -> Self {
        if slot.is_occupied() {
            SlotClass::Occupied
        } else if slot.fragmented {
            SlotClass::Fragmented
        } else {
            SlotClass::Free
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SlotClass::Occupied => "occupied",
            SlotClass::Fragmented => "fragmented",
            SlotClass::Free => "free",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotBadge {
    pub id: i64,
    pub class: SlotClass,
    pub tooltip: String,
}

impl SlotBadge {
    pub fn new(slot: &GpuSlot) -> Self {
        let class = SlotClass::of(slot);
        let detail = match class {
            SlotClass::Occupied => format!("Occupied by: {}", slot.occupied_by),
            SlotClass::Fragmented => "Fragmented (Unusable due to constraints)".to_string(),
            SlotClass::Free => "Free".to_string(),
        };
        Self {
            id: slot.id,
            class,
            tooltip: format!("GPU #{} - {}", slot.id, detail),
        }
    }
}

/// Everything one node card shows.
#[derive(Debug, Clone)]
pub struct NodeCard {
    pub name: String,
    pub ready: bool,
    pub cpu_capacity: String,
    pub memory_capacity: String,
    pub cpu_usage_percent: f64,
    pub memory_usage_percent: f64,
    pub cpu_bar: ResourceBar,
    pub memory_bar: ResourceBar,
    pub slots: Vec<SlotBadge>,
}

impl NodeCard {
    pub fn new(node: &NodeView) -> Self {
        let cap = &node.allocatable;
        let used = &node.used;
        Self {
            name: node.name.clone(),
            ready: node.is_ready(),
            cpu_capacity: format!("{:.1} Cores", cap.milli_cpu as f64 / 1000.0),
            memory_capacity: format!("{:.1} GiB", cap.memory as f64 / GIB),
            cpu_usage_percent: usage_percent(used.milli_cpu, cap.milli_cpu),
            memory_usage_percent: usage_percent(used.memory, cap.memory),
            cpu_bar: ResourceBar::compute(
                "CPU",
                ResourceUnit::MilliCpu,
                0.0,
                used.milli_cpu as f64,
                cap.milli_cpu as f64,
            ),
            memory_bar: ResourceBar::compute(
                "Memory",
                ResourceUnit::MemoryBytes,
                0.0,
                used.memory as f64,
                cap.memory as f64,
            ),
            slots: node.gpu_slots.iter().map(SlotBadge::new).collect(),
        }
    }

    pub fn has_gpu(&self) -> bool {
        !self.slots.is_empty()
    }
}

fn usage_percent(used: i64, capacity: i64) -> f64 {
    if capacity == 0 {
        return 0.0;
    }
    used as f64 / capacity as f64 * 100.0
}

/// Node cards, refreshed on every tick.
#[derive(Debug)]
pub struct NodesView {
    pipeline: Pipeline<Vec<NodeView>>,
    filter: NodeFilter,
}

impl NodesView {
    pub fn new(clock: &Clock, api: Arc<dyn VisualizerApi>) -> Self {
        let pipeline = Pipeline::spawn("nodes", ticks(clock), move |_tick| {
            let api = api.clone();
            async move { api.nodes().await }
        });
        Self {
            pipeline,
            filter: NodeFilter::default(),
        }
    }

    pub fn state(&self) -> PipelineState<Vec<NodeView>> {
        self.pipeline.state()
    }

    pub fn filter(&self) -> &NodeFilter {
        &self.filter
    }

    pub fn set_filter_text(&mut self, text: &str) {
        self.filter.text = text.trim().to_string();
    }

    pub fn toggle_gpu_only(&mut self) -> bool {
        self.filter.gpu_only = !self.filter.gpu_only;
        self.filter.gpu_only
    }

    /// Cards for the nodes passing the current filter; empty before the
    /// first successful fetch.
    pub fn cards(&self) -> Vec<NodeCard> {
        let Some(nodes) = self.pipeline.state().data else {
            return Vec::new();
        };
        nodes
            .iter()
            .filter(|n| self.filter.matches(n))
            .map(NodeCard::new)
            .collect()
    }

    pub async fn changed(&mut self) -> bool {
        self.pipeline.changed().await
    }
}
