use kaiviz_common::QueueResources;

const KIB: f64 = 1024.0;
const MIB: f64 = 1024.0 * 1024.0;
const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Headroom given to unbounded resources so the bar never sits at 100%.
const UNBOUNDED_HEADROOM: f64 = 1.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceUnit {
    MilliCpu,
    MemoryBytes,
    GpuCount,
    Generic,
}

impl ResourceUnit {
    pub fn format(self, value: f64) -> String {
        match self {
            ResourceUnit::MilliCpu => {
                if value >= 1000.0 {
                    format!("{:.1} cores", value / 1000.0)
                } else {
                    format!("{value}m")
                }
            }
            ResourceUnit::MemoryBytes => format_bytes(value),
            ResourceUnit::GpuCount | ResourceUnit::Generic => format!("{value}"),
        }
    }
}

fn format_bytes(bytes: f64) -> String {
    if bytes == 0.0 {
        return "0".to_string();
    }
    if bytes >= GIB {
        return format!("{:.2} GiB", bytes / GIB);
    }
    if bytes >= MIB {
        return format!("{:.1} MiB", bytes / MIB);
    }
    // Whole KiB, halves rounded up.
    format!("{} KiB", (bytes / KIB).round())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarStatus {
    Normal,
    /// Allocated above the guarantee.
    Warning,
    /// Allocated above the hard limit.
    Critical,
}

impl BarStatus {
    /// Theme palette name used by the renderer.
    pub fn palette(self) -> &'static str {
        match self {
            BarStatus::Normal => "primary",
            BarStatus::Warning => "accent",
            BarStatus::Critical => "warn",
        }
    }
}

/// A guaranteed/allocated/max triple scaled onto a 0–100% bar.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceBar {
    pub resource_name: String,
    pub unit: ResourceUnit,
    pub usage_percent: f64,
    pub guaranteed_percent: f64,
    pub status: BarStatus,
    pub display_allocated: String,
    pub display_guaranteed: String,
    /// Empty when `max` is 0 (no limit).
    pub display_max: String,
    pub tooltip: String,
}

impl ResourceBar {
    /// `max == 0` means the resource is unbounded.
    pub fn compute(
        resource_name: &str,
        unit: ResourceUnit,
        guaranteed: f64,
        allocated: f64,
        max: f64,
    ) -> Self {
        let mut scale_base = if max > 0.0 {
            max
        } else {
            guaranteed.max(allocated).max(1.0) * UNBOUNDED_HEADROOM
        };
        if scale_base <= 0.0 {
            scale_base = 1.0;
        }

        let usage_percent = (allocated / scale_base * 100.0).min(100.0);
        let guaranteed_percent = (guaranteed / scale_base * 100.0).min(100.0);

        let status = if allocated > max && max > 0.0 {
            BarStatus::Critical
        } else if allocated > guaranteed && guaranteed > 0.0 {
            BarStatus::Warning
        } else {
            BarStatus::Normal
        };

        let display_allocated = unit.format(allocated);
        let display_guaranteed = unit.format(guaranteed);
        let display_max = if max > 0.0 {
            unit.format(max)
        } else {
            String::new()
        };
        let tooltip = format!(
            "{resource_name}:  Used: {display_allocated}  Guaranteed: {display_guaranteed}  Max: {}",
            if max > 0.0 { display_max.as_str() } else { "Unlimited" }
        );

        Self {
            resource_name: resource_name.to_string(),
            unit,
            usage_percent,
            guaranteed_percent,
            status,
            display_allocated,
            display_guaranteed,
            display_max,
            tooltip,
        }
    }

    /// CPU, memory and GPU bars for one queue.
    pub fn for_queue(resources: &QueueResources) -> [ResourceBar; 3] {
        let QueueResources {
            guaranteed,
            allocated,
            max,
        } = resources;
        [
            Self::compute(
                "CPU",
                ResourceUnit::MilliCpu,
                guaranteed.milli_cpu as f64,
                allocated.milli_cpu as f64,
                max.milli_cpu as f64,
            ),
            Self::compute(
                "Memory",
                ResourceUnit::MemoryBytes,
                guaranteed.memory as f64,
                allocated.memory as f64,
                max.memory as f64,
            ),
            Self::compute(
                "GPU",
                ResourceUnit::GpuCount,
                guaranteed.gpu as f64,
                allocated.gpu as f64,
                max.gpu as f64,
            ),
        ]
    }
}
