use std::collections::BTreeMap;
use std::f64::consts::PI;

use crate::route::Route;

pub const CENTER_X: f64 = 100.0;
pub const CENTER_Y: f64 = 100.0;
pub const OUTER_RADIUS: f64 = 90.0;
pub const INNER_RADIUS: f64 = 55.0;

/// Largest sweep drawn as a single arc; a full 360° arc has identical end
/// points and would not render.
const MAX_SWEEP: f64 = 359.999;
/// 12 o'clock in SVG coordinates (0° = 3 o'clock, clockwise positive).
const START_ANGLE: f64 = -90.0;

const UNKNOWN_COLOR: &str = "#9e9e9e";

pub fn status_color(status: &str) -> &'static str {
    match status {
        "Running" => "#4caf50",
        "Pending" => "#ff9800",
        "Failed" => "#f44336",
        "Completed" => "#2196f3",
        _ => UNKNOWN_COLOR,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArcSegment {
    pub status: String,
    pub count: u64,
    /// Fraction of the total, 0.0–1.0.
    pub percent: f64,
    pub color: &'static str,
    /// Degrees.
    pub start_angle: f64,
    pub end_angle: f64,
    /// SVG path data for the annulus slice.
    pub path: String,
    pub label_x: f64,
    pub label_y: f64,
}

impl ArcSegment {
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }
}

/// Job-status donut chart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DonutChart {
    pub segments: Vec<ArcSegment>,
    pub total: u64,
}

impl DonutChart {
    /// Lays out one segment per non-zero count, in iteration order,
    /// clockwise from 12 o'clock.
    pub fn build<'a, I>(counts: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, u64)>,
    {
        let entries: Vec<(&str, u64)> = counts.into_iter().filter(|(_, c)| *c > 0).collect();
        let total: u64 = entries.iter().map(|(_, c)| c).sum();
        if total == 0 {
            return Self::default();
        }

        let label_radius = (OUTER_RADIUS + INNER_RADIUS) / 2.0;
        let mut current_angle = START_ANGLE;
        let segments = entries
            .into_iter()
            .map(|(status, count)| {
                let percent = count as f64 / total as f64;
                let start_angle = current_angle;
                let end_angle = current_angle + percent * 360.0;
                current_angle = end_angle;

                let mid = (start_angle + end_angle) / 2.0 * PI / 180.0;
                ArcSegment {
                    status: status.to_string(),
                    count,
                    percent,
                    color: status_color(status),
                    start_angle,
                    end_angle,
                    path: describe_arc(start_angle, end_angle),
                    label_x: CENTER_X + label_radius * mid.cos(),
                    label_y: CENTER_Y + label_radius * mid.sin(),
                }
            })
            .collect();

        Self { segments, total }
    }

    pub fn from_counts(counts: &BTreeMap<String, u64>) -> Self {
        Self::build(counts.iter().map(|(status, count)| (status.as_str(), *count)))
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Navigation intent for clicking segment `index`: the jobs list
    /// filtered by that segment's status.
    pub fn click(&self, index: usize) -> Option<Route> {
        self.segments.get(index).map(|seg| Route::Jobs {
            status: Some(seg.status.clone()),
        })
    }
}

/// SVG path for a donut slice from `start_deg` to `end_deg`: outer arc
/// clockwise, line inward, inner arc back counter-clockwise.
pub fn describe_arc(start_deg: f64, end_deg: f64) -> String {
    let sweep = (end_deg - start_deg).min(MAX_SWEEP);

    let start = start_deg * PI / 180.0;
    let end = (start_deg + sweep) * PI / 180.0;
    let large_arc = u8::from(sweep > 180.0);

    let ox1 = CENTER_X + OUTER_RADIUS * start.cos();
    let oy1 = CENTER_Y + OUTER_RADIUS * start.sin();
    let ox2 = CENTER_X + OUTER_RADIUS * end.cos();
    let oy2 = CENTER_Y + OUTER_RADIUS * end.sin();
    let ix1 = CENTER_X + INNER_RADIUS * end.cos();
    let iy1 = CENTER_Y + INNER_RADIUS * end.sin();
    let ix2 = CENTER_X + INNER_RADIUS * start.cos();
    let iy2 = CENTER_Y + INNER_RADIUS * start.sin();

    format!(
        "M {ox1} {oy1} A {OUTER_RADIUS} {OUTER_RADIUS} 0 {large_arc} 1 {ox2} {oy2} \
         L {ix1} {iy1} A {INNER_RADIUS} {INNER_RADIUS} 0 {large_arc} 0 {ix2} {iy2} Z"
    )
}
