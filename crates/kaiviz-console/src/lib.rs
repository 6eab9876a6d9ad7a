pub mod api;
pub mod clock;
pub mod console;
pub mod donut;
pub mod error_banner;
pub mod namespace;
pub mod pipeline;
pub mod queue_tree;
pub mod resource_bar;
pub mod route;
pub mod views;

#[cfg(test)]
mod testing;

pub use api::{ApiError, HttpVisualizerApi, VisualizerApi, DEFAULT_API_URL};
pub use clock::{Clock, Tick, DEFAULT_REFRESH_INTERVAL};
pub use console::{Console, ConsoleConfig};
pub use error_banner::{ErrorBroadcaster, DEFAULT_AUTO_CLEAR};
pub use namespace::NamespaceSelector;
pub use pipeline::{Pipeline, PipelineState};
pub use route::Route;
pub use views::View;
