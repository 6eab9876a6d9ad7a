mod dashboard;
mod jobs;
mod nodes;
mod queues;

pub use dashboard::{DashboardModel, DashboardView};
pub use jobs::{
    status_chip, JobPage, JobRow, JobSortKey, JobTable, JobsView, SortDirection,
    DEFAULT_PAGE_SIZE,
};
pub use nodes::{NodeCard, NodeFilter, NodesView, SlotBadge, SlotClass};
pub use queues::{QueueRow, QueuesView};

use crate::route::Route;

/// The mounted view. Dropping it tears down its pipeline.
#[derive(Debug)]
pub enum View {
    Dashboard(DashboardView),
    Jobs(JobsView),
    Nodes(NodesView),
    Queues(QueuesView),
}

impl View {
    pub fn name(&self) -> &'static str {
        match self {
            View::Dashboard(_) => "dashboard",
            View::Jobs(_) => "jobs",
            View::Nodes(_) => "nodes",
            View::Queues(_) => "queues",
        }
    }

    /// Where this view currently sits, including its seeded status filter.
    pub fn route(&self) -> Route {
        match self {
            View::Dashboard(_) => Route::Dashboard,
            View::Jobs(v) => Route::Jobs {
                status: Some(v.table().status_filter().to_string()).filter(|s| !s.is_empty()),
            },
            View::Nodes(_) => Route::Nodes,
            View::Queues(_) => Route::Queues,
        }
    }

    pub fn loading(&self) -> bool {
        match self {
            View::Dashboard(v) => v.state().loading,
            View::Jobs(v) => v.state().loading,
            View::Nodes(v) => v.state().loading,
            View::Queues(v) => v.state().loading,
        }
    }

    /// Waits for the next state change of the view's pipeline.
    pub async fn changed(&mut self) -> bool {
        match self {
            View::Dashboard(v) => v.changed().await,
            View::Jobs(v) => v.changed().await,
            View::Nodes(v) => v.changed().await,
            View::Queues(v) => v.changed().await,
        }
    }
}
