use std::cmp::Ordering;
use std::sync::Arc;

use kaiviz_common::JobView;

use crate::api::VisualizerApi;
use crate::clock::{Clock, Tick};
use crate::namespace::NamespaceSelector;
use crate::pipeline::{ticks_with_namespace, Pipeline, PipelineState};

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobSortKey {
    Name,
    Namespace,
    Status,
    Queue,
    CreateTime,
    Tasks,
}

impl JobSortKey {
    pub fn parse(column: &str) -> Option<Self> {
        match column.to_ascii_lowercase().as_str() {
            "name" => Some(Self::Name),
            "namespace" | "ns" => Some(Self::Namespace),
            "status" => Some(Self::Status),
            "queue" => Some(Self::Queue),
            "createtime" | "created" | "age" => Some(Self::CreateTime),
            "tasks" => Some(Self::Tasks),
            _ => None,
        }
    }

    fn compare(self, a: &JobView, b: &JobView) -> Ordering {
        match self {
            Self::Name => a.name.cmp(&b.name),
            Self::Namespace => a.namespace.cmp(&b.namespace),
            Self::Status => a.status.cmp(&b.status),
            Self::Queue => a.queue.cmp(&b.queue),
            Self::CreateTime => a.create_time.cmp(&b.create_time),
            Self::Tasks => a.tasks.len().cmp(&b.tasks.len()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn parse(dir: &str) -> Option<Self> {
        match dir.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(Self::Ascending),
            "desc" | "descending" => Some(Self::Descending),
            _ => None,
        }
    }
}

/// Theme palette for a job status chip.
pub fn status_chip(status: &str) -> &'static str {
    match status.to_ascii_lowercase().as_str() {
        "running" => "primary",
        "pending" => "accent",
        "failed" => "warn",
        _ => "default",
    }
}

#[derive(Debug, Clone)]
pub struct JobRow<'a> {
    pub job: &'a JobView,
    pub chip: &'static str,
    pub expanded: bool,
}

/// One rendered page of the jobs table.
#[derive(Debug, Clone)]
pub struct JobPage<'a> {
    pub rows: Vec<JobRow<'a>>,
    pub total_matching: usize,
    /// Zero-based, already clamped to `page_count`.
    pub page: usize,
    /// At least 1, even when nothing matches.
    pub page_count: usize,
}

/// Client-side filter, sort, pagination and row expansion state.
///
/// Filters are case-insensitive substring matches. The status filter is
/// seeded from navigation and cleared as soon as a text filter is applied.
#[derive(Debug, Clone)]
pub struct JobTable {
    status_filter: String,
    text_filter: String,
    sort: Option<(JobSortKey, SortDirection)>,
    page: usize,
    page_size: usize,
    expanded: Option<String>,
}

impl Default for JobTable {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl JobTable {
    pub fn new(page_size: usize) -> Self {
        Self {
            status_filter: String::new(),
            text_filter: String::new(),
            sort: None,
            page: 0,
            page_size: page_size.max(1),
            expanded: None,
        }
    }

    pub fn status_filter(&self) -> &str {
        &self.status_filter
    }

    pub fn text_filter(&self) -> &str {
        &self.text_filter
    }

    pub fn sort(&self) -> Option<(JobSortKey, SortDirection)> {
        self.sort
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn expanded(&self) -> Option<&str> {
        self.expanded.as_deref()
    }

    pub fn seed_status(&mut self, status: Option<&str>) {
        self.status_filter = status.unwrap_or_default().trim().to_lowercase();
        self.page = 0;
    }

    pub fn apply_filter(&mut self, text: &str) {
        self.status_filter.clear();
        self.text_filter = text.trim().to_lowercase();
        self.page = 0;
    }

    pub fn set_sort(&mut self, key: JobSortKey, direction: SortDirection) {
        self.sort = Some((key, direction));
        self.page = 0;
    }

    pub fn clear_sort(&mut self) {
        self.sort = None;
        self.page = 0;
    }

    /// Zero-based; clamped when rendering.
    pub fn set_page(&mut self, page: usize) {
        self.page = page;
    }

    /// Expands `uid`, or collapses it if it was already expanded. Returns
    /// whether the row is now expanded.
    pub fn toggle_expanded(&mut self, uid: &str) -> bool {
        if self.expanded.as_deref() == Some(uid) {
            self.expanded = None;
            false
        } else {
            self.expanded = Some(uid.to_string());
            true
        }
    }

    pub fn matches(&self, job: &JobView) -> bool {
        if !self.status_filter.is_empty()
            && !job.status.to_lowercase().contains(&self.status_filter)
        {
            return false;
        }
        if self.text_filter.is_empty() {
            return true;
        }
        format!("{}{}{}", job.name, job.namespace, job.status)
            .to_lowercase()
            .contains(&self.text_filter)
    }

    pub fn render<'a>(&self, jobs: &'a [JobView]) -> JobPage<'a> {
        let mut matching: Vec<&JobView> = jobs.iter().filter(|j| self.matches(j)).collect();
        if let Some((key, direction)) = self.sort {
            matching.sort_by(|a, b| {
                let ord = key.compare(a, b);
                match direction {
                    SortDirection::Ascending => ord,
                    SortDirection::Descending => ord.reverse(),
                }
            });
        }

        let total_matching = matching.len();
        let page_count = total_matching.div_ceil(self.page_size).max(1);
        let page = self.page.min(page_count - 1);
        let rows = matching
            .into_iter()
            .skip(page * self.page_size)
            .take(self.page_size)
            .map(|job| JobRow {
                job,
                chip: status_chip(&job.status),
                expanded: self.expanded.as_deref() == Some(job.uid.as_str()),
            })
            .collect();

        JobPage {
            rows,
            total_matching,
            page,
            page_count,
        }
    }
}

/// Jobs of the selected namespace, refreshed on every tick and namespace
/// change.
#[derive(Debug)]
pub struct JobsView {
    pipeline: Pipeline<Vec<JobView>>,
    table: JobTable,
}

impl JobsView {
    pub fn new(
        clock: &Clock,
        namespace: &NamespaceSelector,
        api: Arc<dyn VisualizerApi>,
        page_size: usize,
        status: Option<&str>,
    ) -> Self {
        let pipeline = Pipeline::spawn(
            "jobs",
            ticks_with_namespace(clock, namespace),
            move |(_tick, ns): (Tick, String)| {
                let api = api.clone();
                async move { api.jobs(&ns).await }
            },
        );
        let mut table = JobTable::new(page_size);
        table.seed_status(status);
        Self { pipeline, table }
    }

    pub fn state(&self) -> PipelineState<Vec<JobView>> {
        self.pipeline.state()
    }

    pub fn table(&self) -> &JobTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut JobTable {
        &mut self.table
    }

    pub async fn changed(&mut self) -> bool {
        self.pipeline.changed().await
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use kaiviz_common::TaskView;

    use super::*;

    fn job(uid: &str, name: &str, namespace: &str, status: &str, minute: u32, tasks: usize) -> JobView {
        JobView {
            uid: uid.to_string(),
            name: name.to_string(),
            namespace: namespace.to_string(),
            queue: "default".to_string(),
            status: status.to_string(),
            create_time: Utc.with_ymd_and_hms(2025, 3, 1, 8, minute, 0).unwrap(),
            tasks: (0..tasks)
                .map(|i| TaskView {
                    name: format!("{name}-{i}"),
                    status: status.to_string(),
                    node_name: String::new(),
                })
                .collect(),
        }
    }

    fn sample() -> Vec<JobView> {
        vec![
            job("1", "train-llama", "team-a", "Running", 5, 4),
            job("2", "eval-bert", "team-b", "Pending", 1, 1),
            job("3", "train-vit", "team-a", "Failed", 3, 2),
            job("4", "serve-llama", "team-c", "Running", 2, 8),
        ]
    }

    fn names<'a>(page: &JobPage<'a>) -> Vec<&'a str> {
        page.rows.iter().map(|r| r.job.name.as_str()).collect()
    }

    #[test]
    fn test_status_seed_filters_by_status() {
        let jobs = sample();
        let mut table = JobTable::default();
        table.seed_status(Some("Running"));
        let page = table.render(&jobs);
        assert_eq!(names(&page), vec!["train-llama", "serve-llama"]);
        assert_eq!(page.total_matching, 2);
    }

    #[test]
    fn test_text_filter_clears_status_seed() {
        let jobs = sample();
        let mut table = JobTable::default();
        table.seed_status(Some("Running"));
        table.apply_filter("  TRAIN ");
        assert_eq!(table.status_filter(), "");
        assert_eq!(table.text_filter(), "train");
        let page = table.render(&jobs);
        assert_eq!(names(&page), vec!["train-llama", "train-vit"]);
    }

    #[test]
    fn test_text_filter_spans_name_namespace_status() {
        let jobs = sample();
        let mut table = JobTable::default();
        table.apply_filter("team-b");
        assert_eq!(names(&table.render(&jobs)), vec!["eval-bert"]);
        table.apply_filter("failed");
        assert_eq!(names(&table.render(&jobs)), vec!["train-vit"]);
    }

    #[test]
    fn test_sorting() {
        let jobs = sample();
        let mut table = JobTable::default();
        table.set_sort(JobSortKey::CreateTime, SortDirection::Ascending);
        assert_eq!(
            names(&table.render(&jobs)),
            vec!["eval-bert", "serve-llama", "train-vit", "train-llama"]
        );
        table.set_sort(JobSortKey::Tasks, SortDirection::Descending);
        assert_eq!(
            names(&table.render(&jobs)),
            vec!["serve-llama", "train-llama", "train-vit", "eval-bert"]
        );
        table.set_sort(JobSortKey::Name, SortDirection::Ascending);
        assert_eq!(table.render(&jobs).rows[0].job.name, "eval-bert");
    }

    #[test]
    fn test_pagination_clamps_and_filter_resets_page() {
        let jobs: Vec<JobView> = (0..25)
            .map(|i| job(&i.to_string(), &format!("job-{i:02}"), "ns", "Pending", 0, 0))
            .collect();
        let mut table = JobTable::new(10);
        let page = table.render(&jobs);
        assert_eq!(page.page_count, 3);
        assert_eq!(page.rows.len(), 10);

        table.set_page(2);
        let page = table.render(&jobs);
        assert_eq!(page.page, 2);
        assert_eq!(page.rows.len(), 5);

        table.set_page(9);
        assert_eq!(table.render(&jobs).page, 2);

        table.apply_filter("job-1");
        let page = table.render(&jobs);
        assert_eq!(page.page, 0);
        assert_eq!(page.total_matching, 10);
    }

    #[test]
    fn test_status_seed_resets_page() {
        let jobs: Vec<JobView> = (0..25)
            .map(|i| job(&i.to_string(), &format!("job-{i:02}"), "ns", "Pending", 0, 0))
            .collect();
        let mut table = JobTable::new(10);
        table.set_page(2);
        assert_eq!(table.render(&jobs).page, 2);

        table.seed_status(Some("pending"));
        let page = table.render(&jobs);
        assert_eq!(page.page, 0);
        assert_eq!(page.total_matching, 25);
        assert_eq!(page.rows[0].job.name, "job-00");
    }

    #[test]
    fn test_empty_table_has_one_page() {
        let table = JobTable::new(0);
        assert_eq!(table.page_size(), 1);
        let page = table.render(&[]);
        assert_eq!(page.page_count, 1);
        assert_eq!(page.page, 0);
        assert!(page.rows.is_empty());
    }

    #[test]
    fn test_expand_row_and_chips() {
        let jobs = sample();
        let mut table = JobTable::default();
        assert!(table.toggle_expanded("3"));
        let page = table.render(&jobs);
        let expanded: Vec<&str> = page
            .rows
            .iter()
            .filter(|r| r.expanded)
            .map(|r| r.job.uid.as_str())
            .collect();
        assert_eq!(expanded, vec!["3"]);
        assert_eq!(page.rows[2].chip, "warn");
        assert_eq!(page.rows[1].chip, "accent");
        assert!(!table.toggle_expanded("3"));
        assert_eq!(table.expanded(), None);
    }

    #[test]
    fn test_status_chip_palette() {
        assert_eq!(status_chip("Running"), "primary");
        assert_eq!(status_chip("PENDING"), "accent");
        assert_eq!(status_chip("failed"), "warn");
        assert_eq!(status_chip("Completed"), "default");
        assert_eq!(status_chip("Unknown"), "default");
    }

    #[test]
    fn test_sort_key_parse() {
        assert_eq!(JobSortKey::parse("createTime"), Some(JobSortKey::CreateTime));
        assert_eq!(JobSortKey::parse("TASKS"), Some(JobSortKey::Tasks));
        assert_eq!(JobSortKey::parse("gpu"), None);
        assert_eq!(SortDirection::parse("desc"), Some(SortDirection::Descending));
        assert_eq!(SortDirection::parse("up"), None);
    }
}
