use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "kaiviz")]
#[command(author, version, about = "Terminal console for the KAI Scheduler visualizer API", long_about = None)]
pub struct Args {
    /// Visualizer API base URL
    #[arg(
        long,
        env = "KAIVIZ_API_URL",
        default_value = kaiviz_console::DEFAULT_API_URL
    )]
    pub api_url: String,

    /// Refresh interval in milliseconds
    #[arg(long, env = "KAIVIZ_REFRESH_MS", default_value_t = 5000)]
    pub interval_ms: u64,

    /// Namespace to list jobs from (empty = all namespaces)
    #[arg(long, env = "KAIVIZ_NAMESPACE", default_value = "")]
    pub namespace: String,

    /// Initial view, e.g. /dashboard, /jobs?status=Running, /nodes, /queues
    #[arg(long, default_value = "/dashboard")]
    pub view: String,

    /// Rows per page in the jobs table
    #[arg(long, default_value_t = 10)]
    pub page_size: usize,

    /// How long an error banner stays up, in milliseconds
    #[arg(long, default_value_t = 15_000)]
    pub error_clear_ms: u64,

    #[arg(long, default_value_t = 5)]
    pub connect_timeout_secs: u64,

    #[arg(long, default_value_t = 30)]
    pub request_timeout_secs: u64,

    /// Render the first refresh of the initial view and exit
    #[arg(long)]
    pub once: bool,

    /// OTLP endpoint for exporting traces
    #[arg(long, env = "KAIVIZ_OTLP_URL")]
    pub otlp_url: Option<String>,

    /// Bearer token for the OTLP endpoint
    #[arg(long, env = "KAIVIZ_OTLP_TOKEN")]
    pub otlp_token: Option<String>,

    /// "text" or "json"
    #[arg(long, env = "KAIVIZ_LOG_FORMAT", default_value = "text")]
    pub log_format: String,
}
