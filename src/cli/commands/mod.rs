pub mod handler;

use chrono::{DateTime, Utc};
use clap::{Args, ValueEnum};

pub use handler::{handle_command, render_records};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Records as JSON (default)
    Json,
    /// One summary line per fetch
    Summary,
}

#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Output format
    #[arg(long, default_value = "json")]
    pub format: OutputFormat,

    /// Pretty print JSON output
    #[arg(short, long)]
    pub pretty: bool,
}

#[derive(Args, Debug, Clone)]
pub struct PagingArgs {
    /// Stop after the first page instead of following continuation tokens
    #[arg(long)]
    pub no_continue: bool,

    /// Stop after this many pages even if more are available
    #[arg(long, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    pub max_pages: Option<usize>,
}

#[derive(Args, Debug, Clone)]
pub struct ReportsArgs {
    /// Report type filter (repeatable)
    #[arg(long = "type", value_name = "REPORT_TYPE")]
    pub report_types: Vec<String>,

    /// Report request id filter (repeatable)
    #[arg(long = "request-id", value_name = "ID")]
    pub request_ids: Vec<String>,

    /// Page size, 1 to 100
    #[arg(long)]
    pub max_count: Option<u32>,

    /// Only acknowledged (true) or unacknowledged (false) reports
    #[arg(long)]
    pub acknowledged: Option<bool>,

    /// Earliest availability time (RFC 3339)
    #[arg(long)]
    pub from: Option<DateTime<Utc>>,

    /// Latest availability time (RFC 3339)
    #[arg(long)]
    pub to: Option<DateTime<Utc>>,

    #[command(flatten)]
    pub paging: PagingArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug, Clone)]
pub struct ReportCountArgs {
    #[arg(long = "type", value_name = "REPORT_TYPE")]
    pub report_types: Vec<String>,

    #[arg(long)]
    pub acknowledged: Option<bool>,

    #[arg(long)]
    pub from: Option<DateTime<Utc>>,

    #[arg(long)]
    pub to: Option<DateTime<Utc>>,
}

#[derive(Args, Debug, Clone)]
pub struct FeedsArgs {
    /// Feed submission id filter (repeatable)
    #[arg(long = "feed-id", value_name = "ID")]
    pub feed_ids: Vec<String>,

    /// Feed type filter (repeatable)
    #[arg(long = "type", value_name = "FEED_TYPE")]
    pub feed_types: Vec<String>,

    /// Processing status filter, e.g. _DONE_ (repeatable)
    #[arg(long = "status")]
    pub statuses: Vec<String>,

    #[arg(long)]
    pub max_count: Option<u32>,

    /// Earliest submission time (RFC 3339)
    #[arg(long)]
    pub from: Option<DateTime<Utc>>,

    /// Latest submission time (RFC 3339)
    #[arg(long)]
    pub to: Option<DateTime<Utc>>,

    #[command(flatten)]
    pub paging: PagingArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug, Clone)]
pub struct CancelFeedsArgs {
    /// Feed submission id to cancel (repeatable)
    #[arg(long = "feed-id", value_name = "ID")]
    pub feed_ids: Vec<String>,

    /// Feed type filter (repeatable)
    #[arg(long = "type", value_name = "FEED_TYPE")]
    pub feed_types: Vec<String>,

    /// Earliest submission time (RFC 3339)
    #[arg(long)]
    pub from: Option<DateTime<Utc>>,

    /// Latest submission time (RFC 3339)
    #[arg(long)]
    pub to: Option<DateTime<Utc>>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug, Clone)]
pub struct OrderItemsArgs {
    #[arg(long)]
    pub order_id: String,

    #[command(flatten)]
    pub paging: PagingArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug, Clone)]
pub struct ParticipationsArgs {
    #[command(flatten)]
    pub paging: PagingArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug, Clone)]
pub struct DestinationsArgs {
    /// Marketplace to list destinations for; defaults to the configured one
    #[arg(long)]
    pub marketplace_id: Option<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug, Clone)]
pub struct ProductsArgs {
    /// Search terms
    #[arg(long)]
    pub query: String,

    /// Product category to search in, e.g. Books
    #[arg(long)]
    pub context: Option<String>,

    /// Marketplace to search; defaults to the configured one
    #[arg(long)]
    pub marketplace_id: Option<String>,

    #[command(flatten)]
    pub output: OutputArgs,
}
