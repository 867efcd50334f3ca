#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod aggregate;
pub mod enrich;
pub mod rate_limit;
pub mod record;
pub mod reports;
pub mod runner;
pub mod store;
pub mod summary;
pub mod templates;

pub use aggregate::{aggregate_plugin, write_aggregates, AggregatedPlugin};
pub use enrich::{
    refresh, refresh_file, update_store, EnrichError, GitHubApi, HostingApi, PullRequestRef,
};
pub use rate_limit::{
    check_core_rate_limit, ensure_core_rate_limit, wait_if_needed, RateLimitInfo,
};
pub use record::{CheckRuns, CheckRunsSummary, MigrationRecord, MigrationStatus, PullRequestStatus};
pub use reports::{
    compute_summary, generate_reports, rollup_recipes, ReportError, RecipeRollup, SummaryStats,
};
pub use runner::{Runner, RunnerConfig, RunnerError};
pub use store::{scan_records, RecordScan, ScannedRecord, StoreError};
pub use summary::{RecordOutcome, RunSummary};
pub use templates::{create_handlebars_registry, TemplateError, TemplateRenderer};
