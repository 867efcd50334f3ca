//! Markdown rendering using Handlebars.
//!
//! The summary report is a fixed template; list sections are pre-rendered to
//! Markdown so the template itself only substitutes values.

mod error;
mod renderer;

pub use error::TemplateError;
pub use renderer::{create_handlebars_registry, TemplateRenderer};

/// Template of `reports/summary.md`.
pub const SUMMARY_TEMPLATE: &str = r#"# Jenkins Plugin Modernizer Report
Generated on: {{generated_at}}

## Overview
- **Total Migrations**: {{total_migrations}}
- **Failed Migrations**: {{failed_migrations}}
- **Success Rate**: {{success_rate}}%

## Failures by Recipe
{{failures_by_recipe}}

## Plugins with Failed Migrations
{{failed_plugins}}

## Pull Request Statistics

| Status | Count | Percentage |
|--------|-------|------------|
| Total PRs | {{pr_total}} | - |
| Open PRs | {{pr_open}} | {{pr_open_rate}}% |
| Closed PRs | {{pr_closed}} | {{pr_closed_rate}}% |
| Merged PRs | {{pr_merged}} | {{pr_merged_rate}}% |

*Note: No. of Migrations != No. of PRs. A migration applied may trigger force push on already opened PR.*
"#;
