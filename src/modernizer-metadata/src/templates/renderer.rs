//! Template renderer.

use super::{TemplateError, SUMMARY_TEMPLATE};
use crate::reports::SummaryStats;
use chrono::{DateTime, Utc};
use handlebars::{no_escape, Handlebars};
use serde_json::{json, Value};

/// Creates a configured Handlebars registry.
///
/// The registry is configured with:
/// - No HTML escaping (for markdown output)
/// - Strict mode (catches missing variables)
#[must_use]
pub fn create_handlebars_registry() -> Handlebars<'static> {
    let mut hbs = Handlebars::new();

    // Disable HTML escaping for markdown output
    hbs.register_escape_fn(no_escape);

    // Enable strict mode to catch missing variables
    hbs.set_strict_mode(true);

    hbs
}

/// Renderer for the Markdown summary report.
pub struct TemplateRenderer {
    handlebars: Handlebars<'static>,
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer {
    /// Creates a new template renderer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlebars: create_handlebars_registry(),
        }
    }

    /// Renders the global summary report.
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails.
    pub fn render_summary(
        &self,
        stats: &SummaryStats,
        generated_at: DateTime<Utc>,
    ) -> Result<String, TemplateError> {
        let prs = &stats.pull_requests;
        let data = json!({
            "generated_at": generated_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            "total_migrations": stats.total_migrations,
            "failed_migrations": stats.failed_migrations,
            "success_rate": percent(stats.success_rate()),
            "failures_by_recipe": failures_section(stats),
            "failed_plugins": failed_plugins_section(stats),
            "pr_total": prs.total,
            "pr_open": prs.open,
            "pr_open_rate": percent(prs.rate(prs.open)),
            "pr_closed": prs.closed,
            "pr_closed_rate": percent(prs.rate(prs.closed)),
            "pr_merged": prs.merged,
            "pr_merged_rate": percent(prs.rate(prs.merged)),
        });

        self.render_template(SUMMARY_TEMPLATE, &data)
    }

    /// Renders a template with the given data.
    fn render_template(&self, template: &str, data: &Value) -> Result<String, TemplateError> {
        Ok(self.handlebars.render_template(template, data)?)
    }
}

fn percent(value: f64) -> String {
    format!("{value:.2}")
}

fn failures_section(stats: &SummaryStats) -> String {
    if stats.failures_by_recipe.is_empty() {
        return "No failures recorded.".to_string();
    }
    stats
        .failures_by_recipe
        .iter()
        .map(|(recipe, count)| format!("- {recipe}: {count} failures"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn failed_plugins_section(stats: &SummaryStats) -> String {
    if stats.failed_plugins.is_empty() {
        return "No plugins with failed migrations.".to_string();
    }
    stats
        .failed_plugins
        .iter()
        .map(|plugin| {
            format!(
                "- [{}](../{}/reports/failed_migrations.csv)",
                plugin.name, plugin.dir
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
