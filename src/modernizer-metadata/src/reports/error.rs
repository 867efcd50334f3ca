//! Report generation error types.

use crate::store::StoreError;
use crate::templates::TemplateError;
use thiserror::Error;

/// Errors that can occur while writing derived reports.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Failed to serialize a JSON report.
    #[error("Failed to serialize '{path}': {source}")]
    JsonError {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// Failed to write a report file.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Failed to render the Markdown summary.
    #[error(transparent)]
    Template(#[from] TemplateError),
}
