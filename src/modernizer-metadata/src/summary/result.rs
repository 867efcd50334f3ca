//! Per-record outcome of a metadata refresh.

/// Result of refreshing a single metadata file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// The record changed and was rewritten.
    Updated {
        /// Path of the metadata file.
        path: String,
    },

    /// Remote state matched the stored record; nothing was written.
    Unchanged {
        /// Path of the metadata file.
        path: String,
    },

    /// The record cannot be refreshed (e.g. no pull request).
    Skipped {
        /// Path of the metadata file.
        path: String,
        /// Reason for skipping.
        reason: String,
    },

    /// Reading, looking up or writing the record failed.
    Failed {
        /// Path of the metadata file.
        path: String,
        /// Error message.
        error: String,
    },
}
