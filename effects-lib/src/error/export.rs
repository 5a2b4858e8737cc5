//! Export error types

/// Errors raised while building or formatting an export.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The requested format is not one of `json`, `csv` or `xlsx`.
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    /// No format was selected.
    #[error("No export format selected")]
    NoFormat,

    /// The format cannot be produced offline.
    #[error("{0} export is only available from the server")]
    ServerOnly(&'static str),

    /// Writing the JSON document failed.
    #[error("Failed to serialize export: {0}")]
    Serialize(#[from] serde_json::Error),
}
