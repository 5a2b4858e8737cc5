//! Error types

mod export;
mod fetch;
mod settings;

pub use export::*;
pub use fetch::*;
pub use settings::*;

/// Top-level error for the effects library.
///
/// Every fallible boundary has its own error type. Callers that do not care
/// which boundary failed can use this aggregate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Loading the record list failed.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Reading or writing a persisted preference failed.
    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// Building or rendering an export failed.
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Writing an export file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
