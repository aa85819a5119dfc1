use std::path::PathBuf;

use hubble_bindgen::BindgenError;

/// Error types for the hubble-abigen command
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Binding generation failed
    #[error(transparent)]
    Bindgen(#[from] BindgenError),

    /// Failed to create the log file
    #[error("Failed to create log file '{}': {source}", .path.display())]
    LogFile {
        /// Requested log file
        path: PathBuf,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// Failed to serialize command output
    #[error("Failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for the hubble-abigen command
pub type Result<T> = std::result::Result<T, CliError>;
