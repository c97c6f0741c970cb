//! Fatal error types raised while resolving the region or polling.

use std::path::PathBuf;

use cowin_api::TransportError;

/// Failure resolving the configured state or district.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// No state matches the configured name.
    #[error("state '{0}' not found")]
    StateNotFound(String),
    /// No district of the state matches the configured name.
    #[error("district '{name}' not found in state {state_id}")]
    DistrictNotFound {
        /// State the districts were listed for.
        state_id: u32,
        /// Configured district name.
        name: String,
    },
    /// The upstream call itself failed.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Failure that ends the polling loop.
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    /// Region resolution failed.
    #[error(transparent)]
    Lookup(#[from] LookupError),
    /// Fetching a window failed.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// The alert batch could not be serialized.
    #[error("failed to serialize alert batch")]
    Serialize(#[source] serde_json::Error),
    /// The alert batch could not be written.
    #[error("failed to write {}", path.display())]
    Output {
        /// Output file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
