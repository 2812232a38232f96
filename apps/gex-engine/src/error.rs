//! Top-level error for the snapshot-to-charts pipeline.

use thiserror::Error;

use crate::chart::ChartError;
use crate::config::ConfigError;
use crate::exposure::ExposureError;
use crate::snapshot::SnapshotError;

/// Any failure while turning a snapshot file into a report and charts.
#[derive(Debug, Error)]
pub enum GexError {
    /// The snapshot file could not be read.
    #[error("Failed to read snapshot '{path}': {source}")]
    Io {
        /// Snapshot path.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// The snapshot is malformed.
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    /// The configuration is unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Exposure could not be computed.
    #[error(transparent)]
    Exposure(#[from] ExposureError),

    /// Charts could not be rendered.
    #[error(transparent)]
    Chart(#[from] ChartError),
}

impl GexError {
    /// Stable, lowercase name of the failing stage.
    #[must_use]
    pub const fn stage(&self) -> &'static str {
        match self {
            Self::Io { .. } => "read",
            Self::Snapshot(_) => "parse",
            Self::Config(_) => "config",
            Self::Exposure(_) => "compute",
            Self::Chart(_) => "render",
        }
    }
}
