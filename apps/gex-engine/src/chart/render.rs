//! Chart rendering boundary.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::spec::ChartSpec;

/// Chart rendering errors.
#[derive(Debug, Error)]
pub enum ChartError {
    /// Failed to write the rendered output.
    #[error("Failed to write charts to '{path}': {source}")]
    Io {
        /// Output path.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to serialize the chart descriptions.
    #[error("Failed to serialize charts: {0}")]
    Json(#[from] serde_json::Error),
}

/// Something that can draw chart specifications.
pub trait ChartRenderer {
    /// Render every chart.
    fn render(&self, charts: &[ChartSpec]) -> Result<(), ChartError>;
}

/// Writes chart specifications as pretty-printed JSON for an external
/// plotting front end.
#[derive(Debug, Clone)]
pub struct JsonChartRenderer {
    path: PathBuf,
}

impl JsonChartRenderer {
    /// Renderer writing to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Output path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> ChartError {
        ChartError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl ChartRenderer for JsonChartRenderer {
    fn render(&self, charts: &[ChartSpec]) -> Result<(), ChartError> {
        let file = File::create(&self.path).map_err(|e| self.io_error(e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, charts)?;
        writer.flush().map_err(|e| self.io_error(e))?;

        tracing::info!(path = %self.path.display(), charts = charts.len(), "Wrote chart specifications");
        Ok(())
    }
}
