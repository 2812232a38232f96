//! Chart labelling configuration.

use serde::{Deserialize, Serialize};

/// Chart configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Underlying label used in titles and the spot annotation.
    #[serde(default = "default_underlying_label")]
    pub underlying_label: String,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            underlying_label: default_underlying_label(),
        }
    }
}

fn default_underlying_label() -> String {
    "SPX".to_string()
}
