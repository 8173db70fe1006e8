use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Tunable processing options suitable for config files and GUI presets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingOptions {
    /// Segments per quarter circle when buffering geometries
    pub buffer_segments: u32,
    /// Number of value/color entries in the raster legend
    pub legend_ticks: usize,
}

impl Default for ProcessingOptions {
    fn default() -> Self {
        Self {
            buffer_segments: 30,
            legend_ticks: 5,
        }
    }
}

impl ProcessingOptions {
    /// Load options from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        serde_json::from_reader(file).map_err(|e| Error::InvalidParameter {
            param: "options",
            value: e.to_string(),
        })
    }
}
