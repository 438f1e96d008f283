use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::types::Metric;

/// Engine configuration: the embedding model's output dimensionality, the
/// comparison metric, and the match threshold calibrated for that metric.
///
/// Defaults follow the FaceNet deployment this engine grew out of: 512-dim
/// embeddings under cosine similarity, where good matches land around
/// 0.75-0.90. For Euclidean setups, thresholds around 1.0-1.1 are a
/// reasonable starting point.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EngineConfig {
    pub dimension: usize,
    pub metric: Metric,
    pub threshold: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dimension: 512,
            metric: Metric::Cosine,
            threshold: 0.75,
        }
    }
}

/// Loads a TOML config, falling back to defaults when the file is absent.
pub fn load_config(path: &Path) -> Result<EngineConfig> {
    if !path.exists() {
        return Ok(EngineConfig::default());
    }
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading config at {}", path.display()))?;
    toml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
}

pub fn save_config(cfg: &EngineConfig, path: &Path) -> Result<()> {
    let data = toml::to_string_pretty(cfg)?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, data)?;
    Ok(())
}
