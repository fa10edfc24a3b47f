use crate::pipeline::OmrParams;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Default, Deserialize)]
pub struct ScanOutputConfig {
    /// Full `ScanReport` as pretty JSON.
    pub json_out: Option<PathBuf>,
    /// Directory for `mask.png` and `rectified.png`.
    pub debug_dir: Option<PathBuf>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ScanConfig {
    pub input_path: PathBuf,
    /// Falls back to `params.defaultNumQuestions`.
    pub num_questions: Option<usize>,
    #[serde(default)]
    pub params: OmrParams,
    #[serde(default)]
    pub output: ScanOutputConfig,
}

impl ScanConfig {
    pub fn num_questions(&self) -> usize {
        self.num_questions
            .unwrap_or(self.params.default_num_questions)
    }
}

pub fn load_config(path: &Path) -> Result<ScanConfig, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    let config: ScanConfig = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_uses_defaults() {
        let config: ScanConfig = serde_json::from_str(r#"{"input_path":"photo.jpg"}"#).unwrap();
        assert_eq!(config.num_questions(), 20);
        assert!(config.output.json_out.is_none());
        assert_eq!(config.params, OmrParams::default());
    }
}
