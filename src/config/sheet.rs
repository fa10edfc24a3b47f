use crate::layout::SheetLayout;
use crate::types::Point2D;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Perspective applied to the rendered sheet to imitate a photograph.
#[derive(Clone, Debug, Deserialize)]
pub struct PhotoConfig {
    pub width: usize,
    pub height: usize,
    /// Where the page corners land, `[tl, tr, br, bl]` as `[x, y]`.
    pub corners: [[f64; 2]; 4],
    #[serde(default = "default_background")]
    pub background: u8,
}

fn default_background() -> u8 {
    230
}

impl PhotoConfig {
    pub fn corner_points(&self) -> [Point2D; 4] {
        self.corners.map(|[x, y]| Point2D::new(x, y))
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct SheetConfig {
    pub output_path: PathBuf,
    pub num_questions: usize,
    /// One entry per question: an option letter, or `-` for no mark.
    #[serde(default)]
    pub answers: Vec<String>,
    #[serde(default)]
    pub layout: SheetLayout,
    pub photo: Option<PhotoConfig>,
    /// Also write a `ScanRequest` JSON carrying the image as a data URL.
    pub request_out: Option<PathBuf>,
}

impl SheetConfig {
    /// Parse `answers` into option indices.
    pub fn marks(&self) -> Result<Vec<Option<usize>>, String> {
        self.answers
            .iter()
            .enumerate()
            .map(|(i, answer)| {
                parse_mark(answer, self.layout.num_options)
                    .map_err(|e| format!("answer {}: {e}", i + 1))
            })
            .collect()
    }
}

fn parse_mark(answer: &str, num_options: usize) -> Result<Option<usize>, String> {
    let answer = answer.trim();
    if answer.is_empty() || answer == crate::scoring::UNMARKED_SENTINEL {
        return Ok(None);
    }
    let mut chars = answer.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => {
            let idx = (c.to_ascii_uppercase() as u8 - b'A') as usize;
            if idx < num_options {
                Ok(Some(idx))
            } else {
                Err(format!("'{answer}' is beyond the {num_options} options"))
            }
        }
        _ => Err(format!("'{answer}' is not an option letter")),
    }
}

pub fn load_config(path: &Path) -> Result<SheetConfig, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    let config: SheetConfig = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))?;
    Ok(config)
}
