use super::stages::{AnchorStage, InputDescriptor, PreprocessStage, RectifyStage, ScoringStage};
use super::timing::TimingBreakdown;
use crate::scoring::{Answer, AnswerList};
use serde::Serialize;

/// Result produced by [`OmrPipeline::process_with_diagnostics`](crate::OmrPipeline).
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub answers: AnswerList,
    pub trace: PipelineTrace,
}

/// What every stage of one successful scan saw and decided.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineTrace {
    pub input: InputDescriptor,
    pub timings: TimingBreakdown,
    pub preprocess: PreprocessStage,
    pub anchors: AnchorStage,
    pub rectify: RectifyStage,
    pub scoring: ScoringStage,
}

impl ScanReport {
    /// One line per question: number, answer and the row's best fill ratio.
    pub fn answer_lines(&self) -> Vec<String> {
        self.answers
            .as_slice()
            .iter()
            .zip(&self.trace.scoring.fill_ratios)
            .enumerate()
            .map(|(i, (answer, ratios))| {
                let best = match answer {
                    Answer::Marked(idx) => ratios.get(*idx).copied().unwrap_or(0.0),
                    Answer::Unmarked => ratios.iter().copied().fold(0.0, f64::max),
                };
                format!("{:>3}: {} ({:.2})", i + 1, answer, best)
            })
            .collect()
    }
}
