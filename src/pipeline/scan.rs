use super::cancel::CancelToken;
use super::params::OmrParams;
use crate::anchors::{filter_candidates, select_anchors};
use crate::contours::find_external_contours;
use crate::diagnostics::{
    AnchorDescriptor, AnchorStage, InputDescriptor, PipelineTrace, PreprocessStage, RectifyStage,
    ScanReport, ScoringStage, TimingBreakdown,
};
use crate::error::OmrError;
use crate::image::{EncodedImage, RasterImage};
use crate::messages::{ScanOutcome, ScanRequest};
use crate::preprocess::{preprocess, Preprocessed};
use crate::rectify::{compute_transform, rectify_with_transform, PageTransform};
use crate::scoring::{score_page, AnswerList, BubbleScores};
use log::{debug, info, warn};
use std::time::Instant;

/// Answer-sheet reader running preprocess → contours → anchors → rectify →
/// score on one photograph at a time.
///
/// The pipeline holds only validated parameters and is safe to share between
/// threads. Every intermediate buffer is a local of a single run and is
/// dropped on every exit path.
#[derive(Clone, Debug)]
pub struct OmrPipeline {
    params: OmrParams,
}

impl OmrPipeline {
    /// Validate `params` and build the pipeline.
    pub fn new(params: OmrParams) -> Result<Self, OmrError> {
        params.validate()?;
        debug!(
            "OmrPipeline::new page={}x{} options={} default_questions={}",
            params.rectify.width,
            params.rectify.height,
            params.scoring.num_options,
            params.default_num_questions
        );
        Ok(Self { params })
    }

    pub fn params(&self) -> &OmrParams {
        &self.params
    }

    /// Scan a decoded photograph.
    pub fn process(&self, image: &RasterImage, num_questions: usize) -> Result<AnswerList, OmrError> {
        self.process_with_diagnostics(image, num_questions)
            .map(|report| report.answers)
    }

    /// Scan and keep the per-stage trace.
    pub fn process_with_diagnostics(
        &self,
        image: &RasterImage,
        num_questions: usize,
    ) -> Result<ScanReport, OmrError> {
        self.process_cancellable(image, num_questions, &CancelToken::new())
    }

    /// Decode `encoded` first, then scan it.
    pub fn process_encoded(
        &self,
        encoded: &EncodedImage,
        num_questions: usize,
    ) -> Result<AnswerList, OmrError> {
        let image = encoded.decode()?;
        self.process(&image, num_questions)
    }

    /// Handle a request end to end and fold any failure into the outcome.
    pub fn run(&self, request: &ScanRequest) -> ScanOutcome {
        self.run_cancellable(request, &CancelToken::new())
    }

    pub fn run_cancellable(&self, request: &ScanRequest, cancel: &CancelToken) -> ScanOutcome {
        let num_questions = request
            .num_questions
            .unwrap_or(self.params.default_num_questions);
        let result = request
            .encoded_image()
            .decode()
            .and_then(|image| self.process_cancellable(&image, num_questions, cancel))
            .map(|report| report.answers);
        ScanOutcome::from(result)
    }

    /// Full run with a cancellation check before every stage.
    pub fn process_cancellable(
        &self,
        image: &RasterImage,
        num_questions: usize,
        cancel: &CancelToken,
    ) -> Result<ScanReport, OmrError> {
        let result = self.execute(image, num_questions, cancel);
        match &result {
            Ok(report) => info!(
                "scan ok questions={} marked={} total_ms={:.2}",
                report.answers.len(),
                report.answers.as_slice().iter().filter(|a| a.is_marked()).count(),
                report.trace.timings.total_ms
            ),
            Err(err) if err.is_user_correctable() => warn!("scan rejected: {err}"),
            Err(err) => info!("scan failed: {err}"),
        }
        result
    }

    fn execute(
        &self,
        image: &RasterImage,
        num_questions: usize,
        cancel: &CancelToken,
    ) -> Result<ScanReport, OmrError> {
        if num_questions == 0 {
            return Err(OmrError::InvalidParams(
                "numQuestions must be positive".to_string(),
            ));
        }
        let total_start = Instant::now();
        let mut timings = TimingBreakdown::default();
        let input = InputDescriptor::of(image);

        cancel.check()?;
        let stage = Instant::now();
        let Preprocessed {
            gray,
            mask,
            threshold,
        } = preprocess(image)?;
        let preprocess_stage = PreprocessStage {
            threshold,
            foreground_pixels: mask.count_on(0, 0, mask.width(), mask.height()),
        };
        timings.record("preprocess", stage);

        cancel.check()?;
        let stage = Instant::now();
        let contours = find_external_contours(&mask);
        drop(mask);
        let contour_count = contours.len();
        debug!("contours external={contour_count}");
        timings.record("contours", stage);

        cancel.check()?;
        let stage = Instant::now();
        let candidates = filter_candidates(contours, &self.params.anchors);
        let anchor_stage = AnchorStage {
            contours: contour_count,
            thresholds: self.params.anchors.clone(),
            candidates: candidates.iter().map(AnchorDescriptor::from).collect(),
        };
        debug!("anchors candidates={}", candidates.len());
        let anchors = select_anchors(candidates)?;
        timings.record("anchors", stage);

        cancel.check()?;
        let stage = Instant::now();
        let PageTransform {
            corners,
            quad_area,
            transform,
        } = compute_transform(&anchors, &self.params.rectify)?;
        drop(anchors);
        let page = rectify_with_transform(&gray, &transform, &self.params.rectify)?;
        drop(gray);
        let rectify_stage = RectifyStage {
            corners,
            quad_area,
            transform,
            width: page.width(),
            height: page.height(),
        };
        timings.record("rectify", stage);

        cancel.check()?;
        let stage = Instant::now();
        let BubbleScores {
            answers,
            fill_ratios,
            threshold: page_threshold,
        } = score_page(&page, num_questions, &self.params.scoring);
        timings.record("scoring", stage);

        timings.total_ms = crate::diagnostics::elapsed_ms(total_start);
        Ok(ScanReport {
            answers,
            trace: PipelineTrace {
                input,
                timings,
                preprocess: preprocess_stage,
                anchors: anchor_stage,
                rectify: rectify_stage,
                scoring: ScoringStage {
                    threshold: page_threshold,
                    fill_threshold: self.params.scoring.fill_threshold,
                    fill_ratios,
                },
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::GrayImageU8;
    use crate::layout::SheetLayout;
    use crate::scoring::Answer;

    fn pipeline() -> OmrPipeline {
        OmrPipeline::new(OmrParams::default()).expect("default params")
    }

    #[test]
    fn rejects_invalid_params() {
        let mut params = OmrParams::default();
        params.rectify.width = 0;
        assert!(matches!(
            OmrPipeline::new(params),
            Err(OmrError::InvalidParams(_))
        ));
    }

    #[test]
    fn blank_page_fails_with_zero_anchors() {
        let page = GrayImageU8::filled(120, 90, 255);
        let err = pipeline().process(&page.into(), 20).unwrap_err();
        assert_eq!(err, OmrError::AnchorDetection { found: 0 });
    }

    #[test]
    fn cancelled_token_stops_before_first_stage() {
        let sheet = SheetLayout::default().render_blank();
        let cancel = CancelToken::new();
        cancel.cancel();
        let err = pipeline()
            .process_cancellable(&sheet.into(), 20, &cancel)
            .unwrap_err();
        assert_eq!(err, OmrError::Cancelled);
    }

    #[test]
    fn trace_records_every_stage() {
        let layout = SheetLayout::default();
        let sheet = layout.render_sheet(&[Some(1)], 10);
        let report = pipeline()
            .process_with_diagnostics(&sheet.into(), 10)
            .expect("scan");
        assert_eq!(report.answers.as_slice()[0], Answer::Marked(1));
        let labels: Vec<&str> = report
            .trace
            .timings
            .stages
            .iter()
            .map(|s| s.label.as_str())
            .collect();
        assert_eq!(labels, ["preprocess", "contours", "anchors", "rectify", "scoring"]);
        assert_eq!(report.trace.anchors.candidates.len(), 4);
        assert_eq!(report.trace.scoring.fill_ratios.len(), 10);
        let json = serde_json::to_value(&report).expect("serialize");
        assert!(json["trace"]["rectify"]["quadArea"].as_f64().is_some());
    }

    #[test]
    fn zero_questions_is_invalid() {
        let sheet = SheetLayout::default().render_blank();
        assert!(matches!(
            pipeline().process(&sheet.into(), 0),
            Err(OmrError::InvalidParams(_))
        ));
    }
}
