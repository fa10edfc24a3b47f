#![doc = include_str!("../README.md")]

// Pipeline surface
pub mod anchors;
pub mod contours;
pub mod diagnostics;
pub mod error;
pub mod homography;
pub mod image;
pub mod layout;
pub mod messages;
pub mod pipeline;
pub mod preprocess;
pub mod rectify;
pub mod scoring;
pub mod types;
pub mod worker;

// Runtime configs for the bundled tools.
pub mod config;

// --- High-level re-exports -------------------------------------------------

pub use crate::error::{OmrError, WorkerError};
pub use crate::image::{EncodedImage, GrayImageU8, RasterImage, RgbaImageU8};
pub use crate::pipeline::{CancelToken, OmrParams, OmrPipeline};
pub use crate::scoring::{Answer, AnswerList};
pub use crate::worker::{JobHandle, OmrWorker};

pub use crate::diagnostics::{PipelineTrace, ScanReport};
pub use crate::messages::{ScanMessage, ScanOutcome, ScanRequest};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use omr_reader::prelude::*;
///
/// # fn main() -> Result<(), OmrError> {
/// let layout = SheetLayout::default();
/// let sheet = layout.render_sheet(&[Some(2), None], 2);
///
/// let pipeline = OmrPipeline::new(OmrParams::default())?;
/// let answers = pipeline.process(&sheet.into(), 2)?;
/// println!("{:?}", answers.to_strings());
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::layout::SheetLayout;
    pub use crate::{
        Answer, AnswerList, GrayImageU8, OmrError, OmrParams, OmrPipeline, RasterImage,
    };
}

// --- Stage-level API (for tools & advanced users) --------------------------

pub mod stages {
    pub use crate::anchors::{detect_anchors, filter_candidates, select_anchors, AnchorParams};
    pub use crate::contours::find_external_contours;
    pub use crate::preprocess::{preprocess, Preprocessed};
    pub use crate::rectify::{compute_transform, rectify, RectifiedPage, RectifyParams};
    pub use crate::scoring::{score_mask, score_page, BubbleScores, ScoringParams};

    pub use crate::diagnostics::{
        AnchorDescriptor, AnchorStage, InputDescriptor, PreprocessStage, RectifyStage,
        ScoringStage, StageTiming, TimingBreakdown,
    };
}
