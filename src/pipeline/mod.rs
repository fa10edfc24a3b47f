//! Pipeline orchestrator.
//!
//! [`OmrPipeline`] chains the five stages over one photograph:
//! - preprocess: grayscale, blur, Otsu inverse threshold;
//! - contours: external borders of the foreground mask;
//! - anchors: four square fiducials, ranked by area;
//! - rectify: corner ordering, quadrilateral check, homography, warp;
//! - scoring: Otsu re-threshold and fill ratio per bubble cell.
//!
//! Any stage error aborts the run; [`OmrPipeline::run`] folds it into a
//! [`ScanOutcome`](crate::messages::ScanOutcome) carrying the error text. A
//! [`CancelToken`] is checked between stages.

mod cancel;
pub mod params;
mod scan;

pub use cancel::CancelToken;
pub use params::OmrParams;
pub use scan::OmrPipeline;
