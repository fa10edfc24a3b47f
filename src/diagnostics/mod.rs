//! Serializable trace of a scan.
//!
//! [`ScanReport`] is returned by the pipeline's diagnostic entry point and
//! carries the answers plus a [`PipelineTrace`] with one record per stage and
//! a timing breakdown. All structs serialize with camelCase field names.

pub mod pipeline;
pub mod stages;
pub mod timing;

pub use pipeline::{PipelineTrace, ScanReport};
pub use stages::{
    AnchorDescriptor, AnchorStage, InputDescriptor, PreprocessStage, RectifyStage, ScoringStage,
};
pub use timing::{elapsed_ms, StageTiming, TimingBreakdown};
