//! Error taxonomy of the recognition pipeline and its worker.

use thiserror::Error;

/// Failure of one pipeline run. The display text is what the caller shows
/// to the user.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OmrError {
    #[error("input image is empty")]
    EmptyImage,

    #[error("failed to decode image: {0}")]
    Decode(String),

    #[error("could not find 4 anchors (found {found}); please retake the picture")]
    AnchorDetection { found: usize },

    #[error("anchors do not form a usable quadrilateral (area {area:.1}px²); please retake the picture")]
    DegenerateAnchors { area: f64 },

    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    #[error("processing was cancelled")]
    Cancelled,
}

impl OmrError {
    /// Errors the user can fix by taking another photograph.
    pub fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            OmrError::AnchorDetection { .. } | OmrError::DegenerateAnchors { .. }
        )
    }
}

/// Failure of the worker plumbing itself, as opposed to a failed scan.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WorkerError {
    #[error("recognition engine failed to initialise: {0}")]
    Init(String),

    #[error("recognition engine is not ready yet")]
    NotReady,

    #[error("a scan is already in progress")]
    Busy,

    #[error("timed out waiting for the worker")]
    Timeout,

    #[error("worker thread is no longer running")]
    Disconnected,
}

pub type Result<T> = std::result::Result<T, OmrError>;
