//! Wire shapes exchanged with the capture side.
//!
//! Requests arrive as camelCase JSON. Results go back as a tagged message,
//! `{"type":"SUCCESS","payload":["A","-",...]}` or
//! `{"type":"ERROR","payload":"reason"}`.

use crate::image::EncodedImage;
use crate::scoring::AnswerList;
use serde::{Deserialize, Serialize};

/// One scan job.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRequest {
    pub image_data_url: String,
    /// Objective questions of the exam being graded; the pipeline default
    /// applies when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub num_questions: Option<usize>,
}

impl ScanRequest {
    pub fn new(image_data_url: impl Into<String>, num_questions: usize) -> Self {
        Self {
            image_data_url: image_data_url.into(),
            num_questions: Some(num_questions),
        }
    }

    pub fn encoded_image(&self) -> EncodedImage {
        EncodedImage::DataUrl(self.image_data_url.clone())
    }
}

/// Result of one scan. Failures carry only the display text of the error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScanOutcome {
    Success(AnswerList),
    Failure { reason: String },
}

impl ScanOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ScanOutcome::Success(_))
    }

    pub fn to_message(&self) -> ScanMessage {
        match self {
            ScanOutcome::Success(answers) => ScanMessage::Success(answers.to_strings()),
            ScanOutcome::Failure { reason } => ScanMessage::Error(reason.clone()),
        }
    }
}

impl<E: std::fmt::Display> From<Result<AnswerList, E>> for ScanOutcome {
    fn from(result: Result<AnswerList, E>) -> Self {
        match result {
            Ok(answers) => ScanOutcome::Success(answers),
            Err(err) => ScanOutcome::Failure {
                reason: err.to_string(),
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScanMessage {
    Success(Vec<String>),
    Error(String),
}

impl ScanMessage {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
