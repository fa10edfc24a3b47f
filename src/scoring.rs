//! Stage 5: bubble grid scoring on the rectified page.
//!
//! The page is re-binarized with Otsu and partitioned, without gaps, into
//! `num_questions × num_options` cells. A row's answer is the column with the
//! highest fill ratio when that ratio exceeds the fill threshold.

use crate::image::{BinaryMask, GrayImageU8};
use crate::preprocess::otsu_binary_inv;
use log::debug;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Rendering of an unmarked row.
pub const UNMARKED_SENTINEL: &str = "-";
/// Largest supported option count (letters `A..=Z`).
pub const MAX_OPTIONS: usize = 26;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScoringParams {
    /// Columns per row; canonical sheets use 5 (`A`–`E`).
    pub num_options: usize,
    /// A row is marked only when its best fill ratio is strictly above this.
    pub fill_threshold: f64,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            num_options: 5,
            fill_threshold: 0.4,
        }
    }
}

/// Decision for one question.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Answer {
    /// Zero-based option index.
    Marked(usize),
    Unmarked,
}

impl Answer {
    /// Letter for a marked option, `None` otherwise.
    pub fn letter(&self) -> Option<char> {
        match *self {
            Answer::Marked(idx) if idx < MAX_OPTIONS => Some((b'A' + idx as u8) as char),
            _ => None,
        }
    }

    pub fn is_marked(&self) -> bool {
        matches!(self, Answer::Marked(_))
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.letter() {
            Some(letter) => write!(f, "{letter}"),
            None => f.write_str(UNMARKED_SENTINEL),
        }
    }
}

impl Serialize for Answer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One answer per question, in question order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AnswerList(pub Vec<Answer>);

impl AnswerList {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Answer] {
        &self.0
    }

    /// Letters and sentinels, as sent back to the caller.
    pub fn to_strings(&self) -> Vec<String> {
        self.0.iter().map(Answer::to_string).collect()
    }
}

/// Answers together with the per-cell fill ratios (row-major).
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BubbleScores {
    pub answers: AnswerList,
    pub fill_ratios: Vec<Vec<f64>>,
    pub threshold: u8,
}

/// Half-open pixel bounds of cell `(row, col)`.
#[inline]
pub fn cell_bounds(
    width: usize,
    height: usize,
    rows: usize,
    cols: usize,
    row: usize,
    col: usize,
) -> (usize, usize, usize, usize) {
    let x0 = col * width / cols;
    let x1 = (col + 1) * width / cols;
    let y0 = row * height / rows;
    let y1 = (row + 1) * height / rows;
    (x0, y0, x1, y1)
}

/// Otsu re-threshold of the page followed by [`score_mask`].
pub fn score_page(page: &GrayImageU8, num_questions: usize, params: &ScoringParams) -> BubbleScores {
    let (mask, threshold) = otsu_binary_inv(page);
    let (answers, fill_ratios) = score_mask(&mask, num_questions, params);
    debug!(
        "score_page questions={} options={} otsu_threshold={} marked={}",
        num_questions,
        params.num_options,
        threshold,
        answers.0.iter().filter(|a| a.is_marked()).count()
    );
    BubbleScores {
        answers,
        fill_ratios,
        threshold,
    }
}

/// Score an already binarized page.
pub fn score_mask(
    mask: &BinaryMask,
    num_questions: usize,
    params: &ScoringParams,
) -> (AnswerList, Vec<Vec<f64>>) {
    if num_questions == 0 || params.num_options == 0 {
        return (AnswerList::default(), Vec::new());
    }
    let rows: Vec<usize> = (0..num_questions).collect();

    #[cfg(feature = "parallel")]
    let ratios: Vec<Vec<f64>> = rows
        .par_iter()
        .map(|&row| row_fill_ratios(mask, num_questions, params.num_options, row))
        .collect();
    #[cfg(not(feature = "parallel"))]
    let ratios: Vec<Vec<f64>> = rows
        .iter()
        .map(|&row| row_fill_ratios(mask, num_questions, params.num_options, row))
        .collect();

    let answers = ratios
        .iter()
        .map(|row| decide(row, params.fill_threshold))
        .collect();
    (AnswerList(answers), ratios)
}

fn row_fill_ratios(mask: &BinaryMask, rows: usize, cols: usize, row: usize) -> Vec<f64> {
    (0..cols)
        .map(|col| {
            let (x0, y0, x1, y1) = cell_bounds(mask.width(), mask.height(), rows, cols, row, col);
            let area = (x1 - x0) * (y1 - y0);
            if area == 0 {
                0.0
            } else {
                mask.count_on(x0, y0, x1, y1) as f64 / area as f64
            }
        })
        .collect()
}

/// Pick the best column; ties keep the leftmost.
fn decide(ratios: &[f64], fill_threshold: f64) -> Answer {
    let mut best: Option<(usize, f64)> = None;
    for (idx, &ratio) in ratios.iter().enumerate() {
        if best.map_or(true, |(_, r)| ratio > r) {
            best = Some((idx, ratio));
        }
    }
    match best {
        Some((idx, ratio)) if ratio > fill_threshold => Answer::Marked(idx),
        _ => Answer::Unmarked,
    }
}
