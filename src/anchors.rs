//! Stage 3: pick the four fiducial squares out of the contour set.
//!
//! A contour qualifies when its area exceeds `min_area`, its polygon
//! approximation is a quadrilateral and its bounding box is near-square.
//! Survivors are ranked by area (largest first, stable) and the top four
//! become the [`AnchorSet`]. Contours that are not selected are dropped when
//! the detector returns.
use crate::contours::Contour;
use crate::error::OmrError;
use crate::types::{BoundingRect, Point2D};
use serde::{Deserialize, Serialize};

/// Number of fiducial marks printed on the sheet.
pub const ANCHOR_COUNT: usize = 4;

/// Shape filters applied to every contour.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnchorParams {
    /// Minimum contour area in pixel² (exclusive).
    pub min_area: f64,
    /// Douglas–Peucker tolerance as a fraction of the contour perimeter.
    pub epsilon_fraction: f64,
    /// Inclusive lower bound of `width / height`.
    pub min_aspect: f64,
    /// Inclusive upper bound of `width / height`.
    pub max_aspect: f64,
}

impl Default for AnchorParams {
    fn default() -> Self {
        Self {
            min_area: 400.0,
            epsilon_fraction: 0.04,
            min_aspect: 0.9,
            max_aspect: 1.1,
        }
    }
}

/// A contour that passed the anchor filters.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AnchorCandidate {
    #[serde(skip)]
    pub contour: Contour,
    pub rect: BoundingRect,
    pub area: f64,
    pub vertices: usize,
}

impl AnchorCandidate {
    pub fn center(&self) -> Point2D {
        self.rect.center()
    }
}

/// Exactly four validated anchors, ranked by area descending.
#[derive(Clone, Debug, PartialEq)]
pub struct AnchorSet {
    anchors: [AnchorCandidate; ANCHOR_COUNT],
}

impl AnchorSet {
    pub fn anchors(&self) -> &[AnchorCandidate; ANCHOR_COUNT] {
        &self.anchors
    }

    pub fn centers(&self) -> [Point2D; ANCHOR_COUNT] {
        [
            self.anchors[0].center(),
            self.anchors[1].center(),
            self.anchors[2].center(),
            self.anchors[3].center(),
        ]
    }
}

/// Apply the shape filters, returning survivors sorted by area descending.
pub fn filter_candidates(contours: Vec<Contour>, params: &AnchorParams) -> Vec<AnchorCandidate> {
    let mut candidates: Vec<AnchorCandidate> = contours
        .into_iter()
        .filter_map(|contour| {
            let area = contour.area();
            if area <= params.min_area {
                return None;
            }
            let vertices = contour.approx_polygon(params.epsilon_fraction).len();
            if vertices != 4 {
                return None;
            }
            let rect = contour.bounding_rect();
            let aspect = rect.aspect_ratio();
            if aspect < params.min_aspect || aspect > params.max_aspect {
                return None;
            }
            Some(AnchorCandidate {
                contour,
                rect,
                area,
                vertices,
            })
        })
        .collect();
    candidates.sort_by(|a, b| b.area.total_cmp(&a.area));
    candidates
}

/// Select the four largest qualifying contours.
///
/// Fails with [`OmrError::AnchorDetection`] carrying the number of
/// survivors when fewer than four qualify.
pub fn detect_anchors(contours: Vec<Contour>, params: &AnchorParams) -> Result<AnchorSet, OmrError> {
    select_anchors(filter_candidates(contours, params))
}

/// Take the top four of an already ranked candidate list.
pub fn select_anchors(mut candidates: Vec<AnchorCandidate>) -> Result<AnchorSet, OmrError> {
    let found = candidates.len();
    if found < ANCHOR_COUNT {
        return Err(OmrError::AnchorDetection { found });
    }
    candidates.truncate(ANCHOR_COUNT);
    let anchors: [AnchorCandidate; ANCHOR_COUNT] = candidates
        .try_into()
        .map_err(|_| OmrError::AnchorDetection { found })?;
    Ok(AnchorSet { anchors })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contours::find_external_contours;
    use crate::image::GrayImageU8;
    use crate::preprocess::threshold_binary_inv;

    fn contours_of(gray: &GrayImageU8) -> Vec<Contour> {
        find_external_contours(&threshold_binary_inv(gray, 127))
    }

    #[test]
    fn ranks_four_squares_by_area() {
        let mut gray = GrayImageU8::filled(300, 300, 255);
        gray.fill_rect(10, 10, 40, 40, 0); // 30
        gray.fill_rect(200, 10, 250, 60, 0); // 50
        gray.fill_rect(10, 200, 50, 240, 0); // 40
        gray.fill_rect(200, 200, 245, 245, 0); // 45
        let set = detect_anchors(contours_of(&gray), &AnchorParams::default()).expect("4 anchors");
        let widths: Vec<i32> = set.anchors().iter().map(|a| a.rect.width).collect();
        assert_eq!(widths, vec![50, 45, 40, 30]);
        assert!(set.anchors().iter().all(|a| a.vertices == 4));
    }

    #[test]
    fn keeps_only_the_largest_four() {
        let mut gray = GrayImageU8::filled(300, 300, 255);
        for (i, size) in [30usize, 34, 38, 42, 46].iter().enumerate() {
            let x = 5 + i * 58;
            gray.fill_rect(x, 100, x + size, 100 + size, 0);
        }
        let set = detect_anchors(contours_of(&gray), &AnchorParams::default()).expect("anchors");
        assert!(set.anchors().iter().all(|a| a.rect.width >= 34));
    }

    #[test]
    fn reports_how_many_anchors_were_found() {
        let mut gray = GrayImageU8::filled(200, 200, 255);
        gray.fill_rect(10, 10, 40, 40, 0);
        gray.fill_rect(150, 10, 180, 40, 0);
        gray.fill_rect(10, 150, 40, 180, 0);
        // too small
        gray.fill_rect(150, 150, 160, 160, 0);
        let err = detect_anchors(contours_of(&gray), &AnchorParams::default()).unwrap_err();
        assert_eq!(err, OmrError::AnchorDetection { found: 3 });
        assert!(err.to_string().contains("found 3"));
        assert!(err.is_user_correctable());
    }

    #[test]
    fn elongated_and_round_shapes_are_rejected() {
        let mut gray = GrayImageU8::filled(300, 300, 255);
        // 80x56 bar: aspect 1.43
        gray.fill_rect(10, 10, 90, 66, 0);
        // disc of radius 25
        for y in 0..300usize {
            for x in 0..300usize {
                let (dx, dy) = (x as f64 - 200.0, y as f64 - 200.0);
                if dx * dx + dy * dy <= 625.0 {
                    gray.set(x, y, 0);
                }
            }
        }
        let candidates = filter_candidates(contours_of(&gray), &AnchorParams::default());
        assert!(candidates.is_empty(), "got {candidates:?}");
    }
}
