use crate::anchors::{AnchorCandidate, AnchorParams};
use crate::image::RasterImage;
use crate::rectify::CornerOrdering;
use crate::types::{BoundingRect, Point2D};
use nalgebra::Matrix3;
use serde::Serialize;

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDescriptor {
    pub width: usize,
    pub height: usize,
    pub channels: usize,
}

impl InputDescriptor {
    pub fn of(image: &RasterImage) -> Self {
        let channels = match image {
            RasterImage::Gray(_) => 1,
            RasterImage::Rgba(_) => 4,
        };
        Self {
            width: image.width(),
            height: image.height(),
            channels,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreprocessStage {
    pub threshold: u8,
    pub foreground_pixels: usize,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnchorDescriptor {
    pub rect: BoundingRect,
    pub center: Point2D,
    pub area: f64,
    pub vertices: usize,
}

impl From<&AnchorCandidate> for AnchorDescriptor {
    fn from(c: &AnchorCandidate) -> Self {
        Self {
            rect: c.rect,
            center: c.center(),
            area: c.area,
            vertices: c.vertices,
        }
    }
}

/// Contour filtering outcome. `candidates` are ranked; the first four were
/// selected.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnchorStage {
    pub contours: usize,
    pub thresholds: AnchorParams,
    pub candidates: Vec<AnchorDescriptor>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RectifyStage {
    pub corners: CornerOrdering,
    pub quad_area: f64,
    pub transform: Matrix3<f64>,
    pub width: usize,
    pub height: usize,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringStage {
    pub threshold: u8,
    pub fill_threshold: f64,
    pub fill_ratios: Vec<Vec<f64>>,
}
