//! Stage 4: dewarp the photographed sheet onto the canonical page.
//!
//! Anchor bounding-box centres are assigned to corners by sorting, the
//! quadrilateral is validated, and the exact four-point homography onto
//! `(0,0) (W,0) (W,H) (0,H)` is applied to the grayscale image.

pub mod corners;
pub mod warp;

use crate::anchors::AnchorSet;
use crate::error::OmrError;
use crate::homography::perspective_transform;
use crate::image::GrayImageU8;
use crate::types::Point2D;
use log::debug;
use nalgebra::Matrix3;
use serde::{Deserialize, Serialize};

pub use corners::{order_corners, validate_quad, CornerOrdering};
pub use warp::warp_perspective;

/// Canonical page width (A4 portrait at 72 units per inch).
pub const PAGE_WIDTH: usize = 595;
/// Canonical page height.
pub const PAGE_HEIGHT: usize = 842;
/// Value of rectified pixels that fall outside the photograph.
pub const PAPER_WHITE: u8 = 255;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RectifyParams {
    /// Output width in pixels; must match the sheet layout.
    pub width: usize,
    /// Output height in pixels; must match the sheet layout.
    pub height: usize,
    /// Smallest accepted area (pixel²) of the anchor-centre quadrilateral.
    pub min_quad_area: f64,
}

impl Default for RectifyParams {
    fn default() -> Self {
        Self {
            width: PAGE_WIDTH,
            height: PAGE_HEIGHT,
            min_quad_area: 2500.0,
        }
    }
}

impl RectifyParams {
    /// Destination corners in [`CornerOrdering`] order.
    pub fn destination(&self) -> [Point2D; 4] {
        let (w, h) = (self.width as f64, self.height as f64);
        [
            Point2D::new(0.0, 0.0),
            Point2D::new(w, 0.0),
            Point2D::new(w, h),
            Point2D::new(0.0, h),
        ]
    }
}

/// Dewarped page plus the geometry that produced it.
#[derive(Clone, Debug)]
pub struct RectifiedPage {
    pub page: GrayImageU8,
    pub corners: CornerOrdering,
    pub transform: Matrix3<f64>,
}

/// Source→page mapping derived from the anchors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageTransform {
    pub corners: CornerOrdering,
    pub quad_area: f64,
    pub transform: Matrix3<f64>,
}

/// Order the anchor centres, validate the quadrilateral and solve for the
/// page transform.
pub fn compute_transform(
    anchors: &AnchorSet,
    params: &RectifyParams,
) -> Result<PageTransform, OmrError> {
    let corners = order_corners(anchors.centers());
    let quad_area = validate_quad(&corners, params.min_quad_area)?;
    let transform = perspective_transform(&corners.as_array(), &params.destination())
        .ok_or(OmrError::DegenerateAnchors { area: quad_area })?;
    Ok(PageTransform {
        corners,
        quad_area,
        transform,
    })
}

/// Rectify `gray` using the four anchors.
pub fn rectify(
    gray: &GrayImageU8,
    anchors: &AnchorSet,
    params: &RectifyParams,
) -> Result<RectifiedPage, OmrError> {
    let PageTransform {
        corners, transform, ..
    } = compute_transform(anchors, params)?;
    let page = rectify_with_transform(gray, &transform, params)?;
    debug!(
        "rectify tl=({:.1},{:.1}) br=({:.1},{:.1}) out={}x{}",
        corners.top_left.x,
        corners.top_left.y,
        corners.bottom_right.x,
        corners.bottom_right.y,
        params.width,
        params.height
    );
    Ok(RectifiedPage {
        page,
        corners,
        transform,
    })
}

/// Apply an already computed source→page transform.
pub fn rectify_with_transform(
    gray: &GrayImageU8,
    transform: &Matrix3<f64>,
    params: &RectifyParams,
) -> Result<GrayImageU8, OmrError> {
    warp_perspective(gray, transform, params.width, params.height, PAPER_WHITE)
        .ok_or(OmrError::DegenerateAnchors { area: 0.0 })
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::anchors::{detect_anchors, AnchorParams};
    use crate::contours::find_external_contours;
    use crate::layout::SheetLayout;
    use crate::preprocess::preprocess;

    #[test]
    fn rendered_sheet_rectifies_onto_anchor_centres() {
        let layout = SheetLayout::default();
        let sheet = layout.render_blank();
        let pre = preprocess(&sheet.clone().into()).expect("preprocess");
        let anchors = detect_anchors(find_external_contours(&pre.mask), &AnchorParams::default())
            .expect("anchors");
        let rectified = rectify(&pre.gray, &anchors, &layout.rectify_params()).expect("rectify");
        assert_eq!(rectified.corners.as_array(), layout.anchor_centers());
        assert_eq!(
            (rectified.page.width(), rectified.page.height()),
            (PAGE_WIDTH, PAGE_HEIGHT)
        );
        // anchor quarters land in the page corners, the centre is paper
        assert_eq!(rectified.page.get(2, 2), 0);
        assert_eq!(rectified.page.get(PAGE_WIDTH - 3, PAGE_HEIGHT - 3), 0);
        assert_eq!(rectified.page.get(300, 400), PAPER_WHITE);
    }

    #[test]
    fn identity_transform_keeps_page_pixels() {
        let params = RectifyParams::default();
        let mut gray = GrayImageU8::filled(params.width, params.height, 230);
        gray.fill_rect(100, 200, 180, 260, 20);
        gray.fill_rect(400, 700, 420, 705, 90);
        let page = rectify_with_transform(&gray, &Matrix3::identity(), &params).expect("invertible");
        for y in 0..params.height - 1 {
            for x in 0..params.width - 1 {
                assert_eq!(page.get(x, y), gray.get(x, y), "pixel ({x},{y})");
            }
        }
    }

    #[test]
    fn singular_transform_is_degenerate() {
        let params = RectifyParams::default();
        let gray = GrayImageU8::filled(params.width, params.height, 230);
        let err = rectify_with_transform(&gray, &Matrix3::zeros(), &params).unwrap_err();
        assert!(matches!(err, OmrError::DegenerateAnchors { .. }));
    }
}
