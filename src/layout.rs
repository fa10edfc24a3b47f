//! Printed answer-sheet geometry shared with the sheet generator.
//!
//! The sheet is a `page_width × page_height` page with a solid square anchor
//! near each corner, inset by half the margin. Rectification maps the anchor
//! centres onto the page corners, so a bubble cell of the rectified grid
//! corresponds to a slightly shrunken rectangle on the printed sheet.
//!
//! Corner cells overlap the anchor squares. Ink painted into a cell is kept
//! `anchor_clearance` pixels away from every anchor so a mark never merges
//! with one into a single non-square blob.

use crate::homography::perspective_transform;
use crate::image::GrayImageU8;
use crate::rectify::{warp_perspective, RectifyParams};
use crate::types::{BoundingRect, Point2D};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SheetLayout {
    pub page_width: usize,
    pub page_height: usize,
    pub margin: usize,
    pub anchor_size: usize,
    pub num_options: usize,
    /// Fraction of a cell left blank on each side of a painted bubble.
    pub mark_inset: f64,
    /// Blank gap (pixels) kept between painted marks and each anchor.
    pub anchor_clearance: usize,
    pub paper: u8,
    pub ink: u8,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            page_width: 595,
            page_height: 842,
            margin: 40,
            anchor_size: 56,
            num_options: 5,
            mark_inset: 0.08,
            anchor_clearance: 4,
            paper: 255,
            ink: 0,
        }
    }
}

impl SheetLayout {
    /// Rectifier settings producing a page of this layout's size.
    pub fn rectify_params(&self) -> RectifyParams {
        RectifyParams {
            width: self.page_width,
            height: self.page_height,
            ..RectifyParams::default()
        }
    }

    /// Anchor squares in `[tl, tr, br, bl]` order.
    pub fn anchor_rects(&self) -> [BoundingRect; 4] {
        let inset = (self.margin / 2) as i32;
        let size = self.anchor_size as i32;
        let right = self.page_width as i32 - inset - size;
        let bottom = self.page_height as i32 - inset - size;
        let rect = |x, y| BoundingRect {
            x,
            y,
            width: size,
            height: size,
        };
        [
            rect(inset, inset),
            rect(right, inset),
            rect(right, bottom),
            rect(inset, bottom),
        ]
    }

    pub fn anchor_centers(&self) -> [Point2D; 4] {
        self.anchor_rects().map(|r| r.center())
    }

    /// Anchor squares grown by the clearance gap. Marks are never painted
    /// inside these.
    pub fn keep_out_rects(&self) -> [BoundingRect; 4] {
        let gap = self.anchor_clearance as i32;
        self.anchor_rects().map(|r| r.inflate(gap))
    }

    /// Map a point of the rectified page back onto the printed sheet.
    pub fn rectified_to_sheet(&self, p: Point2D) -> Point2D {
        let [tl, _, br, _] = self.anchor_centers();
        let sx = (br.x - tl.x) / self.page_width as f64;
        let sy = (br.y - tl.y) / self.page_height as f64;
        Point2D::new(tl.x + p.x * sx, tl.y + p.y * sy)
    }

    /// Sheet-space rectangle `(x0, y0, x1, y1)` of rectified cell `(row, col)`.
    pub fn cell_rect_on_sheet(&self, row: usize, col: usize, num_questions: usize) -> (f64, f64, f64, f64) {
        let (x0, y0, x1, y1) = crate::scoring::cell_bounds(
            self.page_width,
            self.page_height,
            num_questions.max(1),
            self.num_options.max(1),
            row,
            col,
        );
        let a = self.rectified_to_sheet(Point2D::new(x0 as f64, y0 as f64));
        let b = self.rectified_to_sheet(Point2D::new(x1 as f64, y1 as f64));
        (a.x, a.y, b.x, b.y)
    }

    /// Blank sheet carrying only the anchors.
    pub fn render_blank(&self) -> GrayImageU8 {
        let mut page = GrayImageU8::filled(self.page_width, self.page_height, self.paper);
        for r in self.anchor_rects() {
            page.fill_rect(
                r.x as usize,
                r.y as usize,
                (r.x + r.width) as usize,
                (r.y + r.height) as usize,
                self.ink,
            );
        }
        page
    }

    /// Paint a filled bubble (an ellipse inscribed in the inset cell) for
    /// `(row, col)` onto `page`.
    pub fn paint_mark(&self, page: &mut GrayImageU8, row: usize, col: usize, num_questions: usize) {
        let (x0, y0, x1, y1) = self.cell_rect_on_sheet(row, col, num_questions);
        let rx = (x1 - x0) * (0.5 - self.mark_inset);
        let ry = (y1 - y0) * (0.5 - self.mark_inset);
        let centre = Point2D::new(0.5 * (x0 + x1), 0.5 * (y0 + y1));
        fill_ellipse(page, centre, rx, ry, self.ink, &self.keep_out_rects());
    }

    /// Blacken the sheet-space rectangle of cell `(row, col)`, minus the
    /// anchor keep-out zones.
    pub fn paint_cell(&self, page: &mut GrayImageU8, row: usize, col: usize, num_questions: usize) {
        let (x0, y0, x1, y1) = self.cell_rect_on_sheet(row, col, num_questions);
        let keep_out = self.keep_out_rects();
        let x_end = (x1.round() as usize).min(page.width());
        let y_end = (y1.round() as usize).min(page.height());
        for y in y0.round() as usize..y_end {
            for x in x0.round() as usize..x_end {
                if clear_of(&keep_out, x, y) {
                    page.set(x, y, self.ink);
                }
            }
        }
    }

    /// Sheet with one optional mark per question.
    pub fn render_sheet(&self, marks: &[Option<usize>], num_questions: usize) -> GrayImageU8 {
        let mut page = self.render_blank();
        for (row, mark) in marks.iter().enumerate().take(num_questions) {
            if let Some(col) = *mark {
                if col < self.num_options {
                    self.paint_mark(&mut page, row, col, num_questions);
                }
            }
        }
        page
    }
}

fn clear_of(keep_out: &[BoundingRect], x: usize, y: usize) -> bool {
    !keep_out.iter().any(|r| r.contains(x as i32, y as i32))
}

fn fill_ellipse(
    page: &mut GrayImageU8,
    centre: Point2D,
    rx: f64,
    ry: f64,
    value: u8,
    keep_out: &[BoundingRect],
) {
    if rx <= 0.0 || ry <= 0.0 {
        return;
    }
    let (cx, cy) = (centre.x, centre.y);
    let y_start = (cy - ry).floor().max(0.0) as usize;
    let y_end = ((cy + ry).ceil() as usize).min(page.height());
    let x_start = (cx - rx).floor().max(0.0) as usize;
    let x_end = ((cx + rx).ceil() as usize).min(page.width());
    for y in y_start..y_end {
        let dy = (y as f64 + 0.5 - cy) / ry;
        for x in x_start..x_end {
            let dx = (x as f64 + 0.5 - cx) / rx;
            if dx * dx + dy * dy <= 1.0 && clear_of(keep_out, x, y) {
                page.set(x, y, value);
            }
        }
    }
}

/// Simulate a photograph: the page corners land on `corners` (`[tl, tr, br,
/// bl]`) inside a `width × height` frame filled with `background`.
pub fn photograph(
    sheet: &GrayImageU8,
    corners: [Point2D; 4],
    width: usize,
    height: usize,
    background: u8,
) -> Option<GrayImageU8> {
    let (w, h) = (sheet.width() as f64, sheet.height() as f64);
    let page = [
        Point2D::new(0.0, 0.0),
        Point2D::new(w, 0.0),
        Point2D::new(w, h),
        Point2D::new(0.0, h),
    ];
    let forward = perspective_transform(&page, &corners)?;
    warp_perspective(sheet, &forward, width, height, background)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anchors_sit_half_margin_from_corners() {
        let layout = SheetLayout::default();
        let rects = layout.anchor_rects();
        assert_eq!((rects[0].x, rects[0].y), (20, 20));
        assert_eq!((rects[2].x, rects[2].y), (519, 766));
        let centers = layout.anchor_centers();
        assert_eq!(centers[0], Point2D::new(48.0, 48.0));
        assert_eq!(centers[2], Point2D::new(547.0, 794.0));
    }

    #[test]
    fn page_corners_map_to_anchor_centers() {
        let layout = SheetLayout::default();
        let br = layout.rectified_to_sheet(Point2D::new(595.0, 842.0));
        assert!((br.x - 547.0).abs() < 1e-9 && (br.y - 794.0).abs() < 1e-9);
    }

    #[test]
    fn rendered_marks_are_dark() {
        let layout = SheetLayout::default();
        let sheet = layout.render_sheet(&[None, Some(2)], 20);
        let (x0, y0, x1, y1) = layout.cell_rect_on_sheet(1, 2, 20);
        let cx = ((x0 + x1) / 2.0) as usize;
        let cy = ((y0 + y1) / 2.0) as usize;
        assert_eq!(sheet.get(cx, cy), 0);
        assert_eq!(sheet.get(300, 60), 255);
        assert_eq!(sheet.get(48, 48), 0);
    }

    #[test]
    fn corner_marks_keep_clear_of_anchors() {
        let layout = SheetLayout::default();
        let n = 20;
        let mut sheet = layout.render_blank();
        for (row, col) in [(0, 0), (0, 4), (n - 1, 0), (n - 1, 4)] {
            layout.paint_mark(&mut sheet, row, col, n);
            let (x0, y0, x1, y1) = layout.cell_rect_on_sheet(row, col, n);
            let cx = ((x0 + x1) / 2.0) as usize;
            let cy = ((y0 + y1) / 2.0) as usize;
            assert_eq!(sheet.get(cx, cy), 0, "mark ({row},{col}) painted");
        }
        for (anchor, zone) in layout.anchor_rects().iter().zip(layout.keep_out_rects()) {
            for y in zone.y..zone.y + zone.height {
                for x in zone.x..zone.x + zone.width {
                    let expected = if anchor.contains(x, y) { 0 } else { 255 };
                    assert_eq!(sheet.get(x as usize, y as usize), expected, "({x},{y})");
                }
            }
        }
    }
}
