use crate::error::OmrError;
use crate::types::Point2D;
use serde::Serialize;

/// Anchor centres assigned to page corners.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CornerOrdering {
    pub top_left: Point2D,
    pub top_right: Point2D,
    pub bottom_right: Point2D,
    pub bottom_left: Point2D,
}

impl CornerOrdering {
    /// `[top-left, top-right, bottom-right, bottom-left]`
    pub fn as_array(&self) -> [Point2D; 4] {
        [
            self.top_left,
            self.top_right,
            self.bottom_right,
            self.bottom_left,
        ]
    }

    /// Signed shoelace area; positive for the clockwise-on-screen order a
    /// correctly captured page produces.
    pub fn signed_area(&self) -> f64 {
        let q = self.as_array();
        (0..4)
            .map(|i| {
                let (a, b) = (q[i], q[(i + 1) % 4]);
                a.x * b.y - b.x * a.y
            })
            .sum::<f64>()
            / 2.0
    }

    /// True when every turn along the ordering has the same sign, i.e. the
    /// quadrilateral is convex and does not cross itself.
    pub fn is_convex(&self) -> bool {
        let q = self.as_array();
        let turns: Vec<f64> = (0..4)
            .map(|i| {
                let (a, b, c) = (q[i], q[(i + 1) % 4], q[(i + 2) % 4]);
                (b.x - a.x) * (c.y - b.y) - (b.y - a.y) * (c.x - b.x)
            })
            .collect();
        turns.iter().all(|&t| t > 0.0) || turns.iter().all(|&t| t < 0.0)
    }
}

/// Sort-and-split assignment: the two smallest y form the top pair, each pair
/// is then ordered by x.
pub fn order_corners(centers: [Point2D; 4]) -> CornerOrdering {
    let mut pts = centers;
    pts.sort_by(|a, b| a.y.total_cmp(&b.y));
    let (top, bottom) = pts.split_at_mut(2);
    top.sort_by(|a, b| a.x.total_cmp(&b.x));
    bottom.sort_by(|a, b| a.x.total_cmp(&b.x));
    CornerOrdering {
        top_left: top[0],
        top_right: top[1],
        bottom_right: bottom[1],
        bottom_left: bottom[0],
    }
}

/// Reject orderings that cannot produce a sane rectification.
pub fn validate_quad(corners: &CornerOrdering, min_area: f64) -> Result<f64, OmrError> {
    let area = corners.signed_area().abs();
    if !corners.is_convex() || area < min_area {
        return Err(OmrError::DegenerateAnchors { area });
    }
    Ok(area)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2D {
        Point2D::new(x, y)
    }

    #[test]
    fn ordering_is_independent_of_input_order() {
        let tl = p(48.0, 50.0);
        let tr = p(547.0, 46.0);
        let br = p(550.0, 796.0);
        let bl = p(45.0, 792.0);
        let expected = CornerOrdering {
            top_left: tl,
            top_right: tr,
            bottom_right: br,
            bottom_left: bl,
        };
        let mut pts = [tl, tr, br, bl];
        for _ in 0..4 {
            pts.rotate_left(1);
            assert_eq!(order_corners(pts), expected);
        }
        assert_eq!(order_corners([br, tl, bl, tr]), expected);
        assert_eq!(order_corners([bl, tr, tl, br]), expected);
    }

    #[test]
    fn regular_quad_passes_validation() {
        let corners = order_corners([p(0.0, 0.0), p(100.0, 0.0), p(100.0, 200.0), p(0.0, 200.0)]);
        assert!(corners.is_convex());
        assert_eq!(validate_quad(&corners, 1000.0), Ok(20000.0));
    }

    #[test]
    fn collinear_and_tiny_quads_are_rejected() {
        let line = order_corners([p(0.0, 0.0), p(10.0, 10.0), p(20.0, 20.0), p(30.0, 30.0)]);
        assert!(matches!(
            validate_quad(&line, 1.0),
            Err(OmrError::DegenerateAnchors { .. })
        ));
        let tiny = order_corners([p(0.0, 0.0), p(5.0, 0.0), p(5.0, 5.0), p(0.0, 5.0)]);
        assert!(matches!(
            validate_quad(&tiny, 1000.0),
            Err(OmrError::DegenerateAnchors { area }) if area == 25.0
        ));
    }
}
