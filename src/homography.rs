//! Projective transforms between four point correspondences.
use crate::types::Point2D;
use nalgebra::{Matrix3, SMatrix, SVector, Vector3};

const EPS: f64 = 1e-12;

/// Exact homography mapping `src[i]` onto `dst[i]` for four correspondences.
///
/// Solves the 8×8 linear system with `h33 = 1`. Returns `None` when the
/// system is singular (three or more collinear points on either side) or the
/// solution is not finite.
pub fn perspective_transform(src: &[Point2D; 4], dst: &[Point2D; 4]) -> Option<Matrix3<f64>> {
    if has_collinear_triple(src) || has_collinear_triple(dst) {
        return None;
    }
    let mut a = SMatrix::<f64, 8, 8>::zeros();
    let mut b = SVector::<f64, 8>::zeros();
    for i in 0..4 {
        let (x, y) = (src[i].x, src[i].y);
        let (u, v) = (dst[i].x, dst[i].y);
        a[(i, 0)] = x;
        a[(i, 1)] = y;
        a[(i, 2)] = 1.0;
        a[(i, 6)] = -x * u;
        a[(i, 7)] = -y * u;
        b[i] = u;

        a[(i + 4, 3)] = x;
        a[(i + 4, 4)] = y;
        a[(i + 4, 5)] = 1.0;
        a[(i + 4, 6)] = -x * v;
        a[(i + 4, 7)] = -y * v;
        b[i + 4] = v;
    }
    let h = a.lu().solve(&b)?;
    if h.iter().any(|v| !v.is_finite()) {
        return None;
    }
    let m = Matrix3::new(h[0], h[1], h[2], h[3], h[4], h[5], h[6], h[7], 1.0);
    (m.determinant().abs() > EPS).then_some(m)
}

fn has_collinear_triple(q: &[Point2D; 4]) -> bool {
    const TRIPLES: [(usize, usize, usize); 4] = [(0, 1, 2), (0, 1, 3), (0, 2, 3), (1, 2, 3)];
    TRIPLES.iter().any(|&(i, j, k)| {
        let (ax, ay) = (q[j].x - q[i].x, q[j].y - q[i].y);
        let (bx, by) = (q[k].x - q[i].x, q[k].y - q[i].y);
        let cross = ax * by - ay * bx;
        let scale = (ax * ax + ay * ay).sqrt() * (bx * bx + by * by).sqrt();
        cross.abs() <= 1e-9 * scale.max(EPS)
    })
}

/// Map one point through `h`; `None` for points on the line at infinity.
pub fn project(h: &Matrix3<f64>, p: Point2D) -> Option<Point2D> {
    let v = h * Vector3::new(p.x, p.y, 1.0);
    let w = v[2];
    if !w.is_finite() || w.abs() <= EPS || !v[0].is_finite() || !v[1].is_finite() {
        return None;
    }
    Some(Point2D::new(v[0] / w, v[1] / w))
}
