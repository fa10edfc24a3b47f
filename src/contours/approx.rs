//! Douglas–Peucker reduction of closed contours.
//!
//! The closed curve is split at its first point and the point farthest from
//! it; each half is simplified independently so the result keeps both split
//! points. Distances are measured to the infinite line through the chain
//! endpoints.
use crate::types::PixelPoint;

/// Approximate a closed contour with tolerance `epsilon` (pixels).
pub fn approx_polygon_closed(points: &[PixelPoint], epsilon: f64) -> Vec<PixelPoint> {
    let n = points.len();
    if n <= 3 {
        return points.to_vec();
    }
    let origin = points[0];
    let far = points
        .iter()
        .enumerate()
        .max_by_key(|(_, p)| dist2(origin, **p))
        .map(|(i, _)| i)
        .unwrap_or(0);
    if far == 0 {
        return vec![origin];
    }

    let mut keep = vec![false; n];
    keep[0] = true;
    keep[far] = true;

    let first: Vec<usize> = (0..=far).collect();
    let second: Vec<usize> = (far..n).chain(std::iter::once(0)).collect();
    simplify_chain(points, &first, epsilon, &mut keep);
    simplify_chain(points, &second, epsilon, &mut keep);

    points
        .iter()
        .zip(&keep)
        .filter_map(|(p, &k)| k.then_some(*p))
        .collect()
}

fn simplify_chain(points: &[PixelPoint], chain: &[usize], epsilon: f64, keep: &mut [bool]) {
    let mut stack = vec![(0usize, chain.len() - 1)];
    while let Some((lo, hi)) = stack.pop() {
        if hi <= lo + 1 {
            continue;
        }
        let a = points[chain[lo]];
        let b = points[chain[hi]];
        let mut best = (lo, -1.0f64);
        for pos in lo + 1..hi {
            let d = line_distance(points[chain[pos]], a, b);
            if d > best.1 {
                best = (pos, d);
            }
        }
        if best.1 > epsilon {
            keep[chain[best.0]] = true;
            stack.push((lo, best.0));
            stack.push((best.0, hi));
        }
    }
}

fn dist2(a: PixelPoint, b: PixelPoint) -> i64 {
    let dx = (a.x - b.x) as i64;
    let dy = (a.y - b.y) as i64;
    dx * dx + dy * dy
}

fn line_distance(p: PixelPoint, a: PixelPoint, b: PixelPoint) -> f64 {
    let (dx, dy) = ((b.x - a.x) as f64, (b.y - a.y) as f64);
    let len = (dx * dx + dy * dy).sqrt();
    let (px, py) = ((p.x - a.x) as f64, (p.y - a.y) as f64);
    if len == 0.0 {
        return (px * px + py * py).sqrt();
    }
    (dx * py - dy * px).abs() / len
}
