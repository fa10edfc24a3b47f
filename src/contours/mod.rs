//! Stage 2: external contours of the foreground regions of a binary mask.
//!
//! Border following is done by `imageproc`; only outer borders without a
//! parent are kept, so blobs nested inside holes are skipped. Area, perimeter
//! and bounding box are derived on demand, as is the Douglas–Peucker polygon
//! used by the anchor filter.

pub mod approx;

use crate::image::BinaryMask;
use crate::types::{BoundingRect, PixelPoint};
use approx::approx_polygon_closed;
use image::GrayImage;
use imageproc::contours::{find_contours, BorderType};
use serde::Serialize;

/// Closed boundary of one foreground region.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Contour {
    pub points: Vec<PixelPoint>,
}

impl Contour {
    pub fn new(points: Vec<PixelPoint>) -> Self {
        Self { points }
    }

    /// Enclosed area by the shoelace formula over the boundary vertices.
    pub fn area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let twice: i64 = (0..n)
            .map(|i| {
                let a = self.points[i];
                let b = self.points[(i + 1) % n];
                a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64
            })
            .sum();
        twice.abs() as f64 / 2.0
    }

    /// Length of the closed boundary.
    pub fn perimeter(&self) -> f64 {
        let n = self.points.len();
        if n < 2 {
            return 0.0;
        }
        (0..n)
            .map(|i| {
                let a = self.points[i];
                let b = self.points[(i + 1) % n];
                let (dx, dy) = ((b.x - a.x) as f64, (b.y - a.y) as f64);
                (dx * dx + dy * dy).sqrt()
            })
            .sum()
    }

    pub fn bounding_rect(&self) -> BoundingRect {
        let Some(first) = self.points.first() else {
            return BoundingRect::default();
        };
        let (mut x0, mut y0, mut x1, mut y1) = (first.x, first.y, first.x, first.y);
        for p in &self.points[1..] {
            x0 = x0.min(p.x);
            y0 = y0.min(p.y);
            x1 = x1.max(p.x);
            y1 = y1.max(p.y);
        }
        BoundingRect {
            x: x0,
            y: y0,
            width: x1 - x0 + 1,
            height: y1 - y0 + 1,
        }
    }

    /// Polygon approximation with tolerance `epsilon_fraction × perimeter`.
    pub fn approx_polygon(&self, epsilon_fraction: f64) -> Vec<PixelPoint> {
        approx_polygon_closed(&self.points, epsilon_fraction * self.perimeter())
    }
}

/// Find the external contours of `mask`. Never fails; a blank mask yields an
/// empty collection.
pub fn find_external_contours(mask: &BinaryMask) -> Vec<Contour> {
    let gray = mask.as_gray();
    let (width, height) = (gray.width() as u32, gray.height() as u32);
    if width == 0 || height == 0 {
        return Vec::new();
    }
    let Some(bitmap) = GrayImage::from_raw(width, height, gray.data().to_vec()) else {
        return Vec::new();
    };
    find_contours::<i32>(&bitmap)
        .into_iter()
        .filter(|c| matches!(c.border_type, BorderType::Outer) && c.parent.is_none())
        .map(|c| {
            let points = c.points.into_iter().map(|p| PixelPoint::new(p.x, p.y));
            Contour::new(points.collect())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::GrayImageU8;
    use crate::preprocess::threshold_binary_inv;

    #[test]
    fn square_metrics_follow_pixel_centres() {
        let mut gray = GrayImageU8::filled(100, 100, 255);
        gray.fill_rect(10, 20, 66, 76, 0);
        let contours = find_external_contours(&threshold_binary_inv(&gray, 127));
        assert_eq!(contours.len(), 1);
        let c = &contours[0];
        assert_eq!(c.area(), 55.0 * 55.0);
        assert!((c.perimeter() - 4.0 * 55.0).abs() < 1e-9);
        assert_eq!(
            c.bounding_rect(),
            BoundingRect {
                x: 10,
                y: 20,
                width: 56,
                height: 56
            }
        );
        assert_eq!(c.approx_polygon(0.04).len(), 4);
    }

    #[test]
    fn blank_mask_has_no_contours() {
        let gray = GrayImageU8::filled(32, 32, 255);
        assert!(find_external_contours(&threshold_binary_inv(&gray, 127)).is_empty());
    }

    #[test]
    fn separate_blobs_each_get_a_contour() {
        let mut gray = GrayImageU8::filled(60, 60, 255);
        gray.fill_rect(5, 5, 15, 15, 0);
        gray.fill_rect(30, 30, 50, 40, 0);
        gray.fill_rect(5, 45, 8, 48, 0);
        let contours = find_external_contours(&threshold_binary_inv(&gray, 127));
        assert_eq!(contours.len(), 3);
        let mut areas: Vec<f64> = contours.iter().map(Contour::area).collect();
        areas.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(areas, vec![4.0, 81.0, 171.0]);
    }

    #[test]
    fn blob_inside_a_ring_is_not_external() {
        let mut gray = GrayImageU8::filled(60, 60, 255);
        gray.fill_rect(10, 10, 50, 50, 0);
        gray.fill_rect(15, 15, 45, 45, 255);
        gray.fill_rect(25, 25, 35, 35, 0);
        let contours = find_external_contours(&threshold_binary_inv(&gray, 127));
        assert_eq!(contours.len(), 1);
        assert_eq!(
            contours[0].bounding_rect(),
            BoundingRect {
                x: 10,
                y: 10,
                width: 40,
                height: 40
            }
        );
    }

    #[test]
    fn blob_touching_the_image_edge_is_traced() {
        let mut gray = GrayImageU8::filled(40, 40, 255);
        gray.fill_rect(0, 0, 12, 12, 0);
        let contours = find_external_contours(&threshold_binary_inv(&gray, 127));
        assert_eq!(contours.len(), 1);
        assert_eq!(contours[0].area(), 121.0);
    }
}
