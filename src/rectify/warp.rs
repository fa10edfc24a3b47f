//! Projective warp with bilinear sampling, backed by `imageproc`.
use crate::image::GrayImageU8;
use image::{GrayImage, Luma};
use imageproc::geometric_transformations::{warp_into, Interpolation, Projection};
use nalgebra::Matrix3;

/// Warp `src` into a `width × height` image. `transform` maps source pixel
/// coordinates to destination ones; destination pixels whose pre-image falls
/// outside the source read as `border`.
///
/// Returns `None` when the transform cannot be inverted.
pub fn warp_perspective(
    src: &GrayImageU8,
    transform: &Matrix3<f64>,
    width: usize,
    height: usize,
    border: u8,
) -> Option<GrayImageU8> {
    let projection = to_projection(transform)?;
    let input = GrayImage::from_raw(src.width() as u32, src.height() as u32, src.data().to_vec())?;
    let mut out = GrayImage::from_pixel(width as u32, height as u32, Luma([border]));
    warp_into(
        &input,
        &projection,
        Interpolation::Bilinear,
        Luma([border]),
        &mut out,
    );
    GrayImageU8::from_raw(width, height, out.into_raw())
}

/// Row-major single-precision copy of `h` as an `imageproc` projection.
fn to_projection(h: &Matrix3<f64>) -> Option<Projection> {
    if h.iter().any(|v| !v.is_finite()) {
        return None;
    }
    let m = h.map(|v| v as f32);
    Projection::from_matrix([
        m[(0, 0)],
        m[(0, 1)],
        m[(0, 2)],
        m[(1, 0)],
        m[(1, 1)],
        m[(1, 2)],
        m[(2, 0)],
        m[(2, 1)],
        m[(2, 2)],
    ])
}
