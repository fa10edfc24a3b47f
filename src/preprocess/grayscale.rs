use crate::image::{GrayImageU8, ImageViewMut, RasterImage, RgbaImageU8};

// BT.601 luma weights in Q14: 0.299, 0.587, 0.114.
const R_Q14: u32 = 4899;
const G_Q14: u32 = 9617;
const B_Q14: u32 = 1868;
const Q14_ROUND: u32 = 1 << 13;

/// Collapse a captured raster to one channel. Grayscale input is cloned
/// as-is; RGBA uses BT.601 weights and ignores alpha.
pub fn to_grayscale(image: &RasterImage) -> GrayImageU8 {
    match image {
        RasterImage::Gray(gray) => gray.clone(),
        RasterImage::Rgba(rgba) => rgba_to_gray(rgba),
    }
}

fn rgba_to_gray(rgba: &RgbaImageU8) -> GrayImageU8 {
    let (w, h) = (rgba.width(), rgba.height());
    let mut out = GrayImageU8::filled(w, h, 0);
    let src = rgba.data();
    for y in 0..h {
        let src_row = &src[y * w * 4..(y + 1) * w * 4];
        for (dst, px) in out.row_mut(y).iter_mut().zip(src_row.chunks_exact(4)) {
            let luma = R_Q14 * px[0] as u32 + G_Q14 * px[1] as u32 + B_Q14 * px[2] as u32;
            *dst = ((luma + Q14_ROUND) >> 14).min(255) as u8;
        }
    }
    out
}
