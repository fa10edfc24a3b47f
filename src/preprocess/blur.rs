//! Separable blur over 8-bit rasters in fixed-point arithmetic.
//!
//! The horizontal pass stores unnormalised sums in `u32`; the vertical pass
//! accumulates them and rounds once, so the result equals the exact 2D
//! convolution rounded to nearest. Border samples clamp to the image extents.
use super::filters::SeparableFilter;
use crate::image::{GrayImageU8, ImageView, ImageViewMut};

/// Blur `src` with `filter` applied along both axes.
pub fn separable_blur<F: SeparableFilter + ?Sized>(src: &GrayImageU8, filter: &F) -> GrayImageU8 {
    let (w, h) = (src.width(), src.height());
    let mut out = GrayImageU8::filled(w, h, 0);
    if w == 0 || h == 0 {
        return out;
    }
    let taps = filter.taps();
    let radius = filter.radius() as isize;
    let total_shift = 2 * filter.shift();
    let round = if total_shift == 0 { 0 } else { 1u32 << (total_shift - 1) };

    let mut horiz = vec![0u32; w * h];
    for y in 0..h {
        let row = src.row(y);
        let dst = &mut horiz[y * w..(y + 1) * w];
        for (x, acc_out) in dst.iter_mut().enumerate() {
            let mut acc = 0u32;
            for (k, &tap) in taps.iter().enumerate() {
                let sx = clamp_index(x as isize + k as isize - radius, w);
                acc += tap * row[sx] as u32;
            }
            *acc_out = acc;
        }
    }

    for y in 0..h {
        let dst = out.row_mut(y);
        for (x, px) in dst.iter_mut().enumerate() {
            let mut acc = 0u32;
            for (k, &tap) in taps.iter().enumerate() {
                let sy = clamp_index(y as isize + k as isize - radius, h);
                acc += tap * horiz[sy * w + x];
            }
            *px = ((acc + round) >> total_shift).min(255) as u8;
        }
    }
    out
}

fn clamp_index(idx: isize, upper: usize) -> usize {
    if idx < 0 {
        0
    } else if (idx as usize) >= upper {
        upper - 1
    } else {
        idx as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocess::filters::GAUSSIAN_5TAP;

    #[test]
    fn flat_image_is_unchanged() {
        let img = GrayImageU8::filled(9, 6, 137);
        let out = separable_blur(&img, &GAUSSIAN_5TAP);
        assert!(out.data().iter().all(|&v| v == 137));
    }

    #[test]
    fn impulse_spreads_with_gaussian_weights() {
        let mut img = GrayImageU8::filled(9, 9, 0);
        img.set(4, 4, 255);
        let out = separable_blur(&img, &GAUSSIAN_5TAP);
        // 255 * 36 / 256 = 35.86 -> 36 at the centre
        assert_eq!(out.get(4, 4), 36);
        // 255 * 24 / 256 = 23.9 -> 24 one pixel off-axis
        assert_eq!(out.get(5, 4), 24);
        assert_eq!(out.get(4, 3), 24);
        assert_eq!(out.get(0, 0), 0);
    }
}
