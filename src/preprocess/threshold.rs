//! Global thresholding with an Otsu-selected cutoff.
//!
//! The cutoff `t` splits the histogram into the classes `≤ t` and `> t` and
//! maximises the between-class variance. The first maximum wins, and a
//! histogram with a single populated bin yields `t = 0`.
use crate::image::{BinaryMask, ImageView};

/// 256-bin intensity histogram.
pub fn histogram<I: ImageView<Pixel = u8>>(gray: &I) -> [u64; 256] {
    let mut hist = [0u64; 256];
    for y in 0..gray.height() {
        for &v in gray.row(y) {
            hist[v as usize] += 1;
        }
    }
    hist
}

/// Otsu cutoff for a histogram.
pub fn otsu_threshold(hist: &[u64; 256]) -> u8 {
    let total: u64 = hist.iter().sum();
    if total == 0 {
        return 0;
    }
    let total_f = total as f64;
    let sum_all: f64 = hist
        .iter()
        .enumerate()
        .map(|(i, &c)| i as f64 * c as f64)
        .sum();

    let mut best_t = 0u8;
    let mut best_sigma = 0.0f64;
    let mut w0 = 0.0f64;
    let mut sum0 = 0.0f64;
    for (t, &count) in hist.iter().enumerate() {
        w0 += count as f64;
        sum0 += t as f64 * count as f64;
        let w1 = total_f - w0;
        if w0 == 0.0 || w1 == 0.0 {
            continue;
        }
        let mean0 = sum0 / w0;
        let mean1 = (sum_all - sum0) / w1;
        let diff = mean0 - mean1;
        let sigma = (w0 / total_f) * (w1 / total_f) * diff * diff;
        if sigma > best_sigma {
            best_sigma = sigma;
            best_t = t as u8;
        }
    }
    best_t
}

/// Inverse binary threshold: pixels `> threshold` become background, the
/// rest (dark ink) become foreground.
pub fn threshold_binary_inv<I: ImageView<Pixel = u8>>(gray: &I, threshold: u8) -> BinaryMask {
    BinaryMask::from_predicate(gray, |v| v <= threshold)
}

/// Otsu cutoff plus inverse binary threshold in one call.
pub fn otsu_binary_inv<I: ImageView<Pixel = u8>>(gray: &I) -> (BinaryMask, u8) {
    let t = otsu_threshold(&histogram(gray));
    (threshold_binary_inv(gray, t), t)
}
