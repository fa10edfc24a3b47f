//! Stage 1: grayscale → 5×5 Gaussian blur → Otsu inverse binary threshold.
//!
//! The order is fixed and the stage has no tunables. The unblurred grayscale
//! image is handed on to the rectifier together with the mask so that the
//! bubble scorer can re-threshold the dewarped page at full detail.

pub mod blur;
pub mod filters;
pub mod grayscale;
pub mod threshold;

use crate::error::OmrError;
use crate::image::{BinaryMask, GrayImageU8, RasterImage};
use blur::separable_blur;
use filters::GAUSSIAN_5TAP;
use log::debug;

pub use grayscale::to_grayscale;
pub use threshold::{histogram, otsu_binary_inv, otsu_threshold, threshold_binary_inv};

/// Output of the preprocessing stage.
#[derive(Clone, Debug)]
pub struct Preprocessed {
    /// Single-channel version of the input, before blurring.
    pub gray: GrayImageU8,
    /// Dark ink as foreground (255), paper as background (0).
    pub mask: BinaryMask,
    /// Cutoff selected by Otsu's method on the blurred image.
    pub threshold: u8,
}

/// Run the preprocessing stage. Fails only for a zero-sized image.
pub fn preprocess(image: &RasterImage) -> Result<Preprocessed, OmrError> {
    if image.is_empty() {
        return Err(OmrError::EmptyImage);
    }
    let gray = to_grayscale(image);
    let blurred = separable_blur(&gray, &GAUSSIAN_5TAP);
    let (mask, threshold) = otsu_binary_inv(&blurred);
    debug!(
        "preprocess w={} h={} otsu_threshold={}",
        gray.width(),
        gray.height(),
        threshold
    );
    Ok(Preprocessed {
        gray,
        mask,
        threshold,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dark_square_becomes_foreground() {
        let mut gray = GrayImageU8::filled(40, 40, 240);
        gray.fill_rect(10, 10, 30, 30, 15);
        let pre = preprocess(&RasterImage::Gray(gray)).expect("non-empty image");
        assert!(pre.mask.is_on(20, 20));
        assert!(!pre.mask.is_on(2, 2));
        assert_eq!((pre.mask.width(), pre.mask.height()), (40, 40));
    }

    #[test]
    fn empty_image_is_rejected() {
        let gray = GrayImageU8::filled(0, 10, 0);
        assert_eq!(
            preprocess(&RasterImage::Gray(gray)).unwrap_err(),
            OmrError::EmptyImage
        );
    }
}
