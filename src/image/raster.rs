//! Input rasters and the binary mask produced by thresholding.

use super::traits::{ImageView, ImageViewMut};
use super::u8::GrayImageU8;

/// Owned interleaved RGBA buffer (4 bytes per pixel, no padding).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RgbaImageU8 {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl RgbaImageU8 {
    /// Wrap raw RGBA bytes; `None` when the length is not `4 * width * height`.
    pub fn from_raw(width: usize, height: usize, data: Vec<u8>) -> Option<Self> {
        (data.len() == width * height * 4).then_some(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let i = (y * self.width + x) * 4;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// A captured photograph before preprocessing: grayscale or RGBA.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RasterImage {
    Gray(GrayImageU8),
    Rgba(RgbaImageU8),
}

impl RasterImage {
    pub fn width(&self) -> usize {
        match self {
            RasterImage::Gray(img) => img.width(),
            RasterImage::Rgba(img) => img.width(),
        }
    }

    pub fn height(&self) -> usize {
        match self {
            RasterImage::Gray(img) => img.height(),
            RasterImage::Rgba(img) => img.height(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}

impl From<GrayImageU8> for RasterImage {
    fn from(img: GrayImageU8) -> Self {
        RasterImage::Gray(img)
    }
}

impl From<RgbaImageU8> for RasterImage {
    fn from(img: RgbaImageU8) -> Self {
        RasterImage::Rgba(img)
    }
}

/// Foreground value of a [`BinaryMask`].
pub const MASK_ON: u8 = 255;
/// Background value of a [`BinaryMask`].
pub const MASK_OFF: u8 = 0;

/// Grayscale raster restricted to {0, 255}. Only the thresholding code
/// constructs masks, so every pixel is either [`MASK_ON`] or [`MASK_OFF`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BinaryMask {
    inner: GrayImageU8,
}

impl BinaryMask {
    /// Build a mask by classifying every pixel of `gray` with `is_on`.
    pub fn from_predicate<I, F>(gray: &I, mut is_on: F) -> Self
    where
        I: ImageView<Pixel = u8>,
        F: FnMut(u8) -> bool,
    {
        let mut inner = GrayImageU8::filled(gray.width(), gray.height(), MASK_OFF);
        for y in 0..gray.height() {
            let src = gray.row(y);
            for (dst, &v) in inner.row_mut(y).iter_mut().zip(src) {
                if is_on(v) {
                    *dst = MASK_ON;
                }
            }
        }
        Self { inner }
    }

    pub fn width(&self) -> usize {
        self.inner.width()
    }

    pub fn height(&self) -> usize {
        self.inner.height()
    }

    #[inline]
    pub fn is_on(&self, x: usize, y: usize) -> bool {
        self.inner.get(x, y) == MASK_ON
    }

    /// Number of foreground pixels in the half-open rectangle
    /// `[x0, x1) × [y0, y1)`.
    pub fn count_on(&self, x0: usize, y0: usize, x1: usize, y1: usize) -> usize {
        let x1 = x1.min(self.width());
        let y1 = y1.min(self.height());
        if x0 >= x1 {
            return 0;
        }
        (y0..y1)
            .map(|y| {
                self.inner.row(y)[x0..x1]
                    .iter()
                    .filter(|&&v| v == MASK_ON)
                    .count()
            })
            .sum()
    }

    pub fn as_gray(&self) -> &GrayImageU8 {
        &self.inner
    }
}

impl ImageView for BinaryMask {
    type Pixel = u8;

    fn width(&self) -> usize {
        self.inner.width()
    }

    fn height(&self) -> usize {
        self.inner.height()
    }

    #[inline]
    fn row(&self, y: usize) -> &[u8] {
        self.inner.row(y)
    }
}
