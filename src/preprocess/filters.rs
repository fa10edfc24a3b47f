/// Separable 1D kernel with integer taps, normalised by `2^shift`.
pub trait SeparableFilter {
    /// 1D taps in left-to-right order. The kernel is assumed symmetric and of
    /// odd length.
    fn taps(&self) -> &[u32];
    /// Sum of the taps expressed as a power of two.
    fn shift(&self) -> u32;

    fn radius(&self) -> usize {
        self.taps().len() / 2
    }
}

/// Simple wrapper around a static integer kernel.
#[derive(Clone, Copy, Debug)]
pub struct StaticSeparableFilter {
    taps: &'static [u32],
    shift: u32,
}

impl Default for StaticSeparableFilter {
    fn default() -> Self {
        GAUSSIAN_5TAP
    }
}

impl StaticSeparableFilter {
    pub const fn new(taps: &'static [u32], shift: u32) -> Self {
        Self { taps, shift }
    }
}

impl SeparableFilter for StaticSeparableFilter {
    #[inline]
    fn taps(&self) -> &[u32] {
        self.taps
    }
    #[inline]
    fn shift(&self) -> u32 {
        self.shift
    }
}

/// 5×5 Gaussian with sigma derived from the kernel size: `[1, 4, 6, 4, 1] / 16`
/// per axis.
pub const GAUSSIAN_5TAP: StaticSeparableFilter =
    StaticSeparableFilter::new(&[1, 4, 6, 4, 1], 4);
