pub mod io;
pub mod raster;
pub mod traits;
pub mod u8;

pub use self::raster::{BinaryMask, RasterImage, RgbaImageU8, MASK_OFF, MASK_ON};
pub use self::traits::{ImageView, ImageViewMut};
pub use self::u8::GrayImageU8;
pub use self::io::EncodedImage;
