pub mod color;
pub mod f32;
pub mod grad;
pub mod io;
pub mod planar;
pub mod traits;
pub mod u8;

pub use self::color::ColorSpace;
pub use self::f32::ImageF32;
pub use self::grad::{forward_gradients, Gradients};
pub use self::planar::PlanarImage;
pub use self::traits::{ImageView, ImageViewMut};
pub use self::u8::ImageU8;
