//! RGBA pixel storage and nearest-neighbour resampling.

mod error;
mod pixel_buffer;
mod resample;

pub use error::BufferError;
pub use pixel_buffer::PixelBuffer;
pub(crate) use resample::cell_starts;
