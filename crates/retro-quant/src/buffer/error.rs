use std::fmt;

/// Error type for pixel buffer construction and resampling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BufferError {
    /// Byte length does not equal `width * height * 4`
    InvalidLength {
        /// Length implied by the dimensions
        expected: usize,
        /// Length actually supplied
        actual: usize,
    },
    /// Dimensions overflow the addressable size
    TooLarge {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },
    /// Resampling target has a zero dimension or exceeds the source
    InvalidTarget {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BufferError::InvalidLength { expected, actual } => write!(
                f,
                "pixel buffer length {} does not match dimensions (expected {})",
                actual, expected
            ),
            BufferError::TooLarge { width, height } => {
                write!(f, "image dimensions {}x{} are too large", width, height)
            }
            BufferError::InvalidTarget { width, height } => {
                write!(f, "invalid target dimensions {}x{}", width, height)
            }
        }
    }
}

impl std::error::Error for BufferError {}
