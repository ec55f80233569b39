//! Decoded frame data structures

/// Pixel format of a decoded frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// RGBA 8-bit per channel (4 bytes per pixel)
    Rgba,
    /// NV12 (YUV 4:2:0 semi-planar)
    Nv12,
    /// I420 / YUV420P (YUV 4:2:0 planar)
    I420,
}

/// A decoded video frame as produced by a decoder backend.
///
/// Delivered to the session's output callback; the session does not retain
/// frames after delivery.
#[derive(Debug, Clone)]
pub struct DecodedFrame {
    /// Presentation timestamp in stream time units
    pub timestamp: i64,
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Pixel format of `data`
    pub format: PixelFormat,
    /// Pixel data
    pub data: Vec<u8>,
}

impl DecodedFrame {
    /// Creates a new decoded frame
    pub fn new(timestamp: i64, width: u32, height: u32, format: PixelFormat, data: Vec<u8>) -> Self {
        Self {
            timestamp,
            width,
            height,
            format,
            data,
        }
    }

    /// Returns the size of the pixel data in bytes
    pub fn data_size(&self) -> usize {
        self.data.len()
    }
}
