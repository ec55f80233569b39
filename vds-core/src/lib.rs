//! VDS Core Library
//!
//! This library provides the value types shared across the VDS (Video Decode
//! Session) workspace: stream configuration, encoded chunks and decoded frames.

pub mod chunk;
pub mod config;
pub mod frame;

pub use chunk::{ChunkBuilder, EncodedChunk, FrameType};
pub use config::{HardwareAcceleration, StreamConfig};
pub use frame::{DecodedFrame, PixelFormat};

/// Result type for vds-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for vds-core operations
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("Chunk payload must not be empty")]
    EmptyPayload,

    #[error("Coded dimensions must be positive, got {0}x{1}")]
    InvalidDimensions(u32, u32),

    #[error("Codec string must not be empty")]
    EmptyCodec,
}
