//! Decoder capability boundary
//!
//! The session delegates all bitstream work to a backend behind these
//! traits. A backend may be software, hardware-accelerated, or a test
//! double; the session only cares about the chunk-in / frames-out contract.

use std::fmt;

use vds_core::{DecodedFrame, EncodedChunk, StreamConfig};

use crate::Result;

/// Diagnostic for a chunk the backend could not decode.
///
/// Carried to the session's error callback. Non-fatal: the session stays
/// configured and later chunks are still decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeFailure {
    /// Human-readable description of the failure
    pub message: String,
    /// Presentation timestamp of the offending chunk
    pub timestamp: i64,
}

impl DecodeFailure {
    /// Creates a failure diagnostic for the chunk at `timestamp`
    pub fn new(message: impl Into<String>, timestamp: i64) -> Self {
        Self {
            message: message.into(),
            timestamp,
        }
    }
}

impl fmt::Display for DecodeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "decode failure at ts {}: {}", self.timestamp, self.message)
    }
}

/// An instantiated decoder for one stream configuration.
///
/// Implementations receive chunks in submission order and may hold frames
/// back for reference reordering; held frames are released by `flush`.
pub trait VideoDecoder: Send {
    /// Decodes one chunk, returning zero or more frames in output order
    fn decode(&mut self, chunk: &EncodedChunk) -> std::result::Result<Vec<DecodedFrame>, DecodeFailure>;

    /// Releases any frames held for reordering
    fn flush(&mut self) -> Vec<DecodedFrame> {
        Vec::new()
    }
}

/// Creates decoders for stream configurations.
///
/// The factory decides codec/profile support and how to honor the
/// hardware-acceleration preference; unsupported configurations are
/// rejected here, synchronously, before a session transitions state.
pub trait DecoderFactory {
    /// Instantiates a decoder for `config`
    fn create(&self, config: &StreamConfig) -> Result<Box<dyn VideoDecoder>>;
}
