//! Encoded chunk construction

use crate::{Error, Result};

/// Classification of an encoded chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FrameType {
    /// Decodable without reference to prior chunks
    Key,
    /// Depends on previously decoded reference frames
    Delta,
}

/// One unit of encoded video data.
///
/// Immutable after construction; build one through [`ChunkBuilder::build`].
/// Submitting a chunk to a session moves it; the decoder owns the payload
/// from that point on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedChunk {
    timestamp: i64,
    frame_type: FrameType,
    data: Vec<u8>,
}

impl EncodedChunk {
    /// Presentation timestamp in stream time units
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Key or delta classification
    pub fn frame_type(&self) -> FrameType {
        self.frame_type
    }

    /// Whether this chunk is a key frame
    pub fn is_key(&self) -> bool {
        self.frame_type == FrameType::Key
    }

    /// Encoded payload bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

/// Constructs [`EncodedChunk`] values from raw payloads
pub struct ChunkBuilder;

impl ChunkBuilder {
    /// Builds a chunk from payload bytes, a presentation timestamp and a
    /// key-frame flag.
    ///
    /// Fails with [`Error::EmptyPayload`] when `payload` is empty; a decoder
    /// can do nothing with a zero-length chunk.
    pub fn build(payload: Vec<u8>, timestamp: i64, is_key: bool) -> Result<EncodedChunk> {
        if payload.is_empty() {
            return Err(Error::EmptyPayload);
        }

        Ok(EncodedChunk {
            timestamp,
            frame_type: if is_key { FrameType::Key } else { FrameType::Delta },
            data: payload,
        })
    }
}
