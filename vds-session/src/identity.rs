//! Identity decoder backend
//!
//! A pure-software stand-in backend: it performs no bitstream work and
//! emits one synthetic frame per chunk at the configured dimensions. Used
//! by the CLI demo and anywhere a session needs exercising without a real
//! codec.

use log::debug;
use vds_core::{DecodedFrame, EncodedChunk, HardwareAcceleration, PixelFormat, StreamConfig};

use crate::decoder::{DecodeFailure, DecoderFactory, VideoDecoder};
use crate::{Error, Result};

/// Codec profile prefixes the identity backend accepts
pub const SUPPORTED_CODEC_PREFIXES: &[&str] =
    &["avc1", "avc3", "hvc1", "hev1", "vp8", "vp09", "av01"];

/// Factory for [`IdentityDecoder`] instances
#[derive(Debug, Default)]
pub struct IdentityFactory;

impl IdentityFactory {
    /// Creates the factory
    pub fn new() -> Self {
        Self
    }

    /// Whether the backend accepts the given codec string
    pub fn supports(codec: &str) -> bool {
        SUPPORTED_CODEC_PREFIXES
            .iter()
            .any(|prefix| codec == *prefix || codec.starts_with(&format!("{prefix}.")))
    }
}

impl DecoderFactory for IdentityFactory {
    fn create(&self, config: &StreamConfig) -> Result<Box<dyn VideoDecoder>> {
        if !Self::supports(&config.codec) {
            return Err(Error::UnsupportedCodec(config.codec.clone()));
        }

        if config.hardware_acceleration == HardwareAcceleration::PreferHardware {
            debug!(
                "identity backend has no hardware path, serving {} in software",
                config.codec
            );
        }

        Ok(Box::new(IdentityDecoder {
            width: config.coded_width,
            height: config.coded_height,
        }))
    }
}

/// Decoder that synthesizes one RGBA frame per chunk
pub struct IdentityDecoder {
    width: u32,
    height: u32,
}

impl VideoDecoder for IdentityDecoder {
    fn decode(&mut self, chunk: &EncodedChunk) -> std::result::Result<Vec<DecodedFrame>, DecodeFailure> {
        // Fill from the first payload byte so distinct chunks produce
        // distinct frames
        let fill = chunk.data().first().copied().unwrap_or(0);
        let size = self.width as usize * self.height as usize * 4;

        Ok(vec![DecodedFrame::new(
            chunk.timestamp(),
            self.width,
            self.height,
            PixelFormat::Rgba,
            vec![fill; size],
        )])
    }
}
