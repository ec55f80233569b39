//! VDS Session Library
//!
//! This library provides the decode session around an opaque decoder
//! capability: configuration, decode-order chunk submission, and
//! asynchronous delivery of decoded frames and failures via callbacks.

pub mod decoder;
pub mod identity;
pub mod session;

pub use decoder::{DecodeFailure, DecoderFactory, VideoDecoder};
pub use identity::{IdentityDecoder, IdentityFactory};
pub use session::{DecodeSession, SessionState};

/// Result type for vds-session operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for vds-session operations
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid stream configuration: {0}")]
    Config(#[from] vds_core::Error),

    #[error("Unsupported codec: {0}")]
    UnsupportedCodec(String),

    #[error("Session is not configured")]
    NotConfigured,

    #[error("Session is closed")]
    Closed,

    #[error("First chunk after configuration must be a key frame")]
    OutOfOrderKeyframe,

    #[error("Decode pipeline is no longer running")]
    PipelineClosed,
}
