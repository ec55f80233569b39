//! Stream configuration for a decode session

use crate::{Error, Result};

/// Preference for where decode work should run.
///
/// The decoder backend treats this as a hint; a backend with no hardware
/// path may serve `PreferHardware` in software.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum HardwareAcceleration {
    /// Let the backend choose
    #[default]
    NoPreference,
    /// Use hardware decode when available
    PreferHardware,
    /// Stay on the software path even when hardware is available
    PreferSoftware,
}

/// Describes one encoded video stream to a decode session.
///
/// Immutable once passed to [`DecodeSession::configure`]; the session keeps
/// its own copy for the lifetime of that configuration.
///
/// [`DecodeSession::configure`]: https://docs.rs/vds-session
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StreamConfig {
    /// Codec profile string, e.g. "avc1.42002a"
    pub codec: String,
    /// Coded frame width in pixels
    pub coded_width: u32,
    /// Coded frame height in pixels
    pub coded_height: u32,
    /// Hardware acceleration preference
    #[cfg_attr(feature = "serde", serde(default))]
    pub hardware_acceleration: HardwareAcceleration,
}

impl StreamConfig {
    /// Creates a configuration with no hardware preference
    pub fn new(codec: impl Into<String>, coded_width: u32, coded_height: u32) -> Self {
        Self {
            codec: codec.into(),
            coded_width,
            coded_height,
            hardware_acceleration: HardwareAcceleration::NoPreference,
        }
    }

    /// Sets the hardware acceleration preference
    pub fn with_hardware_acceleration(mut self, preference: HardwareAcceleration) -> Self {
        self.hardware_acceleration = preference;
        self
    }

    /// Checks the configuration invariants: positive dimensions, non-empty codec
    pub fn validate(&self) -> Result<()> {
        if self.codec.is_empty() {
            return Err(Error::EmptyCodec);
        }
        if self.coded_width == 0 || self.coded_height == 0 {
            return Err(Error::InvalidDimensions(self.coded_width, self.coded_height));
        }
        Ok(())
    }
}
