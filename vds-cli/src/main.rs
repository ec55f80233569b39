//! VDS CLI Tool
//!
//! Drives a decode session with the built-in identity backend over a
//! synthetic chunk stream, for demonstration and diagnostics.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs::File;
use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use vds_core::{ChunkBuilder, HardwareAcceleration, StreamConfig};
use vds_session::identity::SUPPORTED_CODEC_PREFIXES;
use vds_session::{DecodeSession, IdentityFactory};

#[derive(Parser)]
#[command(name = "vds")]
#[command(about = "VDS (Video Decode Session) - streaming decode session demo and diagnostics")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a synthetic stream through a decode session
    Demo {
        /// Codec profile string
        #[arg(long, default_value = "avc1.42002a")]
        codec: String,

        /// Coded frame width in pixels
        #[arg(long, default_value = "1920")]
        width: u32,

        /// Coded frame height in pixels
        #[arg(long, default_value = "1080")]
        height: u32,

        /// Number of chunks to submit
        #[arg(long, default_value = "120")]
        frames: u32,

        /// Distance between key frames
        #[arg(long, default_value = "30")]
        keyframe_interval: u32,

        /// Hardware acceleration preference
        #[arg(long, value_enum, default_value = "no-preference")]
        hw: HwPreference,

        /// Read the stream configuration from a JSON file instead of flags
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List codec prefixes the built-in backend accepts
    Codecs,
}

/// CLI-facing mirror of [`HardwareAcceleration`]
#[derive(Debug, Clone, Copy, ValueEnum)]
enum HwPreference {
    NoPreference,
    PreferHardware,
    PreferSoftware,
}

impl From<HwPreference> for HardwareAcceleration {
    fn from(preference: HwPreference) -> Self {
        match preference {
            HwPreference::NoPreference => HardwareAcceleration::NoPreference,
            HwPreference::PreferHardware => HardwareAcceleration::PreferHardware,
            HwPreference::PreferSoftware => HardwareAcceleration::PreferSoftware,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Demo {
            codec,
            width,
            height,
            frames,
            keyframe_interval,
            hw,
            config,
        } => run_demo(codec, width, height, frames, keyframe_interval, hw, config)?,

        Commands::Codecs => {
            println!("Supported codec prefixes:");
            for prefix in SUPPORTED_CODEC_PREFIXES {
                println!("  {prefix}");
            }
        }
    }

    Ok(())
}

fn run_demo(
    codec: String,
    width: u32,
    height: u32,
    frames: u32,
    keyframe_interval: u32,
    hw: HwPreference,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = match config_path {
        Some(path) => {
            let file = File::open(&path)
                .with_context(|| format!("Failed to open config file {}", path.display()))?;
            serde_json::from_reader(file).context("Failed to parse stream config")?
        }
        None => StreamConfig::new(codec, width, height).with_hardware_acceleration(hw.into()),
    };

    println!(
        "Stream: {} {}x{} ({:?})",
        config.codec, config.coded_width, config.coded_height, config.hardware_acceleration
    );

    let (tx, rx) = mpsc::channel();
    let tx = Mutex::new(tx);
    let mut session = DecodeSession::new(
        IdentityFactory::new(),
        move |frame| {
            let _ = tx.lock().unwrap().send((frame.timestamp, frame.data_size()));
        },
        |failure| {
            log::warn!("{failure}");
        },
    );

    session
        .configure(config)
        .context("Failed to configure session")?;

    let keyframe_interval = keyframe_interval.max(1);
    let started = Instant::now();

    println!("Submitting {frames} chunks (key frame every {keyframe_interval})...");
    for i in 0..frames {
        let is_key = i % keyframe_interval == 0;
        // Synthetic payload; the identity backend only looks at the first byte
        let payload = vec![(i % 251 + 1) as u8; 1024];
        let chunk = ChunkBuilder::build(payload, i as i64 * 33, is_key)
            .context("Failed to build chunk")?;
        session.decode(chunk).context("Failed to submit chunk")?;
    }
    session.flush().context("Failed to flush session")?;

    let mut delivered = 0u32;
    let mut last_timestamp = None;
    let mut bytes = 0usize;
    while delivered < frames {
        let (timestamp, size) = rx
            .recv_timeout(Duration::from_secs(5))
            .context("Timed out waiting for decoded frames")?;
        delivered += 1;
        last_timestamp = Some(timestamp);
        bytes += size;
    }

    session.close();

    let elapsed = started.elapsed();
    println!(
        "Decoded {} frames ({:.2} MB of pixels) in {:.2?}",
        delivered,
        bytes as f64 / (1024.0 * 1024.0),
        elapsed
    );
    if let Some(timestamp) = last_timestamp {
        println!("Last presentation timestamp: {timestamp}");
    }

    Ok(())
}
