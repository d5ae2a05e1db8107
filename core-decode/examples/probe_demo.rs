//! # Probe and Read Example
//!
//! Probes an MP3 file, then decodes a window of it and prints a short summary.
//!
//! Run with:
//! ```bash
//! cargo run --example probe_demo --package core-decode -- track.mp3
//!
//! # Decode 4096 samples starting one second in
//! cargo run --example probe_demo --package core-decode -- track.mp3 44100 4096
//!
//! # JSON logs with decoder tracing
//! RUST_LOG=core_decode=trace cargo run --example probe_demo --package core-decode -- track.mp3
//! ```

use core_decode::{DecodeConfig, Destination, Mp3Decoder, ReadWindow};
use core_runtime::logging::{init_logging, strip_path, LogFormat, LogLevel, LoggingConfig};
use std::env;
use std::process::ExitCode;
use tracing::{error, info};

fn main() -> ExitCode {
    let args: Vec<String> = env::args().collect();

    let mut config = LoggingConfig::default()
        .with_format(LogFormat::Pretty)
        .with_level(LogLevel::Debug);
    if let Ok(filter) = env::var("RUST_LOG") {
        config = config.with_filter(filter).with_format(LogFormat::Json);
    }
    if let Err(e) = init_logging(config) {
        eprintln!("Failed to initialize logging: {}", e);
        return ExitCode::FAILURE;
    }

    let Some(path) = args.get(1) else {
        eprintln!("usage: probe_demo <file.mp3> [start] [length]");
        return ExitCode::FAILURE;
    };
    let start = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(0);
    let length = args.get(3).and_then(|s| s.parse().ok());

    let decoder = match Mp3Decoder::new().with_config(DecodeConfig::fast_seek()) {
        Ok(decoder) => decoder,
        Err(e) => {
            error!("Invalid decoder configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let info = match decoder.probe(path.as_str()) {
        Ok(info) => info,
        Err(e) => {
            error!(file = %strip_path(path), "Probe failed: {}", e);
            return ExitCode::FAILURE;
        }
    };
    info!(
        file = %strip_path(path),
        total_samples = info.total_samples,
        channels = info.channels,
        sample_rate = info.sample_rate,
        duration = ?info.duration(),
        "Stream info"
    );

    let window = ReadWindow::new(start, length);
    let output = match decoder.read(path.as_str(), window, Destination::Allocate) {
        Ok(output) => output,
        Err(e) => {
            error!("Read failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let pcm = output.pcm.to_vec();
    let peak = pcm.iter().fold(0.0f32, |peak, s| peak.max(s.abs()));
    info!(
        samples = output.samples_written,
        values = pcm.len(),
        peak,
        "Decoded window"
    );

    ExitCode::SUCCESS
}
