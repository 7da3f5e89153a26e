// src/main.rs
//! GPS Decoder - NMEA 0183 decoder for serial GPS receivers

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use gps_decoder::{
    config::{GpsConfig, OutputMode},
    display::{JsonDisplay, TerminalDisplay},
    gps::source::list_serial_ports,
    GpsDecoder, GpsMonitor, GpsSource, LocationSummary, MemorySource,
};
use log::{info, warn};
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(name = "gps-decoder", version, about = "Decode NMEA 0183 sentences from a GPS receiver")]
struct Cli {
    /// Serial port the receiver is attached to
    #[arg(short, long)]
    port: Option<String>,

    /// Serial baud rate
    #[arg(short, long)]
    baud: Option<u32>,

    /// Decode a captured NMEA log instead of a serial port
    #[arg(long, value_name = "FILE", conflicts_with = "port")]
    replay: Option<PathBuf>,

    /// Poll interval in milliseconds
    #[arg(short, long)]
    interval: Option<u64>,

    /// Print one JSON snapshot per update instead of the terminal view
    #[arg(long)]
    json: bool,

    /// List available serial ports and exit
    #[arg(long)]
    list_ports: bool,

    /// Persist the effective settings to the config file
    #[arg(long)]
    save_config: bool,
}

impl Cli {
    fn apply(&self, config: &mut GpsConfig) {
        if let Some(port) = &self.port {
            config.serial_port = Some(port.clone());
        }
        if let Some(baud) = self.baud {
            config.baudrate = baud;
        }
        if let Some(interval) = self.interval {
            config.poll_interval_ms = interval;
        }
        if self.json {
            config.output = OutputMode::Json;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn,gps_decoder=info")).init();
    let cli = Cli::parse();

    if cli.list_ports {
        let ports = list_serial_ports()?;
        if ports.is_empty() {
            println!("No serial ports found.");
        } else {
            println!("Available serial ports:");
            for (name, kind) in ports {
                println!("  {} - {}", name, kind);
            }
        }
        return Ok(());
    }

    let mut config = GpsConfig::load().unwrap_or_else(|e| {
        warn!("{}, using defaults", e);
        GpsConfig::default()
    });
    cli.apply(&mut config);

    if cli.save_config {
        config.save().context("saving configuration")?;
        info!("Configuration saved to {}", GpsConfig::get_config_path()?.display());
    }

    if let Some(path) = &cli.replay {
        return replay(path, &config);
    }

    let port = config
        .serial_port
        .clone()
        .context("no serial port configured, pass --port or set serial_port in the config file")?;
    let monitor = GpsMonitor::open(&GpsSource::Serial {
        port,
        baudrate: config.baudrate,
    })?;

    // Set up Ctrl+C handler
    let stopper = monitor.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            stopper.stop();
        }
    });

    let interval = config.poll_interval();
    let poller = match config.output {
        OutputMode::Terminal => {
            let poller = monitor.start(interval);
            TerminalDisplay::new().run(&monitor).await?;
            poller
        }
        OutputMode::Json => {
            let updates = monitor.subscribe();
            let poller = monitor.start(interval);
            JsonDisplay::new(interval).run(&monitor, updates).await?;
            poller
        }
    };

    monitor.stop();
    poller.await.context("polling task failed")?;
    Ok(())
}

/// Decode a whole capture in one pass and print what was learned
fn replay(path: &Path, config: &GpsConfig) -> anyhow::Result<()> {
    let source = MemorySource::from_file(path)?;
    let mut decoder = GpsDecoder::new(source);
    let new_data = decoder.update();

    let stats = decoder.stats();
    info!(
        "Replayed {}: {} parsed, {} bad checksum, {} malformed, {} ignored",
        path.display(),
        stats.sentences_parsed,
        stats.checksum_failures,
        stats.malformed_sentences,
        stats.unsupported_sentences
    );
    if !new_data {
        warn!("No valid sentences found in {}", path.display());
    }

    match config.output {
        OutputMode::Json => println!("{}", serde_json::to_string_pretty(&decoder.get_all_data())?),
        OutputMode::Terminal => {
            match decoder.get_location() {
                Some(location) => println!(
                    "Location: {} {} ({})",
                    LocationSummary::format_coordinate(location.latitude),
                    LocationSummary::format_coordinate(location.longitude),
                    location.source.as_str()
                ),
                None => println!("Location: no fix"),
            }
            let in_view = decoder.get_satellites().map(|view| view.satellites_in_view);
            match in_view {
                Some(count) => println!("Satellites in view: {}", count),
                None => println!("Satellites in view: unknown"),
            }
        }
    }
    Ok(())
}
