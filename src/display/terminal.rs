// src/display/terminal.rs
//! Terminal-based display implementation

use crate::{
    error::Result,
    gps::data::LocationSummary,
    monitor::{GpsMonitor, MonitorSnapshot},
};
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType, DisableLineWrap, EnableLineWrap},
};
use std::{
    io::{self, Write},
    time::Duration,
};
use tokio::time::sleep;

const MAX_SATELLITE_ROWS: usize = 12;

pub struct TerminalDisplay;

impl TerminalDisplay {
    pub fn new() -> Self {
        Self
    }

    /// Redraw once per second until the monitor stops
    pub async fn run(&self, monitor: &GpsMonitor) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(stdout, Hide, DisableLineWrap)?;

        while monitor.is_running() {
            execute!(stdout, Clear(ClearType::All), MoveTo(0, 0))?;

            let snapshot = monitor.snapshot();
            self.render_display(&mut stdout, &snapshot)?;

            stdout.flush()?;
            sleep(Duration::from_secs(1)).await;
        }

        execute!(stdout, Show, EnableLineWrap)?;
        println!("\nShutting down...");
        Ok(())
    }

    /// Render the decoder state
    pub fn render_display(&self, stdout: &mut impl Write, snapshot: &MonitorSnapshot) -> Result<()> {
        // Header
        execute!(
            stdout,
            SetForegroundColor(Color::Green),
            Print("=".repeat(60)),
            Print("\n"),
            Print("GPS Decoder - NMEA 0183"),
            Print("\n"),
            Print("=".repeat(60)),
            Print("\n"),
            ResetColor
        )?;

        let timestamp_str = match snapshot.last_update {
            Some(ts) => ts.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            None => "No data received".to_string(),
        };
        execute!(stdout, Print(format!("Last Update: {}\n\n", timestamp_str)))?;

        self.render_position_section(stdout, snapshot.data.location.as_ref())?;
        self.render_movement_section(stdout, snapshot)?;
        self.render_satellite_section(stdout, snapshot)?;
        self.render_decoder_section(stdout, snapshot)?;

        // Footer
        execute!(
            stdout,
            SetForegroundColor(Color::Green),
            Print("=".repeat(60)),
            Print("\n"),
            Print("Press Ctrl+C to exit"),
            Print("\n"),
            ResetColor
        )?;

        Ok(())
    }

    fn render_position_section(
        &self,
        stdout: &mut impl Write,
        location: Option<&LocationSummary>,
    ) -> Result<()> {
        execute!(
            stdout,
            SetForegroundColor(Color::Yellow),
            Print("POSITION:\n"),
            ResetColor
        )?;

        let Some(location) = location else {
            execute!(stdout, Print("  No fix\n\n"))?;
            return Ok(());
        };

        execute!(
            stdout,
            Print(format!("  Latitude:  {}\n", LocationSummary::format_coordinate(location.latitude))),
            Print(format!("  Longitude: {}\n", LocationSummary::format_coordinate(location.longitude))),
            Print(format!("  Altitude:  {}\n", LocationSummary::format_value(location.altitude, "m"))),
            Print(format!("  Source:    {:>12}\n\n", location.source.as_str()))
        )?;

        Ok(())
    }

    fn render_movement_section(&self, stdout: &mut impl Write, snapshot: &MonitorSnapshot) -> Result<()> {
        execute!(
            stdout,
            SetForegroundColor(Color::Cyan),
            Print("MOVEMENT:\n"),
            ResetColor
        )?;

        let location = snapshot.data.location.as_ref();
        let speed = location
            .and_then(|l| l.speed)
            .or_else(|| snapshot.data.vtg.as_ref().and_then(|vtg| vtg.speed_knots));
        let heading = location.and_then(|l| l.direction_degrees);

        execute!(
            stdout,
            Print(format!("  Speed:     {}\n", LocationSummary::format_value(speed, "kn"))),
            Print(format!("  Heading:   {}\n\n", LocationSummary::format_value(heading, "°")))
        )?;

        Ok(())
    }

    fn render_satellite_section(&self, stdout: &mut impl Write, snapshot: &MonitorSnapshot) -> Result<()> {
        execute!(
            stdout,
            SetForegroundColor(Color::Magenta),
            Print("SATELLITES:\n"),
            ResetColor
        )?;

        if let Some(gga) = &snapshot.data.gga {
            execute!(
                stdout,
                Print(format!("  Fix Type:   {:>11}\n", gga.fix_description())),
                Print(format!("  In Use:     {}\n", LocationSummary::format_value(gga.num_satellites, ""))),
                Print(format!("  HDOP:       {}\n", LocationSummary::format_value(gga.hdop, "")))
            )?;
        }

        let Some(view) = &snapshot.data.satellites else {
            execute!(stdout, Print("  No satellites in view\n\n"))?;
            return Ok(());
        };

        execute!(
            stdout,
            Print(format!("  In View:    {:>12}\n", view.satellites_in_view)),
            Print("  PRN  Elev  Azim   SNR  System   Signal\n")
        )?;

        for sat in view.satellites.iter().take(MAX_SATELLITE_ROWS) {
            execute!(
                stdout,
                Print(format!(
                    "  {:>3}  {:>4}  {:>4}  {:>4}  {:<7}  {}\n",
                    sat.prn,
                    optional(sat.elevation),
                    optional(sat.azimuth),
                    optional(sat.snr),
                    sat.constellation(),
                    sat.signal_strength_description()
                ))
            )?;
        }
        if view.satellites.len() > MAX_SATELLITE_ROWS {
            execute!(
                stdout,
                Print(format!("  ... {} more\n", view.satellites.len() - MAX_SATELLITE_ROWS))
            )?;
        }

        execute!(stdout, Print("\n"))?;
        Ok(())
    }

    fn render_decoder_section(&self, stdout: &mut impl Write, snapshot: &MonitorSnapshot) -> Result<()> {
        let stats = &snapshot.stats;
        execute!(
            stdout,
            SetForegroundColor(Color::Blue),
            Print("DECODER:\n"),
            ResetColor,
            Print(format!("  Updates:    {:>12}\n", snapshot.updates)),
            Print(format!("  Parsed:     {:>12}\n", stats.sentences_parsed)),
            Print(format!("  Checksum:   {:>12}\n", stats.checksum_failures)),
            Print(format!("  Malformed:  {:>12}\n", stats.malformed_sentences)),
            Print(format!("  Ignored:    {:>12}\n", stats.unsupported_sentences))
        )?;

        if let Some(reason) = &stats.last_rejection {
            execute!(stdout, Print(format!("  Last drop:  {}\n", reason)))?;
        }

        execute!(stdout, Print("\n"))?;
        Ok(())
    }
}

impl Default for TerminalDisplay {
    fn default() -> Self {
        Self::new()
    }
}

fn optional(value: Option<f32>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.0}", v))
}
