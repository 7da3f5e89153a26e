// src/display/json.rs
//! Line-delimited JSON output, one snapshot per decoder update

use crate::{error::Result, gps::data::GpsSnapshot, monitor::GpsMonitor};
use std::{
    io::{self, Write},
    time::Duration,
};
use tokio::{
    sync::broadcast::{error::RecvError, Receiver},
    time::timeout,
};

pub struct JsonDisplay {
    interval: Duration,
}

impl JsonDisplay {
    /// `interval` bounds how long a stop request can go unnoticed
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// Print every snapshot published on `updates` until the monitor stops.
    ///
    /// Subscribe before starting the poller so the first update is not missed.
    pub async fn run(&self, monitor: &GpsMonitor, mut updates: Receiver<GpsSnapshot>) -> Result<()> {
        let mut stdout = io::stdout();

        while monitor.is_running() {
            match timeout(self.interval, updates.recv()).await {
                Ok(Ok(snapshot)) => self.write_snapshot(&mut stdout, &snapshot)?,
                Ok(Err(RecvError::Lagged(skipped))) => {
                    log::warn!("JSON output fell behind, {} updates skipped", skipped);
                }
                Ok(Err(RecvError::Closed)) => break,
                Err(_) => {}
            }
        }
        Ok(())
    }

    pub fn write_snapshot(&self, out: &mut impl Write, snapshot: &GpsSnapshot) -> Result<()> {
        serde_json::to_writer(&mut *out, snapshot)?;
        writeln!(out)?;
        out.flush()?;
        Ok(())
    }
}
