// src/lib.rs
//! GPS Decoder Library
//!
//! Decodes NMEA 0183 GGA, RMC, VTG and GSV sentences from a polled byte
//! stream and keeps the latest reading of each, from which the best
//! available location is derived on demand.

pub mod config;
pub mod display;
pub mod error;
pub mod gps;
pub mod monitor;

// Re-export main types for convenience
pub use error::{GpsError, Result, SentenceError};
pub use gps::{GpsDecoder, GpsSnapshot, LocationSummary, MemorySource, NmeaSource, SatelliteView};
pub use monitor::{GpsMonitor, GpsSource};
