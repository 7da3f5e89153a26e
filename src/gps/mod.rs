// src/gps/mod.rs
//! NMEA decoding: framing, checksums, sentence parsing and derived views

pub mod checksum;
pub mod data;
pub mod decoder;
pub mod framer;
pub mod location;
pub mod nmea;
pub mod source;
pub mod store;

pub use data::{GpsSnapshot, LocationSummary, SatelliteInfo, SatelliteView};
pub use decoder::{DecoderStats, GpsDecoder};
pub use source::{MemorySource, NmeaSource, SerialSource};
