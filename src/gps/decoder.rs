// src/gps/decoder.rs
//! Polling NMEA decoder: framing, validation, parsing and the reading store

use super::data::{GpsSnapshot, LocationSummary, SatelliteView};
use super::framer::SentenceFramer;
use super::location::resolve_location;
use super::nmea::{parse_nmea_sentence, Sentence};
use super::source::NmeaSource;
use super::store::LatestReadingStore;
use crate::error::SentenceError;
use serde::Serialize;

/// Counters for everything the decoder dropped or committed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DecoderStats {
    pub sentences_parsed: u64,
    pub checksum_failures: u64,
    pub malformed_sentences: u64,
    pub unsupported_sentences: u64,
    pub decode_errors: u64,
    pub transport_errors: u64,
    pub last_rejection: Option<String>,
}

/// Decodes NMEA sentences from a polled byte source
pub struct GpsDecoder<S> {
    source: S,
    framer: SentenceFramer,
    store: LatestReadingStore,
    stats: DecoderStats,
}

impl<S: NmeaSource> GpsDecoder<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            framer: SentenceFramer::new(),
            store: LatestReadingStore::new(),
            stats: DecoderStats::default(),
        }
    }

    /// Drain whatever the source has right now.
    ///
    /// Returns true if at least one sentence was parsed into the store.
    pub fn update(&mut self) -> bool {
        let mut new_data = false;

        loop {
            match self.source.bytes_available() {
                Ok(0) => break,
                Ok(_) => {}
                Err(e) => {
                    self.transport_error(e.to_string());
                    break;
                }
            }

            match self.source.read_available() {
                Ok(bytes) if bytes.is_empty() => break,
                Ok(bytes) => new_data |= self.feed(&bytes),
                Err(e) => {
                    self.transport_error(e.to_string());
                    break;
                }
            }
        }

        new_data
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }
}

impl<S> GpsDecoder<S> {
    /// Push raw bytes straight into the framer and process complete sentences
    pub fn feed(&mut self, bytes: &[u8]) -> bool {
        if !self.framer.push(bytes) {
            self.stats.decode_errors += 1;
            self.stats.last_rejection = Some("invalid UTF-8 in input".to_string());
            return false;
        }

        let mut new_data = false;
        while let Some(sentence) = self.framer.next_sentence() {
            new_data |= self.process_sentence(&sentence);
        }
        new_data
    }

    /// Validate and parse one sentence, committing it to the store on success
    pub fn process_sentence(&mut self, sentence: &str) -> bool {
        if sentence.is_empty() {
            return false;
        }

        match parse_nmea_sentence(sentence) {
            Ok(parsed) => {
                self.commit(parsed);
                true
            }
            Err(err) => {
                self.reject(sentence, err);
                false
            }
        }
    }

    fn commit(&mut self, sentence: Sentence) {
        log::trace!("Committing {} sentence", sentence.kind());
        self.stats.sentences_parsed += 1;
        self.store.apply(sentence);
    }

    fn reject(&mut self, sentence: &str, err: SentenceError) {
        match err {
            SentenceError::Checksum => self.stats.checksum_failures += 1,
            SentenceError::Unsupported(_) => self.stats.unsupported_sentences += 1,
            SentenceError::TooFewFields { .. } | SentenceError::InvalidField { .. } => {
                self.stats.malformed_sentences += 1
            }
        }
        log::debug!("Dropping sentence {:?}: {}", sentence, err);
        self.stats.last_rejection = Some(err.to_string());
    }

    fn transport_error(&mut self, message: String) {
        log::warn!("Error reading from GPS source: {}", message);
        self.stats.transport_errors += 1;
        self.stats.last_rejection = Some(message);
    }

    pub fn get_location(&self) -> Option<LocationSummary> {
        resolve_location(&self.store)
    }

    pub fn get_satellites(&self) -> Option<SatelliteView> {
        self.store.satellites()
    }

    /// Location, satellites and every cached record
    pub fn get_all_data(&self) -> GpsSnapshot {
        GpsSnapshot {
            location: self.get_location(),
            satellites: self.get_satellites(),
            gga: self.store.gga().cloned(),
            rmc: self.store.rmc().cloned(),
            vtg: self.store.vtg().cloned(),
            gsv: self.store.gsv().cloned(),
        }
    }

    pub fn store(&self) -> &LatestReadingStore {
        &self.store
    }

    pub fn stats(&self) -> &DecoderStats {
        &self.stats
    }
}
