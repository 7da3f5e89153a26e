// src/gps/nmea.rs
//! NMEA sentence parsing

use super::checksum::{split_sentence, validate_checksum};
use super::data::{GgaRecord, GsvMessage, RmcRecord, SatelliteInfo, VtgRecord};
use crate::error::SentenceError;
use std::str::FromStr;

const GGA_MIN_FIELDS: usize = 13;
const RMC_MIN_FIELDS: usize = 10;
const VTG_MIN_FIELDS: usize = 9;
const GSV_MIN_FIELDS: usize = 4;
const GSV_SATELLITES_PER_MESSAGE: usize = 4;

/// A checksum-valid sentence of one of the supported types
#[derive(Debug, Clone, PartialEq)]
pub enum Sentence {
    Gga(GgaRecord),
    Rmc(RmcRecord),
    Vtg(VtgRecord),
    Gsv(GsvMessage),
}

impl Sentence {
    pub fn kind(&self) -> &'static str {
        match self {
            Sentence::Gga(_) => "GGA",
            Sentence::Rmc(_) => "RMC",
            Sentence::Vtg(_) => "VTG",
            Sentence::Gsv(_) => "GSV",
        }
    }
}

/// Three letter sentence type following `$` and the two letter talker id
pub fn sentence_type(sentence: &str) -> Option<&str> {
    sentence.get(3..6)
}

/// Validate the checksum of a single sentence and parse it by type
pub fn parse_nmea_sentence(sentence: &str) -> Result<Sentence, SentenceError> {
    if !validate_checksum(sentence) {
        return Err(SentenceError::Checksum);
    }
    let (payload, _) = split_sentence(sentence).ok_or(SentenceError::Checksum)?;
    let fields: Vec<&str> = payload.split(',').collect();

    match sentence_type(sentence) {
        Some("GGA") => parse_gga(&fields).map(Sentence::Gga),
        Some("RMC") => parse_rmc(&fields).map(Sentence::Rmc),
        Some("VTG") => parse_vtg(&fields).map(Sentence::Vtg),
        Some("GSV") => parse_gsv(&fields).map(Sentence::Gsv),
        other => Err(SentenceError::Unsupported(other.unwrap_or_default().to_string())),
    }
}

/// Parse GGA (Global Positioning System Fix Data) sentence
fn parse_gga(fields: &[&str]) -> Result<GgaRecord, SentenceError> {
    require("GGA", fields, GGA_MIN_FIELDS)?;

    Ok(GgaRecord {
        timestamp: text(fields, 1),
        latitude: text(fields, 2),
        lat_direction: text(fields, 3),
        longitude: text(fields, 4),
        lon_direction: text(fields, 5),
        fix_quality: number("GGA", fields, 6),
        num_satellites: number("GGA", fields, 7),
        hdop: number("GGA", fields, 8),
        altitude: number("GGA", fields, 9),
        altitude_units: text(fields, 10),
        geoid_separation: number("GGA", fields, 11),
        geoid_units: text(fields, 12),
        // DGPS age and station id are only sent with differential fixes
        age_dgps: number("GGA", fields, 13),
        dgps_id: text(fields, 14),
    })
}

/// Parse RMC (Recommended Minimum Specific GNSS Data) sentence
fn parse_rmc(fields: &[&str]) -> Result<RmcRecord, SentenceError> {
    require("RMC", fields, RMC_MIN_FIELDS)?;

    Ok(RmcRecord {
        timestamp: text(fields, 1),
        status: text(fields, 2),
        latitude: text(fields, 3),
        lat_direction: text(fields, 4),
        longitude: text(fields, 5),
        lon_direction: text(fields, 6),
        speed_knots: number("RMC", fields, 7),
        true_course: number("RMC", fields, 8),
        date: text(fields, 9),
        // NMEA 2.3 added the mode indicator; older receivers stop earlier
        magnetic_variation: number("RMC", fields, 10),
        variation_direction: text(fields, 11),
        mode_indicator: text(fields, 12),
    })
}

/// Parse VTG (Course Over Ground and Ground Speed) sentence
fn parse_vtg(fields: &[&str]) -> Result<VtgRecord, SentenceError> {
    require("VTG", fields, VTG_MIN_FIELDS)?;

    Ok(VtgRecord {
        true_track: number("VTG", fields, 1),
        t: text(fields, 2),
        magnetic_track: number("VTG", fields, 3),
        m: text(fields, 4),
        speed_knots: number("VTG", fields, 5),
        n: text(fields, 6),
        speed_kmh: number("VTG", fields, 7),
        k: text(fields, 8),
        mode: text(fields, 9),
    })
}

/// Parse GSV (Satellites in View) sentence
fn parse_gsv(fields: &[&str]) -> Result<GsvMessage, SentenceError> {
    require("GSV", fields, GSV_MIN_FIELDS)?;

    let total_messages = integer("GSV", fields, 1)?;
    let message_num = integer("GSV", fields, 2)?;
    let satellites_in_view = integer("GSV", fields, 3)?;

    // Up to 4 satellites per message, 4 fields each
    let mut satellites = Vec::with_capacity(GSV_SATELLITES_PER_MESSAGE);
    for slot in 0..GSV_SATELLITES_PER_MESSAGE {
        let idx = 4 + slot * 4;
        if fields.len() <= idx + 3 || fields[idx].is_empty() {
            continue;
        }

        // A satellite without a usable PRN has no identity, the rest of the message still counts
        let Some(prn) = number("GSV", fields, idx) else {
            continue;
        };
        let mut sat_info = SatelliteInfo::new(prn);
        sat_info.elevation = number("GSV", fields, idx + 1);
        sat_info.azimuth = number("GSV", fields, idx + 2);
        // SNR is empty while the satellite is not tracked
        sat_info.snr = number("GSV", fields, idx + 3);
        satellites.push(sat_info);
    }

    Ok(GsvMessage {
        total_messages,
        message_num,
        satellites_in_view,
        satellites,
    })
}

fn require(kind: &'static str, fields: &[&str], expected: usize) -> Result<(), SentenceError> {
    if fields.len() < expected {
        return Err(SentenceError::TooFewFields {
            kind,
            expected,
            found: fields.len(),
        });
    }
    Ok(())
}

/// Non-empty text field, `None` when empty or beyond the end of the sentence
fn text(fields: &[&str], index: usize) -> Option<String> {
    fields
        .get(index)
        .filter(|value| !value.is_empty())
        .map(|value| value.to_string())
}

/// Optional numeric field. Empty, absent and unparseable all read as `None`
fn number<T: FromStr>(kind: &'static str, fields: &[&str], index: usize) -> Option<T> {
    let value = fields.get(index).filter(|value| !value.is_empty())?;
    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            log::debug!("Ignoring non-numeric {} field {}: {:?}", kind, index, value);
            None
        }
    }
}

/// Mandatory numeric field, the sentence is void without it
fn integer<T: FromStr>(kind: &'static str, fields: &[&str], index: usize) -> Result<T, SentenceError> {
    let value = fields.get(index).copied().unwrap_or_default();
    value.parse().map_err(|_| SentenceError::InvalidField {
        kind,
        index,
        value: value.to_string(),
    })
}
