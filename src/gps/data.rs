// src/gps/data.rs
//! GPS data structures and utilities

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SatelliteInfo {
    pub prn: u16,                // Satellite PRN/ID number
    pub elevation: Option<f32>,  // Elevation angle in degrees
    pub azimuth: Option<f32>,    // Azimuth angle in degrees
    pub snr: Option<f32>,        // Signal-to-noise ratio in dB
}

impl SatelliteInfo {
    pub fn new(prn: u16) -> Self {
        Self {
            prn,
            elevation: None,
            azimuth: None,
            snr: None,
        }
    }

    /// Constellation guessed from the NMEA PRN numbering ranges
    pub fn constellation(&self) -> &'static str {
        match self.prn {
            1..=32 => "GPS",
            33..=64 => "SBAS",
            65..=96 => "GLONASS",
            120..=163 => "BEIDOU",
            193..=197 => "QZSS",
            211..=246 => "GALILEO",
            _ => "UNKNOWN",
        }
    }

    pub fn signal_strength_description(&self) -> &'static str {
        match self.snr {
            Some(snr) if snr >= 40.0 => "Excellent",
            Some(snr) if snr >= 35.0 => "Good",
            Some(snr) if snr >= 25.0 => "Fair",
            Some(snr) if snr >= 15.0 => "Poor",
            Some(_) => "Very Poor",
            None => "Unknown",
        }
    }
}

/// GGA: Global Positioning System Fix Data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GgaRecord {
    pub timestamp: Option<String>,
    pub latitude: Option<String>,
    pub lat_direction: Option<String>,
    pub longitude: Option<String>,
    pub lon_direction: Option<String>,
    pub fix_quality: Option<u8>,
    pub num_satellites: Option<u8>,
    pub hdop: Option<f64>,
    pub altitude: Option<f64>,
    pub altitude_units: Option<String>,
    pub geoid_separation: Option<f64>,
    pub geoid_units: Option<String>,
    pub age_dgps: Option<f64>,
    pub dgps_id: Option<String>,
}

impl GgaRecord {
    /// Only an explicit `0` marks the fix invalid; an empty code still counts
    pub fn has_fix(&self) -> bool {
        self.fix_quality != Some(0)
    }

    /// Get fix type description
    pub fn fix_description(&self) -> String {
        match self.fix_quality {
            Some(0) => "No fix".to_string(),
            Some(1) => "GPS".to_string(),
            Some(2) => "DGPS".to_string(),
            Some(3) => "PPS".to_string(),
            Some(4) => "RTK".to_string(),
            Some(5) => "Float RTK".to_string(),
            Some(6) => "Estimated".to_string(),
            Some(7) => "Manual".to_string(),
            Some(8) => "Simulation".to_string(),
            Some(quality) => format!("Unknown ({})", quality),
            None => "Unknown".to_string(),
        }
    }
}

/// RMC: Recommended Minimum Specific GNSS Data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RmcRecord {
    pub timestamp: Option<String>,
    pub status: Option<String>,
    pub latitude: Option<String>,
    pub lat_direction: Option<String>,
    pub longitude: Option<String>,
    pub lon_direction: Option<String>,
    pub speed_knots: Option<f64>,
    pub true_course: Option<f64>,
    pub date: Option<String>,
    pub magnetic_variation: Option<f64>,
    pub variation_direction: Option<String>,
    pub mode_indicator: Option<String>,
}

impl RmcRecord {
    pub const STATUS_ACTIVE: &'static str = "A";

    pub fn is_active(&self) -> bool {
        self.status.as_deref() == Some(Self::STATUS_ACTIVE)
    }

    /// Combine `hhmmss(.sss)` and `ddmmyy` into a UTC timestamp
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        let time = parse_utc_time(self.timestamp.as_deref()?)?;
        let date = parse_utc_date(self.date.as_deref()?)?;
        Some(date.and_time(time).and_utc())
    }
}

/// VTG: Course Over Ground and Ground Speed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VtgRecord {
    pub true_track: Option<f64>,
    pub t: Option<String>,
    pub magnetic_track: Option<f64>,
    pub m: Option<String>,
    pub speed_knots: Option<f64>,
    pub n: Option<String>,
    pub speed_kmh: Option<f64>,
    pub k: Option<String>,
    pub mode: Option<String>,
}

/// One GSV message as it came off the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GsvMessage {
    pub total_messages: u8,
    pub message_num: u8,
    pub satellites_in_view: u8,
    pub satellites: Vec<SatelliteInfo>,
}

/// Satellites accumulated across the messages of a GSV group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SatelliteViewSet {
    pub total_messages: u8,
    pub satellites_in_view: u8,
    pub satellites: Vec<SatelliteInfo>,
}

impl SatelliteViewSet {
    /// Start a new group from its first message
    pub fn from_message(message: GsvMessage) -> Self {
        Self {
            total_messages: message.total_messages,
            satellites_in_view: message.satellites_in_view,
            satellites: message.satellites,
        }
    }

    /// Append the satellites of a follow-up message
    pub fn extend(&mut self, message: GsvMessage) {
        self.satellites.extend(message.satellites);
    }
}

/// Which sentence type a location was derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FixSource {
    Rmc,
    Gga,
}

impl FixSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            FixSource::Rmc => "RMC",
            FixSource::Gga => "GGA",
        }
    }
}

/// Best available position, derived on demand from the cached records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSummary {
    pub source: FixSource,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timestamp: Option<String>,
    pub date: Option<String>,
    pub speed: Option<f64>, // knots
    pub altitude: Option<f64>,
    pub direction_degrees: Option<f64>,
}

impl LocationSummary {
    /// Format coordinate for display
    pub fn format_coordinate(coord: Option<f64>) -> String {
        match coord {
            Some(val) => format!("{:>12.6}°", val),
            None => "No fix".to_string(),
        }
    }

    /// Format value with unit for display
    pub fn format_value<T: std::fmt::Display>(value: Option<T>, unit: &str) -> String {
        match value {
            Some(val) => format!("{:>12} {}", val, unit),
            None => "Unknown".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SatelliteView {
    pub satellites_in_view: u8,
    pub satellites: Vec<SatelliteInfo>,
}

/// Everything the decoder currently knows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GpsSnapshot {
    pub location: Option<LocationSummary>,
    pub satellites: Option<SatelliteView>,
    pub gga: Option<GgaRecord>,
    pub rmc: Option<RmcRecord>,
    pub vtg: Option<VtgRecord>,
    pub gsv: Option<SatelliteViewSet>,
}

fn parse_utc_time(value: &str) -> Option<NaiveTime> {
    let (whole, fraction) = value.split_once('.').unwrap_or((value, ""));
    if whole.len() != 6 || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let hour = whole[0..2].parse().ok()?;
    let minute = whole[2..4].parse().ok()?;
    let second = whole[4..6].parse().ok()?;
    let millis = if fraction.is_empty() {
        0
    } else {
        let digits: String = fraction.chars().chain("000".chars()).take(3).collect();
        digits.parse().ok()?
    };
    NaiveTime::from_hms_milli_opt(hour, minute, second, millis)
}

fn parse_utc_date(value: &str) -> Option<NaiveDate> {
    if value.len() != 6 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let day = value[0..2].parse().ok()?;
    let month = value[2..4].parse().ok()?;
    let year: i32 = value[4..6].parse().ok()?;
    let century = if year < 80 { 2000 } else { 1900 };
    NaiveDate::from_ymd_opt(century + year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn gsv(message_num: u8, prns: &[u16]) -> GsvMessage {
        GsvMessage {
            total_messages: 3,
            message_num,
            satellites_in_view: 11,
            satellites: prns.iter().copied().map(SatelliteInfo::new).collect(),
        }
    }

    #[test]
    fn test_rmc_datetime() {
        let rmc = RmcRecord {
            timestamp: Some("123519.25".to_string()),
            status: Some("A".to_string()),
            latitude: None,
            lat_direction: None,
            longitude: None,
            lon_direction: None,
            speed_knots: None,
            true_course: None,
            date: Some("230394".to_string()),
            magnetic_variation: None,
            variation_direction: None,
            mode_indicator: None,
        };
        let dt = rmc.datetime().unwrap();
        assert_eq!((dt.year(), dt.month(), dt.day()), (1994, 3, 23));
        assert_eq!((dt.hour(), dt.minute(), dt.second()), (12, 35, 19));
        assert_eq!(dt.timestamp_subsec_millis(), 250);

        let broken = RmcRecord { date: Some("991399".to_string()), ..rmc };
        assert!(broken.datetime().is_none());
    }

    #[test]
    fn test_constellation_ranges() {
        assert_eq!(SatelliteInfo::new(5).constellation(), "GPS");
        assert_eq!(SatelliteInfo::new(70).constellation(), "GLONASS");
        assert_eq!(SatelliteInfo::new(300).constellation(), "UNKNOWN");
    }

    #[test]
    fn test_signal_strength() {
        let mut sat = SatelliteInfo::new(1);
        assert_eq!(sat.signal_strength_description(), "Unknown");
        sat.snr = Some(42.0);
        assert_eq!(sat.signal_strength_description(), "Excellent");
        sat.snr = Some(10.0);
        assert_eq!(sat.signal_strength_description(), "Very Poor");
    }

    #[test]
    fn test_view_set_extend() {
        let mut set = SatelliteViewSet::from_message(gsv(1, &[1, 2]));
        set.extend(gsv(2, &[3]));
        let prns: Vec<u16> = set.satellites.iter().map(|s| s.prn).collect();
        assert_eq!(prns, vec![1, 2, 3]);
        assert_eq!(set.total_messages, 3);
        assert_eq!(set.satellites_in_view, 11);
    }

    #[test]
    fn test_gga_fix_description() {
        let mut gga = GgaRecord {
            timestamp: None,
            latitude: None,
            lat_direction: None,
            longitude: None,
            lon_direction: None,
            fix_quality: Some(2),
            num_satellites: None,
            hdop: None,
            altitude: None,
            altitude_units: None,
            geoid_separation: None,
            geoid_units: None,
            age_dgps: None,
            dgps_id: None,
        };
        assert_eq!(gga.fix_description(), "DGPS");
        assert!(gga.has_fix());
        gga.fix_quality = Some(0);
        assert!(!gga.has_fix());
        gga.fix_quality = None;
        assert!(gga.has_fix());
        assert_eq!(gga.fix_description(), "Unknown");
    }
}
