// src/gps/location.rs
//! Best available fix and coordinate conversion

use super::data::{FixSource, LocationSummary};
use super::store::LatestReadingStore;

/// Convert an NMEA `DDMM.MMMM` / `DDDMM.MMMM` angle to signed decimal degrees.
///
/// `N`/`S` select a two digit degree prefix, anything else three digits.
/// Missing or malformed input gives `None`.
pub fn to_decimal_degrees(value: &str, direction: &str) -> Option<f64> {
    if value.is_empty() || direction.is_empty() {
        return None;
    }

    let split = if matches!(direction, "N" | "S") { 2 } else { 3 };
    let degrees: f64 = value.get(..split)?.parse().ok()?;
    let minutes: f64 = value.get(split..)?.parse().ok()?;
    if !degrees.is_finite() || !minutes.is_finite() {
        return None;
    }

    let decimal = degrees + minutes / 60.0;
    if matches!(direction, "S" | "W") {
        Some(-decimal)
    } else {
        Some(decimal)
    }
}

fn convert(value: Option<&String>, direction: Option<&String>) -> Option<f64> {
    to_decimal_degrees(value?, direction?)
}

/// Heading from VTG true track, falling back to RMC true course
pub fn resolve_heading(store: &LatestReadingStore) -> Option<f64> {
    store
        .vtg()
        .and_then(|vtg| vtg.true_track)
        .or_else(|| store.rmc().and_then(|rmc| rmc.true_course))
}

/// Derive the best location from the cached records.
///
/// An active RMC wins, then a GGA with a non-zero fix quality.
pub fn resolve_location(store: &LatestReadingStore) -> Option<LocationSummary> {
    let direction = resolve_heading(store);

    if let Some(rmc) = store.rmc().filter(|rmc| rmc.is_active()) {
        return Some(LocationSummary {
            source: FixSource::Rmc,
            latitude: convert(rmc.latitude.as_ref(), rmc.lat_direction.as_ref()),
            longitude: convert(rmc.longitude.as_ref(), rmc.lon_direction.as_ref()),
            timestamp: rmc.timestamp.clone(),
            date: rmc.date.clone(),
            speed: rmc.speed_knots,
            altitude: None,
            direction_degrees: direction,
        });
    }

    if let Some(gga) = store.gga().filter(|gga| gga.has_fix()) {
        return Some(LocationSummary {
            source: FixSource::Gga,
            latitude: convert(gga.latitude.as_ref(), gga.lat_direction.as_ref()),
            longitude: convert(gga.longitude.as_ref(), gga.lon_direction.as_ref()),
            timestamp: gga.timestamp.clone(),
            date: None,
            speed: None,
            altitude: gga.altitude,
            direction_degrees: direction,
        });
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gps::checksum::frame_sentence;
    use crate::gps::nmea::parse_nmea_sentence;

    const RMC_ACTIVE: &str = "GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W";
    const RMC_VOID: &str = "GPRMC,123519,V,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W";
    const GGA_FIX: &str = "GPGGA,123520,3345.000,S,15112.000,E,1,08,0.9,545.4,M,46.9,M,,";
    const GGA_NO_FIX: &str = "GPGGA,123520,3345.000,S,15112.000,E,0,00,,,M,,M,,";

    fn store_with(payloads: &[&str]) -> LatestReadingStore {
        let mut store = LatestReadingStore::new();
        for payload in payloads {
            store.apply(parse_nmea_sentence(&frame_sentence(payload)).unwrap());
        }
        store
    }

    #[test]
    fn test_decimal_conversion() {
        let lat = to_decimal_degrees("4807.038", "N").unwrap();
        assert!((lat - 48.1173).abs() < 1e-4);

        let lon = to_decimal_degrees("01131.000", "W").unwrap();
        assert!((lon - -11.5167).abs() < 1e-4);

        let lat = to_decimal_degrees("3345.000", "S").unwrap();
        assert!((lat - -33.75).abs() < 1e-9);
    }

    #[test]
    fn test_decimal_conversion_malformed() {
        assert_eq!(to_decimal_degrees("", "N"), None);
        assert_eq!(to_decimal_degrees("4807.038", ""), None);
        assert_eq!(to_decimal_degrees("48", "N"), None);
        assert_eq!(to_decimal_degrees("ab07.038", "N"), None);
        assert_eq!(to_decimal_degrees("48xx.038", "N"), None);
        assert_eq!(to_decimal_degrees("4°07.038", "N"), None);
    }

    #[test]
    fn test_rmc_preferred_over_gga() {
        let store = store_with(&[GGA_FIX, RMC_ACTIVE]);
        let location = resolve_location(&store).unwrap();

        assert_eq!(location.source, FixSource::Rmc);
        assert!((location.latitude.unwrap() - 48.1173).abs() < 1e-4);
        assert!((location.longitude.unwrap() - 11.5167).abs() < 1e-4);
        assert_eq!(location.date.as_deref(), Some("230394"));
        assert_eq!(location.speed, Some(22.4));
        assert_eq!(location.direction_degrees, Some(84.4));
    }

    #[test]
    fn test_gga_fallback() {
        let store = store_with(&[GGA_FIX]);
        let location = resolve_location(&store).unwrap();

        assert_eq!(location.source, FixSource::Gga);
        assert!((location.latitude.unwrap() - -33.75).abs() < 1e-9);
        assert_eq!(location.altitude, Some(545.4));
        assert_eq!(location.timestamp.as_deref(), Some("123520"));
        assert_eq!(location.direction_degrees, None);

        let store = store_with(&[RMC_VOID, GGA_FIX]);
        assert_eq!(resolve_location(&store).unwrap().source, FixSource::Gga);
    }

    #[test]
    fn test_no_location_without_valid_fix() {
        let store = store_with(&[RMC_VOID, GGA_NO_FIX]);
        assert!(resolve_location(&store).is_none());
        assert!(resolve_location(&LatestReadingStore::new()).is_none());
    }

    #[test]
    fn test_gga_with_empty_fix_quality_gives_location() {
        let store = store_with(&["GPGGA,123519,4807.038,N,01131.000,E,,08,0.9,545.4,M,46.9,M,,"]);
        let location = resolve_location(&store).unwrap();

        assert_eq!(location.source, FixSource::Gga);
        assert!((location.latitude.unwrap() - 48.1173).abs() < 1e-4);
        assert!((location.longitude.unwrap() - 11.5167).abs() < 1e-4);
    }

    #[test]
    fn test_heading_prefers_vtg() {
        let store = store_with(&[RMC_ACTIVE, "GPVTG,054.7,T,034.4,M,005.5,N,010.2,K"]);
        assert_eq!(resolve_heading(&store), Some(54.7));

        let store = store_with(&[RMC_ACTIVE, "GPVTG,,T,,M,0.0,N,0.0,K"]);
        assert_eq!(resolve_heading(&store), Some(84.4));
    }
}
