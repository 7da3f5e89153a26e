// src/gps/store.rs
//! Latest reading per sentence type

use super::data::{GgaRecord, RmcRecord, SatelliteView, SatelliteViewSet, VtgRecord};
use super::nmea::Sentence;

/// One slot per supported sentence type, empty until the first valid sentence
#[derive(Debug, Clone, Default)]
pub struct LatestReadingStore {
    gga: Option<GgaRecord>,
    rmc: Option<RmcRecord>,
    vtg: Option<VtgRecord>,
    gsv: Option<SatelliteViewSet>,
}

impl LatestReadingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commit a parsed sentence.
    ///
    /// GSV message 1 (or the first GSV ever seen) starts a new satellite set,
    /// later messages append to it.
    pub fn apply(&mut self, sentence: Sentence) {
        match sentence {
            Sentence::Gga(record) => self.gga = Some(record),
            Sentence::Rmc(record) => self.rmc = Some(record),
            Sentence::Vtg(record) => self.vtg = Some(record),
            Sentence::Gsv(message) => match &mut self.gsv {
                Some(set) if message.message_num != 1 => set.extend(message),
                slot => *slot = Some(SatelliteViewSet::from_message(message)),
            },
        }
    }

    pub fn gga(&self) -> Option<&GgaRecord> {
        self.gga.as_ref()
    }

    pub fn rmc(&self) -> Option<&RmcRecord> {
        self.rmc.as_ref()
    }

    pub fn vtg(&self) -> Option<&VtgRecord> {
        self.vtg.as_ref()
    }

    pub fn gsv(&self) -> Option<&SatelliteViewSet> {
        self.gsv.as_ref()
    }

    /// Satellites in view and the accumulated satellite list
    pub fn satellites(&self) -> Option<SatelliteView> {
        self.gsv.as_ref().map(|gsv| SatelliteView {
            satellites_in_view: gsv.satellites_in_view,
            satellites: gsv.satellites.clone(),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.gga.is_none() && self.rmc.is_none() && self.vtg.is_none() && self.gsv.is_none()
    }
}
