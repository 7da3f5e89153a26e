// src/monitor.rs
//! Background polling of a GPS decoder shared with display code

use crate::{
    error::Result,
    gps::{
        data::GpsSnapshot,
        decoder::{DecoderStats, GpsDecoder},
        source::{MemorySource, NmeaSource, SerialSource},
    },
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc, Mutex, MutexGuard, PoisonError,
    },
    time::Duration,
};
use tokio::{sync::broadcast, task::JoinHandle};

/// Updates a slow subscriber may fall behind by before it starts losing them
const UPDATE_CHANNEL_CAPACITY: usize = 64;

pub type BoxedSource = Box<dyn NmeaSource + Send>;

/// GPS data source configuration
#[derive(Debug, Clone)]
pub enum GpsSource {
    Serial { port: String, baudrate: u32 },
    Replay { path: PathBuf },
}

impl GpsSource {
    pub fn open(&self) -> Result<BoxedSource> {
        match self {
            GpsSource::Serial { port, baudrate } => Ok(Box::new(SerialSource::open(port, *baudrate)?)),
            GpsSource::Replay { path } => {
                log::info!("Replaying NMEA capture {}", path.display());
                Ok(Box::new(MemorySource::from_file(path)?))
            }
        }
    }
}

/// What the monitor publishes to readers
#[derive(Debug, Clone, Serialize)]
pub struct MonitorSnapshot {
    pub last_update: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub data: GpsSnapshot,
    pub stats: DecoderStats,
    pub updates: u64,
}

struct MonitorState {
    decoder: GpsDecoder<BoxedSource>,
    last_update: Option<DateTime<Utc>>,
}

/// Polls a decoder on a tokio task; all decoder access goes through one lock
#[derive(Clone)]
pub struct GpsMonitor {
    state: Arc<Mutex<MonitorState>>,
    running: Arc<AtomicBool>,
    updates: Arc<AtomicU64>,
    update_tx: broadcast::Sender<GpsSnapshot>,
}

impl GpsMonitor {
    pub fn new(source: BoxedSource) -> Self {
        let (update_tx, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        Self {
            state: Arc::new(Mutex::new(MonitorState {
                decoder: GpsDecoder::new(source),
                last_update: None,
            })),
            running: Arc::new(AtomicBool::new(true)),
            updates: Arc::new(AtomicU64::new(0)),
            update_tx,
        }
    }

    /// Open the configured source and wrap it in a monitor
    pub fn open(source: &GpsSource) -> Result<Self> {
        Ok(Self::new(source.open()?))
    }

    fn lock(&self) -> MutexGuard<'_, MonitorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run one decoder update under the lock.
    ///
    /// Every update that produced new data is published to subscribers.
    pub fn poll(&self) -> bool {
        let mut state = self.lock();
        let new_data = state.decoder.update();
        if new_data {
            state.last_update = Some(Utc::now());
            self.updates.fetch_add(1, Ordering::Relaxed);
            if self.update_tx.receiver_count() > 0 {
                // Only fails when every receiver has gone away in the meantime
                let _ = self.update_tx.send(state.decoder.get_all_data());
            }
        }
        new_data
    }

    /// Receive one `GpsSnapshot` per successful update from now on
    pub fn subscribe(&self) -> broadcast::Receiver<GpsSnapshot> {
        self.update_tx.subscribe()
    }

    /// Poll every `interval` until stopped
    pub fn start(&self, interval: Duration) -> JoinHandle<()> {
        let monitor = self.clone();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

            while monitor.is_running() {
                ticker.tick().await;
                monitor.poll();
            }
            log::info!("GPS polling stopped");
        })
    }

    /// Stop the monitor
    pub fn stop(&self) {
        self.running.store(false, Ordering::Relaxed);
    }

    /// Check if the monitor is running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Number of polls that produced new data
    pub fn update_count(&self) -> u64 {
        self.updates.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> MonitorSnapshot {
        let state = self.lock();
        MonitorSnapshot {
            last_update: state.last_update,
            data: state.decoder.get_all_data(),
            stats: state.decoder.stats().clone(),
            updates: self.update_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gps::checksum::frame_sentence;

    /// Lets a test keep feeding a source the monitor already owns
    struct SharedSource(Arc<Mutex<MemorySource>>);

    impl NmeaSource for SharedSource {
        fn bytes_available(&mut self) -> Result<usize> {
            self.0.lock().unwrap().bytes_available()
        }

        fn read_available(&mut self) -> Result<Vec<u8>> {
            self.0.lock().unwrap().read_available()
        }
    }

    fn source_with(payloads: &[&str]) -> BoxedSource {
        let mut source = MemorySource::new();
        for payload in payloads {
            source.push_str(&format!("{}\r\n", frame_sentence(payload)));
        }
        Box::new(source)
    }

    #[test]
    fn test_poll_records_update() {
        let monitor = GpsMonitor::new(source_with(&[
            "GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W",
        ]));
        assert!(monitor.snapshot().last_update.is_none());

        assert!(monitor.poll());
        assert!(!monitor.poll());
        assert_eq!(monitor.update_count(), 1);

        let snapshot = monitor.snapshot();
        assert!(snapshot.last_update.is_some());
        assert!(snapshot.data.location.is_some());
        assert_eq!(snapshot.stats.sentences_parsed, 1);
        assert_eq!(snapshot.updates, 1);
    }

    #[test]
    fn test_snapshot_json_is_flat() {
        let monitor = GpsMonitor::new(source_with(&["GPGSV,1,1,01,07,40,083,46"]));
        monitor.poll();
        let json = serde_json::to_value(monitor.snapshot()).unwrap();
        assert_eq!(json["satellites"]["satellites_in_view"], 1);
        assert_eq!(json["stats"]["sentences_parsed"], 1);
    }

    #[test]
    fn test_subscriber_gets_every_update() {
        let shared = Arc::new(Mutex::new(MemorySource::new()));
        let monitor = GpsMonitor::new(Box::new(SharedSource(Arc::clone(&shared))));
        let mut updates = monitor.subscribe();

        for payload in [
            "GPVTG,054.7,T,034.4,M,005.5,N,010.2,K",
            "GPVTG,100.0,T,080.0,M,001.0,N,001.9,K",
        ] {
            shared
                .lock()
                .unwrap()
                .push_str(&format!("{}\r\n", frame_sentence(payload)));
            assert!(monitor.poll());
        }
        assert!(!monitor.poll());

        let first = updates.try_recv().unwrap();
        let second = updates.try_recv().unwrap();
        assert_eq!(first.vtg.unwrap().true_track, Some(54.7));
        assert_eq!(second.vtg.unwrap().true_track, Some(100.0));
        assert!(updates.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_background_polling() {
        let monitor = GpsMonitor::new(source_with(&[
            "GPGGA,123519,4807.038,N,01131.000,E,1,08,0.9,545.4,M,46.9,M,,",
        ]));
        let handle = monitor.start(Duration::from_millis(5));

        for _ in 0..100 {
            if monitor.update_count() > 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        monitor.stop();
        handle.await.unwrap();
        assert!(!monitor.is_running());
        assert_eq!(monitor.update_count(), 1);
        assert!(monitor.snapshot().data.gga.is_some());
    }

    #[test]
    fn test_replay_source_missing_file() {
        let source = GpsSource::Replay {
            path: PathBuf::from("/nonexistent/capture.nmea"),
        };
        assert!(GpsMonitor::open(&source).is_err());
    }
}
