// src/gps/source.rs
//! Byte sources the decoder can poll

use crate::error::{GpsError, Result};
use std::{collections::VecDeque, io::Read, path::Path, time::Duration};

/// Default UART speed of most NMEA receivers
pub const DEFAULT_BAUDRATE: u32 = 9600;

/// A readable byte stream that never blocks waiting for data
pub trait NmeaSource {
    /// Number of bytes that can be read right now
    fn bytes_available(&mut self) -> Result<usize>;

    /// Read whatever is currently available, possibly nothing
    fn read_available(&mut self) -> Result<Vec<u8>>;
}

impl<S: NmeaSource + ?Sized> NmeaSource for Box<S> {
    fn bytes_available(&mut self) -> Result<usize> {
        (**self).bytes_available()
    }

    fn read_available(&mut self) -> Result<Vec<u8>> {
        (**self).read_available()
    }
}

/// In-memory FIFO, used for tests and for replaying captured logs
#[derive(Debug, Default)]
pub struct MemorySource {
    pending: VecDeque<u8>,
    chunk_size: Option<usize>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out at most `chunk_size` bytes per read, like a UART FIFO would
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            pending: VecDeque::new(),
            chunk_size: Some(chunk_size.max(1)),
        }
    }

    /// Load a captured NMEA log from disk
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| {
            GpsError::Connection(format!("Failed to read replay file {}: {}", path.display(), e))
        })?;
        let mut source = Self::new();
        source.push(&bytes);
        Ok(source)
    }

    pub fn push(&mut self, bytes: &[u8]) {
        self.pending.extend(bytes);
    }

    pub fn push_str(&mut self, text: &str) {
        self.push(text.as_bytes());
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl NmeaSource for MemorySource {
    fn bytes_available(&mut self) -> Result<usize> {
        Ok(self.pending.len())
    }

    fn read_available(&mut self) -> Result<Vec<u8>> {
        let count = match self.chunk_size {
            Some(size) => size.min(self.pending.len()),
            None => self.pending.len(),
        };
        Ok(self.pending.drain(..count).collect())
    }
}

/// Serial port opened in blocking mode, only read when the driver has data
pub struct SerialSource {
    port: Box<dyn tokio_serial::SerialPort>,
    name: String,
}

impl SerialSource {
    pub fn open(port: &str, baudrate: u32) -> Result<Self> {
        log::info!("Opening GPS serial port {} at {} baud", port, baudrate);

        let serial = tokio_serial::new(port, baudrate)
            .timeout(Duration::from_millis(1000))
            .open()
            .map_err(|e| GpsError::Connection(format!("Failed to open serial port {}: {}", port, e)))?;

        Ok(Self {
            port: serial,
            name: port.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl NmeaSource for SerialSource {
    fn bytes_available(&mut self) -> Result<usize> {
        Ok(self.port.bytes_to_read()? as usize)
    }

    fn read_available(&mut self) -> Result<Vec<u8>> {
        let available = self.bytes_available()?;
        let mut buf = vec![0u8; available];
        let read = self.port.read(&mut buf)?;
        buf.truncate(read);
        Ok(buf)
    }
}

/// Name and type of each serial port on this machine
pub fn list_serial_ports() -> Result<Vec<(String, String)>> {
    let ports = tokio_serial::available_ports()
        .map_err(|e| GpsError::Other(format!("Failed to list serial ports: {}", e)))?;

    Ok(ports
        .into_iter()
        .map(|port| (port.port_name, format!("{:?}", port.port_type)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_source_drains_everything() {
        let mut source = MemorySource::new();
        assert_eq!(source.bytes_available().unwrap(), 0);
        assert!(source.read_available().unwrap().is_empty());

        source.push_str("$GPGGA");
        assert_eq!(source.bytes_available().unwrap(), 6);
        assert_eq!(source.read_available().unwrap(), b"$GPGGA");
        assert!(source.is_empty());
    }

    #[test]
    fn test_memory_source_chunking() {
        let mut source = MemorySource::with_chunk_size(4);
        source.push(b"0123456789");
        assert_eq!(source.read_available().unwrap(), b"0123");
        assert_eq!(source.read_available().unwrap(), b"4567");
        assert_eq!(source.read_available().unwrap(), b"89");
        assert_eq!(source.bytes_available().unwrap(), 0);
    }

    #[test]
    fn test_boxed_source() {
        let mut memory = MemorySource::new();
        memory.push(b"abc");
        let mut boxed: Box<dyn NmeaSource + Send> = Box::new(memory);
        assert_eq!(boxed.bytes_available().unwrap(), 3);
        assert_eq!(boxed.read_available().unwrap(), b"abc");
    }

    #[test]
    fn test_missing_replay_file() {
        let result = MemorySource::from_file("/nonexistent/gps/capture.nmea");
        assert!(matches!(result, Err(GpsError::Connection(_))));
    }
}
