//! Timestamped samples emitted by collector workers.

use std::fmt;

/// Which worker produced a sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SampleSource {
    /// Rolling-hash CPU loop.
    Cpu,
    /// Randomized read-modify-write over a large buffer.
    Memory,
    /// Temp-file write/sync/read round trip.
    Io,
    /// Fallback emitted when the IO round trip failed.
    IoError,
}

impl SampleSource {
    /// One-byte tag written ahead of the sample when serialized.
    pub fn tag(self) -> u8 {
        match self {
            SampleSource::Cpu => 0x01,
            SampleSource::Memory => 0x02,
            SampleSource::Io => 0x03,
            SampleSource::IoError => 0x04,
        }
    }
}

impl fmt::Display for SampleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SampleSource::Cpu => "cpu",
            SampleSource::Memory => "memory",
            SampleSource::Io => "io",
            SampleSource::IoError => "io_error",
        };
        f.write_str(name)
    }
}

/// One observation from a worker. Immutable once sent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntropySample {
    pub source: SampleSource,
    /// Iteration count, buffer index or other per-worker sequence marker.
    pub marker: u64,
    /// Nanoseconds since the collector's start instant.
    pub timestamp_ns: u64,
    pub payload: Vec<u8>,
}

impl EntropySample {
    pub fn new(source: SampleSource, marker: u64, timestamp_ns: u64, payload: Vec<u8>) -> Self {
        Self {
            source,
            marker,
            timestamp_ns,
            payload,
        }
    }

    /// Append `tag || marker (BE) || timestamp (BE) || payload` to `buf`.
    pub fn write_to(&self, buf: &mut Vec<u8>) {
        buf.push(self.source.tag());
        buf.extend_from_slice(&self.marker.to_be_bytes());
        buf.extend_from_slice(&self.timestamp_ns.to_be_bytes());
        buf.extend_from_slice(&self.payload);
    }

    /// Length of the serialized form.
    pub fn serialized_len(&self) -> usize {
        1 + 8 + 8 + self.payload.len()
    }
}
