//! Near-instantaneous entropy lanes.
//!
//! Each lane is produced by a fallible reader. A failed reader never fails
//! generation: [`Lane::or_random`] substitutes random bytes of the lane's
//! nominal width and records that it did so.
//!
//! Several of these lanes (environment, load, filesystem metadata) can be
//! observed by other processes on the same host. They are layered over the
//! OS RNG lane and contribute no unpredictability of their own.

use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use rand::{Rng, RngCore};
use sha2::{Digest, Sha256};
use sysinfo::{Disks, Networks, ProcessRefreshKind, ProcessesToUpdate, System};
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::constants::{DELAY_MAX_MICROS, DELAY_ROUNDS, DIGIT_BATCH_LEN, LANE_WIDTH};
use crate::error::SourceError;

/// Process-wide origin for the monotonic counter lanes.
static COUNTER_ORIGIN: OnceLock<Instant> = OnceLock::new();

/// One named byte string folded into the final entropy.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Lane {
    #[zeroize(skip)]
    name: &'static str,
    bytes: Vec<u8>,
    substituted: bool,
}

impl Lane {
    /// A lane with known-good bytes. Empty input is replaced with random bytes.
    pub fn new(name: &'static str, bytes: Vec<u8>) -> Self {
        if bytes.is_empty() {
            return Self::random(name, LANE_WIDTH);
        }
        Self {
            name,
            bytes,
            substituted: false,
        }
    }

    /// A lane made entirely of substituted random bytes.
    pub fn random(name: &'static str, width: usize) -> Self {
        Self {
            name,
            bytes: random_bytes(width.max(1)),
            substituted: true,
        }
    }

    /// Take the reader's bytes, or random bytes of `width` if it failed.
    pub fn or_random(name: &'static str, width: usize, result: Result<Vec<u8>, SourceError>) -> Self {
        match result {
            Ok(bytes) if !bytes.is_empty() => Self::new(name, bytes),
            Ok(_) => {
                debug!(lane = name, "entropy lane empty, substituting random bytes");
                Self::random(name, width)
            }
            Err(e) => {
                debug!(lane = name, error = %e, "entropy lane unavailable, substituting random bytes");
                Self::random(name, width)
            }
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Whether the reader failed and random bytes were used instead.
    pub fn is_substituted(&self) -> bool {
        self.substituted
    }
}

impl std::fmt::Debug for Lane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lane")
            .field("name", &self.name)
            .field("len", &self.bytes.len())
            .field("substituted", &self.substituted)
            .finish()
    }
}

/// Random bytes from the thread-local CSPRNG.
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes
}

/// First [`LANE_WIDTH`] bytes of SHA-256(`data`).
fn hash_lane(data: &[u8]) -> Vec<u8> {
    Sha256::digest(data)[..LANE_WIDTH].to_vec()
}

// -----------------------------------------------------------------------------
// Readers
// -----------------------------------------------------------------------------

/// Milliseconds since the Unix epoch.
pub fn wall_clock() -> Result<Vec<u8>, SourceError> {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|_| SourceError::Unavailable("system clock before epoch"))?
        .as_millis() as u64;
    Ok(millis.to_be_bytes().to_vec())
}

/// Nanoseconds on the process-wide monotonic counter.
pub fn perf_counter() -> Vec<u8> {
    let origin = COUNTER_ORIGIN.get_or_init(Instant::now);
    (origin.elapsed().as_nanos() as u64).to_be_bytes().to_vec()
}

/// CPU usage, run time, memory and IO counters of this process.
///
/// Advances with work done by the process rather than wall time, so it is
/// independent of [`perf_counter`].
pub fn process_cpu_time() -> Result<Vec<u8>, SourceError> {
    if !sysinfo::IS_SUPPORTED_SYSTEM {
        return Err(SourceError::Unavailable("process statistics unsupported"));
    }
    let pid = sysinfo::get_current_pid().map_err(SourceError::Unavailable)?;
    let mut sys = System::new();
    sys.refresh_processes_specifics(
        ProcessesToUpdate::Some(&[pid]),
        ProcessRefreshKind::new().with_cpu().with_memory().with_disk_usage(),
    );
    let process = sys
        .process(pid)
        .ok_or(SourceError::Unavailable("current process not listed"))?;

    let disk = process.disk_usage();
    let mut hasher = Sha256::new();
    hasher.update(process.run_time().to_be_bytes());
    hasher.update(process.cpu_usage().to_be_bytes());
    hasher.update(process.memory().to_be_bytes());
    hasher.update(process.virtual_memory().to_be_bytes());
    hasher.update(disk.total_read_bytes.to_be_bytes());
    hasher.update(disk.total_written_bytes.to_be_bytes());
    Ok(hasher.finalize()[..LANE_WIDTH].to_vec())
}

/// A direct draw from the operating system RNG.
pub fn os_random(len: usize) -> Result<Vec<u8>, SourceError> {
    let mut bytes = vec![0u8; len];
    rand::rngs::OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|_| SourceError::Unavailable("os rng"))?;
    Ok(bytes)
}

/// Hash of a long string of random decimal digits.
pub fn digit_batch() -> Vec<u8> {
    let mut rng = rand::thread_rng();
    let mut digits: Vec<u8> = (0..DIGIT_BATCH_LEN)
        .map(|_| b'0' + rng.gen_range(0..10u8))
        .collect();
    let lane = hash_lane(&digits);
    digits.zeroize();
    lane
}

/// Hostname plus every interface name and hardware address.
pub fn network_identity() -> Result<Vec<u8>, SourceError> {
    let mut hasher = Sha256::new();
    let mut found = false;

    if let Some(host) = System::host_name() {
        hasher.update(host.as_bytes());
        found = true;
    }
    let networks = Networks::new_with_refreshed_list();
    for (name, data) in &networks {
        hasher.update(name.as_bytes());
        hasher.update(data.mac_address().to_string().as_bytes());
        found = true;
    }

    if !found {
        return Err(SourceError::Unavailable("network identity"));
    }
    Ok(hasher.finalize()[..LANE_WIDTH].to_vec())
}

/// Static host description combined with current memory and load figures.
pub fn system_info() -> Result<Vec<u8>, SourceError> {
    if !sysinfo::IS_SUPPORTED_SYSTEM {
        return Err(SourceError::Unavailable("system info"));
    }
    let mut sys = System::new();
    sys.refresh_memory();

    let mut hasher = Sha256::new();
    hasher.update(System::kernel_version().unwrap_or_default().as_bytes());
    hasher.update(System::os_version().unwrap_or_default().as_bytes());
    hasher.update(System::boot_time().to_be_bytes());
    hasher.update(System::uptime().to_be_bytes());
    hasher.update(sys.total_memory().to_be_bytes());
    hasher.update(sys.used_memory().to_be_bytes());
    hasher.update(sys.used_swap().to_be_bytes());
    let load = System::load_average();
    for v in [load.one, load.five, load.fifteen] {
        hasher.update(v.to_bits().to_be_bytes());
    }
    Ok(hasher.finalize()[..LANE_WIDTH].to_vec())
}

/// Process id, executable path, working directory and thread identity.
pub fn process_info() -> Result<Vec<u8>, SourceError> {
    let pid = sysinfo::get_current_pid().map_err(SourceError::Unavailable)?;

    let mut hasher = Sha256::new();
    hasher.update(std::process::id().to_be_bytes());
    hasher.update(pid.to_string().as_bytes());
    if let Ok(exe) = std::env::current_exe() {
        hasher.update(exe.to_string_lossy().as_bytes());
    }
    if let Ok(dir) = std::env::current_dir() {
        hasher.update(dir.to_string_lossy().as_bytes());
    }
    hasher.update(format!("{:?}", std::thread::current().id()).as_bytes());
    Ok(hasher.finalize()[..LANE_WIDTH].to_vec())
}

/// Every environment variable, in iteration order.
pub fn environment() -> Result<Vec<u8>, SourceError> {
    let mut hasher = Sha256::new();
    let mut count = 0usize;
    for (key, value) in std::env::vars_os() {
        hasher.update(os_bytes(&key));
        hasher.update(b"=");
        hasher.update(os_bytes(&value));
        count += 1;
    }
    if count == 0 {
        return Err(SourceError::Unavailable("environment"));
    }
    Ok(hasher.finalize()[..LANE_WIDTH].to_vec())
}

fn os_bytes(s: &OsString) -> Vec<u8> {
    s.to_string_lossy().into_owned().into_bytes()
}

/// Cumulative measured durations of a series of short random sleeps.
///
/// Blocks for at most `DELAY_ROUNDS * DELAY_MAX_MICROS` plus scheduler slack.
pub fn delay_trace() -> Vec<u8> {
    let mut rng = rand::thread_rng();
    let mut cumulative = 0u64;
    let mut trace = Vec::with_capacity(DELAY_ROUNDS * 8);
    for _ in 0..DELAY_ROUNDS {
        let requested = Duration::from_micros(rng.gen_range(0..=DELAY_MAX_MICROS));
        let started = Instant::now();
        std::thread::sleep(requested);
        cumulative = cumulative.wrapping_add(started.elapsed().as_nanos() as u64);
        trace.extend_from_slice(&cumulative.to_be_bytes());
    }
    hash_lane(&trace)
}

/// Size and modification time of a few well-known directories.
pub fn filesystem_metadata() -> Result<Vec<u8>, SourceError> {
    let mut candidates: Vec<PathBuf> = vec![std::env::temp_dir()];
    if let Ok(dir) = std::env::current_dir() {
        candidates.push(dir);
    }
    if let Some(home) = std::env::var_os("HOME") {
        candidates.push(PathBuf::from(home));
    }

    let mut hasher = Sha256::new();
    let mut found = false;
    for path in &candidates {
        let Ok(meta) = std::fs::metadata(path) else {
            continue;
        };
        hasher.update(path.to_string_lossy().as_bytes());
        hasher.update(meta.len().to_be_bytes());
        if let Ok(modified) = meta.modified() {
            let nanos = modified
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_nanos() as u64)
                .unwrap_or_default();
            hasher.update(nanos.to_be_bytes());
        }
        #[cfg(unix)]
        {
            use std::os::unix::fs::MetadataExt;
            hasher.update(meta.ino().to_be_bytes());
            hasher.update(meta.dev().to_be_bytes());
        }
        found = true;
    }

    if !found {
        return Err(SourceError::Unavailable("filesystem metadata"));
    }
    Ok(hasher.finalize()[..LANE_WIDTH].to_vec())
}

/// Coarse system load: load average, memory, disk space and network counters.
///
/// Any figure that cannot be read is skipped; the result may be empty.
pub fn system_load_snapshot() -> Vec<u8> {
    let mut out = Vec::with_capacity(128);
    if !sysinfo::IS_SUPPORTED_SYSTEM {
        return out;
    }

    let load = System::load_average();
    for v in [load.one, load.five, load.fifteen] {
        out.extend_from_slice(&v.to_bits().to_be_bytes());
    }

    let mut sys = System::new();
    sys.refresh_memory();
    out.extend_from_slice(&sys.used_memory().to_be_bytes());
    out.extend_from_slice(&sys.free_memory().to_be_bytes());

    let disks = Disks::new_with_refreshed_list();
    for disk in disks.list() {
        out.extend_from_slice(&disk.available_space().to_be_bytes());
    }

    let networks = Networks::new_with_refreshed_list();
    for (_, data) in &networks {
        out.extend_from_slice(&data.total_received().to_be_bytes());
        out.extend_from_slice(&data.total_transmitted().to_be_bytes());
    }
    out
}
