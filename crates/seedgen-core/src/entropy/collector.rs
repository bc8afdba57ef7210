//! Concurrent, deadline-bounded entropy collection.
//!
//! # Design
//!
//! `collect` spawns a small set of OS threads, each running one
//! [`WorkerKind`] loop and sending [`EntropySample`]s over an MPSC channel.
//! The calling thread drains the channel until it holds `max_samples`
//! samples, the budget expires, or every worker has hung up, whichever comes
//! first. It then raises a shared stop flag and gives the workers one grace
//! period to exit. The grace deadline is shared by all workers, not granted
//! per worker, so joining never takes longer than `join_grace` in total.
//! Workers still running at the deadline are detached.
//!
//! The automatic worker count is `min(8, 2 × available_parallelism)` raised
//! to at least 3. A single-core host therefore runs 3 workers rather than 2,
//! one of each [`WorkerKind`], so the IO worker always takes part.
//!
//! A detached worker owns nothing shared except its channel sender and the
//! stop flag. Once the receiver is dropped its next send fails and it
//! returns, so it can be safely ignored.

use std::io::{Read, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use rand::{Rng, RngCore};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};
use zeroize::Zeroize;

use crate::constants::{
    COLLECT_BUDGET, CPU_MAX_ITERATIONS, CPU_SAMPLE_INTERVAL, IO_BLOCK_LEN, IO_FALLBACK_LEN,
    JOIN_GRACE, MAX_SAMPLES, MAX_WORKERS, MEMORY_BUFFER_LEN, MEMORY_MAX_ACCESSES,
    MEMORY_SAMPLE_INTERVAL, MIN_WORKERS,
};
use crate::entropy::compress;
use crate::entropy::sample::{EntropySample, SampleSource};
use crate::entropy::sources::{random_bytes, system_load_snapshot};
use crate::error::SourceError;

/// The loop a collector worker runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WorkerKind {
    Cpu,
    Memory,
    Io,
}

impl WorkerKind {
    /// Round-robin role assignment: cpu, memory, io, then cpu for the rest.
    pub fn for_index(index: usize) -> Self {
        match index {
            1 => WorkerKind::Memory,
            2 => WorkerKind::Io,
            _ => WorkerKind::Cpu,
        }
    }

    fn name(self) -> &'static str {
        match self {
            WorkerKind::Cpu => "cpu",
            WorkerKind::Memory => "memory",
            WorkerKind::Io => "io",
        }
    }
}

/// Which workers a collection run spawns.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum WorkerPlan {
    /// `min(8, 2 × available parallelism)`, at least one of each kind.
    #[default]
    Auto,
    /// Exactly these workers. An empty list exercises the padding-only path.
    Exact(Vec<WorkerKind>),
}

impl WorkerPlan {
    /// The worker kinds this plan spawns, in spawn order.
    pub fn kinds(&self) -> Vec<WorkerKind> {
        match self {
            WorkerPlan::Auto => (0..auto_worker_count()).map(WorkerKind::for_index).collect(),
            WorkerPlan::Exact(kinds) => kinds.clone(),
        }
    }
}

/// Worker count for this host's available parallelism.
pub fn auto_worker_count() -> usize {
    let parallelism = thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    worker_count_for(parallelism)
}

/// `min(MAX_WORKERS, 2 × parallelism)`, raised to `MIN_WORKERS` so that every
/// worker kind runs even on one core.
fn worker_count_for(parallelism: usize) -> usize {
    parallelism
        .saturating_mul(2)
        .clamp(MIN_WORKERS, MAX_WORKERS)
}

/// Configuration for an [`EntropyCollector`].
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Wall-clock budget for draining the sample queue.
    pub budget: Duration,
    /// Stop draining after this many samples.
    pub max_samples: usize,
    /// Workers to spawn.
    pub workers: WorkerPlan,
    /// How long to wait for workers after raising the stop flag.
    pub join_grace: Duration,
    /// Directory for the IO worker's temp file (system temp dir if `None`).
    pub temp_dir: Option<PathBuf>,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            budget: COLLECT_BUDGET,
            max_samples: MAX_SAMPLES,
            workers: WorkerPlan::Auto,
            join_grace: JOIN_GRACE,
            temp_dir: None,
        }
    }
}

impl CollectorConfig {
    /// A config that spawns no workers; output is hashed random padding.
    pub fn padding_only() -> Self {
        Self {
            workers: WorkerPlan::Exact(Vec::new()),
            ..Self::default()
        }
    }
}

/// Outcome statistics of one collection run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CollectionReport {
    /// Workers successfully spawned.
    pub workers: usize,
    /// Workers still running after the grace period.
    pub abandoned: usize,
    /// Samples drained from the queue.
    pub samples: usize,
    /// Of which `io_error` fallbacks.
    pub io_errors: usize,
    /// Whether random padding was appended.
    pub padded: bool,
    /// Time from spawn to return.
    pub elapsed: Duration,
}

/// Spawns workers and folds their samples into a fixed-size output.
#[derive(Debug, Clone, Default)]
pub struct EntropyCollector {
    config: CollectorConfig,
}

impl EntropyCollector {
    pub fn new(config: CollectorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CollectorConfig {
        &self.config
    }

    /// Collect exactly `byte_count` bytes.
    pub fn collect(&self, byte_count: usize) -> Vec<u8> {
        self.collect_with_report(byte_count).0
    }

    /// [`collect`](Self::collect), also returning run statistics.
    pub fn collect_with_report(&self, byte_count: usize) -> (Vec<u8>, CollectionReport) {
        let started = Instant::now();
        let stop = Arc::new(AtomicBool::new(false));
        let (tx, rx) = mpsc::channel::<EntropySample>();

        let mut handles = Vec::new();
        for (id, kind) in self.config.workers.kinds().into_iter().enumerate() {
            let ctx = WorkerContext {
                id,
                tx: tx.clone(),
                stop: Arc::clone(&stop),
                origin: started,
                temp_dir: self.config.temp_dir.clone(),
            };
            let spawned = thread::Builder::new()
                .name(format!("entropy-{}-{id}", kind.name()))
                .spawn(move || run_worker(kind, ctx));
            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => warn!(worker = kind.name(), error = %e, "failed to spawn entropy worker"),
            }
        }
        // Only workers hold senders now; all of them exiting disconnects the queue.
        drop(tx);

        let deadline = started + self.config.budget;
        let mut samples = Vec::with_capacity(self.config.max_samples);
        while samples.len() < self.config.max_samples {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            match rx.recv_timeout(remaining) {
                Ok(sample) => samples.push(sample),
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        stop.store(true, Ordering::Relaxed);
        drop(rx);
        let workers = handles.len();
        let abandoned = join_within(handles, self.config.join_grace);

        let mut buffer = Vec::with_capacity(samples.iter().map(EntropySample::serialized_len).sum());
        for sample in &samples {
            sample.write_to(&mut buffer);
        }
        let min_len = byte_count.saturating_mul(2);
        let padded = buffer.len() < min_len;
        if padded {
            buffer.extend_from_slice(&random_bytes(min_len - buffer.len()));
        }
        let output = compress(&buffer, byte_count);
        buffer.zeroize();

        let report = CollectionReport {
            workers,
            abandoned,
            samples: samples.len(),
            io_errors: samples
                .iter()
                .filter(|s| s.source == SampleSource::IoError)
                .count(),
            padded,
            elapsed: started.elapsed(),
        };
        debug!(
            workers = report.workers,
            abandoned = report.abandoned,
            samples = report.samples,
            padded = report.padded,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "entropy collection finished"
        );
        (output, report)
    }
}

/// Join every handle before a shared deadline; return how many were detached.
fn join_within(handles: Vec<JoinHandle<()>>, grace: Duration) -> usize {
    let deadline = Instant::now() + grace;
    let mut abandoned = 0;
    for handle in handles {
        while !handle.is_finished() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(1));
        }
        if handle.is_finished() {
            if handle.join().is_err() {
                warn!("entropy worker panicked");
            }
        } else {
            abandoned += 1;
            warn!(
                thread = handle.thread().name().unwrap_or("entropy-worker"),
                "abandoning entropy worker"
            );
        }
    }
    abandoned
}

// -----------------------------------------------------------------------------
// Workers
// -----------------------------------------------------------------------------

struct WorkerContext {
    id: usize,
    tx: Sender<EntropySample>,
    stop: Arc<AtomicBool>,
    origin: Instant,
    temp_dir: Option<PathBuf>,
}

impl WorkerContext {
    fn stopped(&self) -> bool {
        self.stop.load(Ordering::Relaxed)
    }

    fn timestamp_ns(&self) -> u64 {
        self.origin.elapsed().as_nanos() as u64
    }

    /// Send a sample. Returns `false` once the collector has stopped listening.
    fn emit(&self, source: SampleSource, marker: u64, payload: Vec<u8>) -> bool {
        let sample = EntropySample::new(source, marker, self.timestamp_ns(), payload);
        self.tx.send(sample).is_ok()
    }
}

fn run_worker(kind: WorkerKind, ctx: WorkerContext) {
    match kind {
        WorkerKind::Cpu => cpu_worker(&ctx),
        WorkerKind::Memory => memory_worker(&ctx),
        WorkerKind::Io => io_worker(&ctx),
    }
}

/// Repeatedly hash a rolling buffer; sample the digest periodically.
fn cpu_worker(ctx: &WorkerContext) {
    let started = Instant::now();
    let mut buffer = [0u8; 64];
    rand::thread_rng().fill_bytes(&mut buffer);

    let mut iteration = 0u64;
    while iteration < CPU_MAX_ITERATIONS && !ctx.stopped() {
        let digest = Sha256::new()
            .chain_update(buffer)
            .chain_update(iteration.to_be_bytes())
            .finalize();
        buffer.copy_within(0..32, 32);
        buffer[..32].copy_from_slice(&digest);
        iteration += 1;

        if iteration % CPU_SAMPLE_INTERVAL == 0 {
            let mut payload = Vec::with_capacity(40);
            payload.extend_from_slice(&(ctx.id as u64).to_be_bytes());
            payload.extend_from_slice(&digest);
            if !ctx.emit(SampleSource::Cpu, iteration, payload) {
                buffer.zeroize();
                return;
            }
        }
    }

    let mut payload = Vec::with_capacity(16);
    payload.extend_from_slice(&(ctx.id as u64).to_be_bytes());
    payload.extend_from_slice(&(started.elapsed().as_nanos() as u64).to_be_bytes());
    ctx.emit(SampleSource::Cpu, iteration, payload);
    buffer.zeroize();
}

/// Randomized read-modify-write over a large buffer.
fn memory_worker(ctx: &WorkerContext) {
    let mut rng = rand::thread_rng();
    let mut buffer = vec![0u8; MEMORY_BUFFER_LEN];
    rng.fill_bytes(&mut buffer);

    let mut accesses = 0u64;
    while accesses < MEMORY_MAX_ACCESSES && !ctx.stopped() {
        let index = rng.gen_range(0..buffer.len());
        let value = buffer[index];
        buffer[index] = value.rotate_left(3) ^ rng.r#gen::<u8>();
        accesses += 1;

        if accesses % MEMORY_SAMPLE_INTERVAL == 0
            && !ctx.emit(SampleSource::Memory, index as u64, vec![value, buffer[index]])
        {
            break;
        }
    }
    buffer.zeroize();
}

/// Write, sync and read back a temp file; emit latency plus a load snapshot.
fn io_worker(ctx: &WorkerContext) {
    match write_read_probe(ctx) {
        Ok(payload) => {
            ctx.emit(SampleSource::Io, ctx.id as u64, payload);
        }
        Err(e) => {
            warn!(error = %e, "entropy IO probe failed, emitting fallback sample");
            let mut payload = random_bytes(IO_FALLBACK_LEN);
            payload.extend_from_slice(e.to_string().as_bytes());
            ctx.emit(SampleSource::IoError, ctx.id as u64, payload);
        }
    }
}

/// The temp file is a `NamedTempFile`, deleted when it drops on every path
/// out of this function.
fn write_read_probe(ctx: &WorkerContext) -> Result<Vec<u8>, SourceError> {
    let mut block = random_bytes(IO_BLOCK_LEN);

    let mut file = match &ctx.temp_dir {
        Some(dir) => tempfile::NamedTempFile::new_in(dir)?,
        None => tempfile::NamedTempFile::new()?,
    };
    file.write_all(&block)?;
    file.flush()?;
    file.as_file().sync_all()?;

    let started = Instant::now();
    let mut readback = Vec::with_capacity(IO_BLOCK_LEN);
    file.reopen()?.read_to_end(&mut readback)?;
    let latency = started.elapsed().as_nanos() as u64;

    if readback != block {
        return Err(SourceError::Io("temp file readback mismatch".into()));
    }

    let mut payload = Vec::with_capacity(256);
    payload.extend_from_slice(&latency.to_be_bytes());
    payload.extend_from_slice(&Sha256::digest(&readback)[..8]);
    payload.extend_from_slice(&system_load_snapshot());

    block.zeroize();
    readback.zeroize();
    Ok(payload)
}
