use crate::bench::{BenchmarkResult, CancelToken};
use crate::error::{BenchError, IoPhase};
use crate::monitor::MemoryMonitor;
use crate::report::{EventSink, TracingSink};
use rand::{RngCore, SeedableRng};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::fs::{self, File, OpenOptions};
use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::debug;

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Write-then-read benchmark against a scratch file
pub struct DiskBenchmark {
    file_size_mb: usize,
    scratch_path: PathBuf,
    sink: Arc<dyn EventSink>,
    cancel: CancelToken,
    #[cfg(test)]
    fault: Option<tests::Fault>,
}

impl DiskBenchmark {
    pub fn new(file_size_mb: usize, scratch_path: impl Into<PathBuf>) -> Self {
        Self {
            file_size_mb,
            scratch_path: scratch_path.into(),
            sink: Arc::new(TracingSink),
            cancel: CancelToken::new(),
            #[cfg(test)]
            fault: None,
        }
    }

    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn scratch_path(&self) -> &Path {
        &self.scratch_path
    }

    pub fn file_size_bytes(&self) -> Option<u64> {
        (self.file_size_mb as u64).checked_mul(BYTES_PER_MB)
    }

    /// Run one write/read cycle.
    ///
    /// Buffer generation happens before the timer starts and scratch file
    /// removal after it stops. Any I/O failure aborts the run without a
    /// result; a failed removal is only reported to the sink.
    pub async fn run(&self) -> Result<BenchmarkResult, BenchError> {
        let mut results = BenchmarkResult::new();

        let size = self.file_size_bytes().ok_or(BenchError::Allocation {
            what: "disk buffer",
            bytes: u64::MAX,
            available: 0,
        })?;
        // Write buffer plus the read-back buffer
        MemoryMonitor::new().ensure_available("disk buffer", size.saturating_mul(2))?;

        let mut data = vec![0u8; size as usize];
        rand::rngs::StdRng::from_entropy().fill_bytes(&mut data);

        let mut created = false;
        let start = Instant::now();
        let outcome = self.write_then_read(&data, &mut results, &mut created).await;
        results.execution_time = start.elapsed().as_secs_f64();

        if created {
            self.remove_scratch().await;
        }
        outcome?;

        self.sink.benchmark_completed("Disk", results.execution_time);
        Ok(results)
    }

    async fn write_then_read(
        &self,
        data: &[u8],
        results: &mut BenchmarkResult,
        created: &mut bool,
    ) -> Result<(), BenchError> {
        let path = &self.scratch_path;
        let expected = data.len() as u64;

        // Write phase
        self.cancel.check()?;
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .await
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::AlreadyExists {
                    BenchError::StaleScratch { path: path.clone() }
                } else {
                    BenchError::io(IoPhase::Create, path, e)
                }
            })?;
        *created = true;

        let write_start = Instant::now();
        #[cfg(test)]
        if let Some(fault) = self.fault {
            fault.before_write(data, path).await?;
        }
        write_fully(&mut file, data, path).await?;
        file.flush()
            .await
            .map_err(|e| BenchError::io(IoPhase::Write, path, e))?;
        file.sync_all()
            .await
            .map_err(|e| BenchError::io(IoPhase::Sync, path, e))?;
        let write_latency = write_start.elapsed().as_secs_f64();
        results.disk_latency_samples.push(write_latency);
        drop(file);
        debug!(bytes = expected, latency_secs = write_latency, "write phase finished");

        #[cfg(test)]
        if let Some(fault) = self.fault {
            fault.after_write(path);
        }

        // Read phase
        self.cancel.check()?;
        let mut file = File::open(path)
            .await
            .map_err(|e| BenchError::io(IoPhase::Open, path, e))?;

        let read_start = Instant::now();
        let mut buf = Vec::with_capacity(data.len());
        let read = file
            .read_to_end(&mut buf)
            .await
            .map_err(|e| BenchError::io(IoPhase::Read, path, e))?;
        let read_latency = read_start.elapsed().as_secs_f64();
        drop(file);

        if read as u64 != expected {
            return Err(BenchError::ShortRead {
                expected,
                actual: read as u64,
            });
        }
        if buf != data {
            return Err(BenchError::ReadMismatch { path: path.clone() });
        }
        results.disk_latency_samples.push(read_latency);
        debug!(bytes = read, latency_secs = read_latency, "read phase finished");

        Ok(())
    }

    async fn remove_scratch(&self) {
        #[cfg(test)]
        if let Some(fault) = self.fault {
            fault.before_cleanup(&self.scratch_path);
        }
        if let Err(e) = fs::remove_file(&self.scratch_path).await {
            self.sink.cleanup_failed(&self.scratch_path, &e);
        }
    }
}

/// Write the whole buffer, treating a zero-length write as a short write
async fn write_fully<W>(writer: &mut W, data: &[u8], path: &Path) -> Result<(), BenchError>
where
    W: AsyncWrite + Unpin,
{
    let mut written = 0;
    while written < data.len() {
        let n = writer
            .write(&data[written..])
            .await
            .map_err(|e| BenchError::io(IoPhase::Write, path, e))?;
        if n == 0 {
            return Err(BenchError::ShortWrite {
                expected: data.len() as u64,
                actual: written as u64,
            });
        }
        written += n;
    }
    Ok(())
}
