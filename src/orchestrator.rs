use crate::bench::{BenchmarkResult, CancelToken, CpuBenchmark, DiskBenchmark};
use crate::config::Config;
use crate::error::{BenchError, IterationError, Phase};
use crate::monitor::ResourceSampler;
use crate::report::{self, EventSink, IterationRecord, Summary};
use std::sync::Arc;
use tracing::{info, warn};

/// Runs the CPU then the disk benchmark, once per iteration, strictly in sequence
pub struct Orchestrator {
    config: Config,
    // Moved onto the blocking pool for the duration of each CPU run
    cpu: Option<CpuBenchmark>,
    disk: DiskBenchmark,
    cancel: CancelToken,
}

impl Orchestrator {
    pub fn new(
        config: Config,
        sampler: Box<dyn ResourceSampler>,
        sink: Arc<dyn EventSink>,
        cancel: CancelToken,
    ) -> Self {
        let cpu = CpuBenchmark::new(config.matrix_size, sampler)
            .with_sink(Arc::clone(&sink))
            .with_cancel(cancel.clone());
        let disk = DiskBenchmark::new(config.file_size_mb, config.scratch_path())
            .with_sink(sink)
            .with_cancel(cancel.clone());

        Self {
            config,
            cpu: Some(cpu),
            disk,
            cancel,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run every configured iteration and return the aggregate.
    ///
    /// The first failure is returned unless `keep_going` is set, in which
    /// case it is logged and counted. Cancellation ends the loop early with
    /// a partial summary.
    pub async fn run(&mut self) -> Result<Summary, IterationError> {
        let total = self.config.iterations;
        let mut summary = Summary::default();

        info!(
            "Starting {} iterations (matrix size {}, file size {} MB)",
            total, self.config.matrix_size, self.config.file_size_mb
        );

        for iteration in 1..=total {
            if self.cancel.is_cancelled() {
                summary.cancelled = true;
                break;
            }

            match self.run_iteration(iteration).await {
                Ok((cpu, disk)) => {
                    println!("{}", report::format_report(iteration, total, &cpu, &disk));
                    summary.record(&cpu, &disk);
                    self.append_record(iteration, &cpu, &disk).await;
                }
                Err(e) if e.source.is_cancelled() => {
                    warn!("Run cancelled during iteration {}", iteration);
                    summary.cancelled = true;
                    break;
                }
                Err(e) if self.config.keep_going => {
                    warn!("{}; continuing", e);
                    summary.record_failure();
                }
                Err(e) => return Err(e),
            }
        }

        Ok(summary)
    }

    /// One CPU run followed by one disk run
    pub async fn run_iteration(
        &mut self,
        iteration: usize,
    ) -> Result<(BenchmarkResult, BenchmarkResult), IterationError> {
        let cpu = self.run_cpu().await.map_err(|source| IterationError {
            phase: Phase::Cpu,
            iteration,
            source,
        })?;
        let disk = self.disk.run().await.map_err(|source| IterationError {
            phase: Phase::Disk,
            iteration,
            source,
        })?;
        Ok((cpu, disk))
    }

    async fn run_cpu(&mut self) -> Result<BenchmarkResult, BenchError> {
        let Some(mut bench) = self.cpu.take() else {
            return Err(BenchError::Cancelled);
        };

        let joined = tokio::task::spawn_blocking(move || {
            let result = bench.run();
            (bench, result)
        })
        .await;

        match joined {
            Ok((bench, result)) => {
                self.cpu = Some(bench);
                result
            }
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            // Only happens while the runtime is shutting down
            Err(_) => Err(BenchError::Cancelled),
        }
    }

    async fn append_record(&self, iteration: usize, cpu: &BenchmarkResult, disk: &BenchmarkResult) {
        let Some(path) = &self.config.results_file else {
            return;
        };
        if let Err(e) = IterationRecord::new(iteration, cpu, disk).append_to(path).await {
            warn!("Failed to append results for iteration {}: {:#}", iteration, e);
        }
    }
}
