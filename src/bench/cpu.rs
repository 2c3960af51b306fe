use crate::bench::kernels::Matrix;
use crate::bench::{BenchmarkResult, CancelToken};
use crate::error::BenchError;
use crate::monitor::{MemoryMonitor, ResourceSampler};
use crate::report::{EventSink, TracingSink};
use rand::SeedableRng;
use std::hint::black_box;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Matrices alive at the peak of a run (inputs plus kernel temporaries)
const WORKING_SET_MATRICES: u64 = 8;

/// The CPU workload, executed in this order on every run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuOperation {
    MatrixProduct,
    SingularValues,
    Fourier2d,
    Exponential,
}

impl CpuOperation {
    pub const ORDER: [CpuOperation; 4] = [
        CpuOperation::MatrixProduct,
        CpuOperation::SingularValues,
        CpuOperation::Fourier2d,
        CpuOperation::Exponential,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CpuOperation::MatrixProduct => "matmul",
            CpuOperation::SingularValues => "svd",
            CpuOperation::Fourier2d => "fft2",
            CpuOperation::Exponential => "exp",
        }
    }

    /// Run the kernel and fold its output into a checksum
    fn execute(&self, a: &Matrix, b: &Matrix) -> f64 {
        match self {
            CpuOperation::MatrixProduct => a.matmul(b).as_slice().iter().sum(),
            CpuOperation::SingularValues => a.singular_values().iter().sum(),
            CpuOperation::Fourier2d => a.dft2().as_slice().iter().sum(),
            CpuOperation::Exponential => a.exp().as_slice().iter().sum(),
        }
    }
}

/// CPU-bound benchmark over random square matrices
pub struct CpuBenchmark {
    matrix_size: usize,
    sampler: Box<dyn ResourceSampler>,
    sink: Arc<dyn EventSink>,
    cancel: CancelToken,
}

impl CpuBenchmark {
    pub fn new(matrix_size: usize, sampler: Box<dyn ResourceSampler>) -> Self {
        Self {
            matrix_size,
            sampler,
            sink: Arc::new(TracingSink),
            cancel: CancelToken::new(),
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

    pub fn matrix_size(&self) -> usize {
        self.matrix_size
    }

    /// Run the four operations once.
    ///
    /// Matrix generation happens before the timer starts. One utilisation
    /// sample is recorded right after each operation finishes.
    pub fn run(&mut self) -> Result<BenchmarkResult, BenchError> {
        let mut results = BenchmarkResult::new();

        MemoryMonitor::new().ensure_available(
            "matrices",
            Matrix::bytes_for(self.matrix_size).saturating_mul(WORKING_SET_MATRICES),
        )?;

        let mut rng = rand::rngs::StdRng::from_entropy();
        let matrix_a = Matrix::random(self.matrix_size, &mut rng);
        let matrix_b = Matrix::random(self.matrix_size, &mut rng);

        let start = Instant::now();

        for operation in CpuOperation::ORDER {
            self.cancel.check()?;

            // Resets the sampler's interval so the next reading covers the operation
            let _ = self.sampler.sample_cpu_percent();
            let op_start = Instant::now();
            let checksum = black_box(operation.execute(&matrix_a, &matrix_b));
            let cpu_percent = self.sampler.sample_cpu_percent();
            results.cpu_utilization_samples.push(cpu_percent);

            debug!(
                operation = operation.name(),
                elapsed_secs = op_start.elapsed().as_secs_f64(),
                cpu_percent,
                checksum,
                "CPU operation finished"
            );
        }

        results.execution_time = start.elapsed().as_secs_f64();
        self.sink.benchmark_completed("CPU", results.execution_time);
        Ok(results)
    }
}
