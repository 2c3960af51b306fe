use crate::bench::BenchmarkResult;
use serde::Serialize;

/// Streaming mean and variance (Welford)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: f64) {
        if self.count == 0 {
            self.min = value;
            self.max = value;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// 0 when nothing has been pushed
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Sample variance; 0 with fewer than two values
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}

/// Cross-iteration aggregate of an orchestrated run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub cpu_execution_time: RunningStats,
    pub cpu_utilization: RunningStats,
    pub disk_execution_time: RunningStats,
    pub disk_latency: RunningStats,
    pub completed_iterations: usize,
    pub failed_iterations: usize,
    pub cancelled: bool,
}

impl Summary {
    pub fn record(&mut self, cpu: &BenchmarkResult, disk: &BenchmarkResult) {
        self.cpu_execution_time.push(cpu.execution_time);
        self.cpu_utilization.push(cpu.mean_cpu_utilization());
        self.disk_execution_time.push(disk.execution_time);
        self.disk_latency.push(disk.mean_disk_latency());
        self.completed_iterations += 1;
    }

    pub fn record_failure(&mut self) {
        self.failed_iterations += 1;
    }
}
