use serde::{Deserialize, Serialize};

/// Timing and sampled metrics of one benchmark run.
///
/// Built up by the benchmark that owns the run: samples are only ever
/// appended and `execution_time` is written once when the timer stops.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkResult {
    /// Wall-clock seconds of the measured section; 0 until the run finishes
    pub execution_time: f64,
    /// CPU utilisation percentages in sample order
    pub cpu_utilization_samples: Vec<f64>,
    /// I/O latencies in seconds, write then read
    pub disk_latency_samples: Vec<f64>,
}

impl BenchmarkResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mean_cpu_utilization(&self) -> f64 {
        mean(&self.cpu_utilization_samples)
    }

    pub fn mean_disk_latency(&self) -> f64 {
        mean(&self.disk_latency_samples)
    }
}

fn mean(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        0.0
    } else {
        samples.iter().sum::<f64>() / samples.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_result_means_are_zero() {
        let result = BenchmarkResult::new();
        assert_eq!(result.execution_time, 0.0);
        assert_eq!(result.mean_cpu_utilization(), 0.0);
        assert_eq!(result.mean_disk_latency(), 0.0);
    }

    #[test]
    fn test_means() {
        let result = BenchmarkResult {
            execution_time: 1.5,
            cpu_utilization_samples: vec![10.0, 20.0, 30.0, 40.0],
            disk_latency_samples: vec![0.25, 0.75],
        };
        assert_eq!(result.mean_cpu_utilization(), 25.0);
        assert_eq!(result.mean_disk_latency(), 0.5);
    }
}
