use sysinfo::System;

/// Point-in-time, system-wide CPU utilisation in percent.
///
/// Implementations must return a value in `[0, 100]`.
pub trait ResourceSampler: Send {
    fn sample_cpu_percent(&mut self) -> f64;
}

/// CPU sampling backed by sysinfo
pub struct SysinfoSampler {
    system: System,
}

impl SysinfoSampler {
    pub fn new() -> Self {
        let mut system = System::new();
        system.refresh_cpu();
        Self { system }
    }

    /// Per-core utilisation since the previous refresh
    pub fn per_core(&mut self) -> Vec<f32> {
        self.system.refresh_cpu();
        self.system.cpus().iter().map(|cpu| cpu.cpu_usage()).collect()
    }
}

impl ResourceSampler for SysinfoSampler {
    fn sample_cpu_percent(&mut self) -> f64 {
        let per_core = self.per_core();
        let avg = if !per_core.is_empty() {
            per_core.iter().map(|&u| u as f64).sum::<f64>() / per_core.len() as f64
        } else {
            0.0
        };
        clamp_percent(avg)
    }
}

impl Default for SysinfoSampler {
    fn default() -> Self {
        Self::new()
    }
}

/// Sampler that always reports the same value
#[derive(Debug, Clone, Copy)]
pub struct FixedSampler(pub f64);

impl ResourceSampler for FixedSampler {
    fn sample_cpu_percent(&mut self) -> f64 {
        clamp_percent(self.0)
    }
}

fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}
