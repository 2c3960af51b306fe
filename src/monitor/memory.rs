use crate::error::BenchError;
use sysinfo::System;

/// Memory monitoring
pub struct MemoryMonitor {
    system: System,
}

#[derive(Debug, Clone)]
pub struct MemoryMetrics {
    pub total_bytes: u64,
    pub used_bytes: u64,
    pub available_bytes: u64,
    pub utilization_percent: f32,
}

impl MemoryMonitor {
    pub fn new() -> Self {
        let mut system = System::new();
        system.refresh_memory();
        Self { system }
    }

    pub fn collect(&mut self) -> MemoryMetrics {
        self.system.refresh_memory();

        let total = self.system.total_memory();
        let used = self.system.used_memory();
        let available = self.system.available_memory();
        let utilization = if total > 0 {
            (used as f32 / total as f32) * 100.0
        } else {
            0.0
        };

        MemoryMetrics {
            total_bytes: total,
            used_bytes: used,
            available_bytes: available,
            utilization_percent: utilization,
        }
    }

    /// Fail fast when `bytes` cannot fit into currently available memory.
    ///
    /// A host that reports zero available memory (some containers) is
    /// treated as unknown and always passes.
    pub fn ensure_available(&mut self, what: &'static str, bytes: u64) -> Result<(), BenchError> {
        let available = self.collect().available_bytes;
        if available > 0 && bytes > available {
            return Err(BenchError::Allocation {
                what,
                bytes,
                available,
            });
        }
        Ok(())
    }
}

impl Default for MemoryMonitor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_is_consistent() {
        let metrics = MemoryMonitor::new().collect();
        assert!(metrics.used_bytes <= metrics.total_bytes);
        assert!((0.0..=100.0).contains(&metrics.utilization_percent));
    }

    #[test]
    fn test_small_allocation_passes() {
        assert!(MemoryMonitor::new().ensure_available("buffer", 1024).is_ok());
    }

    #[test]
    fn test_huge_allocation_rejected() {
        let mut monitor = MemoryMonitor::new();
        if monitor.collect().available_bytes == 0 {
            return;
        }
        let err = monitor.ensure_available("matrices", u64::MAX).unwrap_err();
        assert!(matches!(err, BenchError::Allocation { what: "matrices", .. }));
    }
}
