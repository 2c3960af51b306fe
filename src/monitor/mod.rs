pub mod cpu;
pub mod memory;

pub use cpu::{FixedSampler, ResourceSampler, SysinfoSampler};
pub use memory::{MemoryMetrics, MemoryMonitor};
