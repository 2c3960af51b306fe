pub mod cancel;
pub mod cpu;
pub mod disk;
pub mod kernels;
pub mod result;

pub use cancel::CancelToken;
pub use cpu::{CpuBenchmark, CpuOperation};
pub use disk::DiskBenchmark;
pub use kernels::Matrix;
pub use result::BenchmarkResult;
