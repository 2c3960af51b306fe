//! CPU and disk micro-benchmarks with resource sampling.
//!
//! [`orchestrator::Orchestrator`] drives [`bench::CpuBenchmark`] and
//! [`bench::DiskBenchmark`] for a number of iterations and aggregates
//! their [`bench::BenchmarkResult`]s.

pub mod bench;
pub mod config;
pub mod error;
pub mod monitor;
pub mod orchestrator;
pub mod report;

pub use bench::{BenchmarkResult, CancelToken, CpuBenchmark, DiskBenchmark};
pub use config::Config;
pub use error::{BenchError, IterationError};
pub use orchestrator::Orchestrator;
