use std::fmt;
use std::path::PathBuf;

/// Which I/O call of a disk run failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoPhase {
    Create,
    Write,
    Sync,
    Open,
    Read,
}

impl fmt::Display for IoPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IoPhase::Create => "create",
            IoPhase::Write => "write",
            IoPhase::Sync => "sync",
            IoPhase::Open => "open",
            IoPhase::Read => "read",
        };
        f.write_str(name)
    }
}

/// Errors raised by a single benchmark run.
#[derive(Debug, thiserror::Error)]
pub enum BenchError {
    #[error("cannot allocate {what}: {bytes} bytes requested, {available} bytes available")]
    Allocation {
        what: &'static str,
        bytes: u64,
        available: u64,
    },

    #[error("{phase} failed on {}: {source}", path.display())]
    Io {
        phase: IoPhase,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "scratch file {} already exists; remove it if it was left by an interrupted run",
        path.display()
    )]
    StaleScratch { path: PathBuf },

    #[error("data read back from {} differs from what was written", path.display())]
    ReadMismatch { path: PathBuf },

    #[error("short write: {actual} of {expected} bytes")]
    ShortWrite { expected: u64, actual: u64 },

    #[error("short read: {actual} of {expected} bytes")]
    ShortRead { expected: u64, actual: u64 },

    #[error("cancelled")]
    Cancelled,
}

impl BenchError {
    pub fn io(phase: IoPhase, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BenchError::Io {
            phase,
            path: path.into(),
            source,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, BenchError::Cancelled)
    }
}

/// Which half of an iteration was running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Cpu,
    Disk,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Cpu => f.write_str("CPU"),
            Phase::Disk => f.write_str("Disk"),
        }
    }
}

/// A benchmark failure tagged with where in the run it happened.
#[derive(Debug, thiserror::Error)]
#[error("{phase} benchmark failed in iteration {iteration}: {source}")]
pub struct IterationError {
    pub phase: Phase,
    pub iteration: usize,
    #[source]
    pub source: BenchError,
}
