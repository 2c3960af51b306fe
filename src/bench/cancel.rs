use crate::error::BenchError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared stop flag checked between benchmark phases.
///
/// Only phase boundaries observe it; a kernel or I/O call already in
/// progress runs to completion.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    stop_flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.stop_flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.stop_flag.load(Ordering::Relaxed)
    }

    pub fn check(&self) -> Result<(), BenchError> {
        if self.is_cancelled() {
            Err(BenchError::Cancelled)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_flag() {
        let token = CancelToken::new();
        let other = token.clone();
        assert!(token.check().is_ok());

        other.cancel();
        assert!(token.is_cancelled());
        assert!(matches!(token.check(), Err(BenchError::Cancelled)));
    }
}
