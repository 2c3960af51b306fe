use crate::bench::BenchmarkResult;
use anyhow::Context;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

/// One line of the JSON-lines results file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IterationRecord {
    pub iteration: usize,
    /// RFC 3339, UTC
    pub timestamp: String,
    pub cpu: BenchmarkResult,
    pub disk: BenchmarkResult,
    pub mean_cpu_utilization: f64,
    pub mean_disk_latency: f64,
}

impl IterationRecord {
    pub fn new(iteration: usize, cpu: &BenchmarkResult, disk: &BenchmarkResult) -> Self {
        Self {
            iteration,
            timestamp: Utc::now().to_rfc3339(),
            cpu: cpu.clone(),
            disk: disk.clone(),
            mean_cpu_utilization: cpu.mean_cpu_utilization(),
            mean_disk_latency: disk.mean_disk_latency(),
        }
    }

    /// Append as a single line and sync it to disk
    pub async fn append_to(&self, path: &Path) -> anyhow::Result<()> {
        let mut line = serde_json::to_string(self)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await
            .with_context(|| format!("Failed to open results file {}", path.display()))?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        file.sync_all().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_append_writes_json_lines() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("results.jsonl");
        let cpu = BenchmarkResult {
            execution_time: 1.0,
            cpu_utilization_samples: vec![10.0, 30.0],
            disk_latency_samples: vec![],
        };
        let disk = BenchmarkResult {
            execution_time: 0.5,
            cpu_utilization_samples: vec![],
            disk_latency_samples: vec![0.2, 0.4],
        };

        IterationRecord::new(1, &cpu, &disk).append_to(&path).await.unwrap();
        IterationRecord::new(2, &cpu, &disk).append_to(&path).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let records: Vec<IterationRecord> = content
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].iteration, 1);
        assert_eq!(records[1].iteration, 2);
        assert_eq!(records[0].mean_cpu_utilization, 20.0);
        assert!((records[0].mean_disk_latency - 0.3).abs() < 1e-12);
        assert_eq!(records[1].disk, disk);
    }
}
