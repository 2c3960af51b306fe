use crate::bench::BenchmarkResult;
use crate::report::summary::{RunningStats, Summary};
use std::fmt::Write;

const RULE_WIDTH: usize = 50;

pub fn format_cpu_section(cpu: &BenchmarkResult) -> String {
    format!(
        "CPU Benchmark:\nExecution Time: {:.2} seconds\nAverage CPU Utilization: {:.2}%\n",
        cpu.execution_time,
        cpu.mean_cpu_utilization()
    )
}

pub fn format_disk_section(disk: &BenchmarkResult) -> String {
    format!(
        "Disk Benchmark:\nExecution Time: {:.2} seconds\nAverage Disk Latency: {:.4} seconds\n",
        disk.execution_time,
        disk.mean_disk_latency()
    )
}

/// Per-iteration report: header, CPU section, disk section
pub fn format_report(
    iteration: usize,
    total: usize,
    cpu: &BenchmarkResult,
    disk: &BenchmarkResult,
) -> String {
    format!(
        "\nBenchmark Results (iteration {}/{}):\n{}\n{}\n{}",
        iteration,
        total,
        "-".repeat(RULE_WIDTH),
        format_cpu_section(cpu),
        format_disk_section(disk)
    )
}

pub fn format_summary(summary: &Summary) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "\nSummary ({} completed, {} failed{}):",
        summary.completed_iterations,
        summary.failed_iterations,
        if summary.cancelled { ", cancelled" } else { "" }
    );
    let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));
    let _ = writeln!(
        out,
        "{:<22} {:>12} {:>12} {:>12} {:>12}",
        "metric", "mean", "std dev", "min", "max"
    );
    if summary.completed_iterations > 0 {
        row(&mut out, "CPU time (s)", &summary.cpu_execution_time, 2);
        row(&mut out, "CPU utilization (%)", &summary.cpu_utilization, 2);
        row(&mut out, "Disk time (s)", &summary.disk_execution_time, 2);
        row(&mut out, "Disk latency (s)", &summary.disk_latency, 4);
    }
    out
}

fn row(out: &mut String, label: &str, stats: &RunningStats, precision: usize) {
    let _ = writeln!(
        out,
        "{:<22} {:>12.p$} {:>12.p$} {:>12.p$} {:>12.p$}",
        label,
        stats.mean(),
        stats.std_dev(),
        stats.min(),
        stats.max(),
        p = precision
    );
}
