use clap::{Args, Parser, Subcommand};
use host_bench::bench::{CancelToken, CpuBenchmark, DiskBenchmark};
use host_bench::config::{self, Config};
use host_bench::monitor::{MemoryMonitor, ResourceSampler, SysinfoSampler};
use host_bench::report::{self, logging, TracingSink};
use host_bench::Orchestrator;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "host-bench")]
#[command(about = "Repeatable CPU and disk micro-benchmark with resource sampling", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run CPU then disk benchmarks for a number of iterations
    Run {
        #[command(flatten)]
        opts: BenchOpts,

        /// Number of iterations
        #[arg(short = 'n', long)]
        iterations: Option<usize>,

        /// Append one JSON line per iteration to this file
        #[arg(long)]
        results_file: Option<PathBuf>,

        /// Keep running after a failed iteration
        #[arg(long)]
        keep_going: bool,

        /// JSON config file; explicit flags take precedence
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Run the CPU benchmark once
    Cpu {
        #[command(flatten)]
        opts: BenchOpts,
    },
    /// Run the disk benchmark once
    Disk {
        #[command(flatten)]
        opts: BenchOpts,
    },
    /// Show system information
    Info,
}

#[derive(Args)]
struct BenchOpts {
    /// Side length of the square matrices
    #[arg(short = 's', long)]
    matrix_size: Option<usize>,

    /// Scratch file size (e.g., 100, 100m, 1g)
    #[arg(short = 'f', long, value_parser = config::parse_file_size_mb)]
    file_size: Option<usize>,

    /// Directory for the scratch file
    #[arg(long)]
    scratch_dir: Option<PathBuf>,

    /// Log file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl BenchOpts {
    fn apply(self, config: &mut Config) {
        if let Some(matrix_size) = self.matrix_size {
            config.matrix_size = matrix_size;
        }
        if let Some(file_size) = self.file_size {
            config.file_size_mb = file_size;
        }
        if let Some(scratch_dir) = self.scratch_dir {
            config.scratch_dir = scratch_dir;
        }
        if let Some(log_file) = self.log_file {
            config.log_file = log_file;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            opts,
            iterations,
            results_file,
            keep_going,
            config,
        } => {
            let mut config = match config {
                Some(path) => Config::load(path)?,
                None => Config::default(),
            };
            opts.apply(&mut config);
            if let Some(iterations) = iterations {
                config.iterations = iterations;
            }
            if results_file.is_some() {
                config.results_file = results_file;
            }
            config.keep_going |= keep_going;
            config.validate()?;

            run_benchmark(config).await?;
        }
        Commands::Cpu { opts } => {
            let mut config = Config::default();
            opts.apply(&mut config);
            config.validate()?;
            logging::init(&config.log_file)?;

            let cancel = cancel_on_ctrl_c();
            let mut bench = CpuBenchmark::new(config.matrix_size, Box::new(SysinfoSampler::new()))
                .with_cancel(cancel);
            let result = tokio::task::spawn_blocking(move || bench.run()).await??;
            println!("{}", report::format_cpu_section(&result));
        }
        Commands::Disk { opts } => {
            let mut config = Config::default();
            opts.apply(&mut config);
            config.validate()?;
            logging::init(&config.log_file)?;

            let cancel = cancel_on_ctrl_c();
            let bench = DiskBenchmark::new(config.file_size_mb, config.scratch_path()).with_cancel(cancel);
            let result = bench.run().await?;
            println!("{}", report::format_disk_section(&result));
        }
        Commands::Info => {
            show_system_info().await?;
        }
    }

    Ok(())
}

async fn run_benchmark(config: Config) -> anyhow::Result<()> {
    logging::init(&config.log_file)?;

    println!("Starting benchmark...");
    println!("Matrix size: {}", config.matrix_size);
    println!("File size: {} MB", config.file_size_mb);
    println!("Iterations: {}", config.iterations);
    println!("Scratch file: {}", config.scratch_path().display());

    let cancel = cancel_on_ctrl_c();
    let mut orchestrator = Orchestrator::new(
        config,
        Box::new(SysinfoSampler::new()),
        Arc::new(TracingSink),
        cancel,
    );
    let summary = orchestrator.run().await?;
    println!("{}", report::format_summary(&summary));
    Ok(())
}

async fn show_system_info() -> anyhow::Result<()> {
    let mut sampler = SysinfoSampler::new();
    tokio::time::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL).await;
    let cpu_percent = sampler.sample_cpu_percent();
    let memory = MemoryMonitor::new().collect();

    println!("Logical CPUs: {}", num_cpus::get());
    println!("Physical cores: {}", num_cpus::get_physical());
    println!("CPU utilization: {:.2}%", cpu_percent);
    println!("Total memory: {} MB", memory.total_bytes / (1024 * 1024));
    println!("Available memory: {} MB", memory.available_bytes / (1024 * 1024));
    println!("Memory utilization: {:.2}%", memory.utilization_percent);
    Ok(())
}

/// Cancel the returned token on the first Ctrl-C
fn cancel_on_ctrl_c() -> CancelToken {
    let cancel = CancelToken::new();
    let token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\nInterrupted, stopping after the current phase...");
            token.cancel();
        }
    });
    cancel
}
