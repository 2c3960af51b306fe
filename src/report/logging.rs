use anyhow::Context;
use chrono::Local;
use std::fmt;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing::{Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::EnvFilter;

/// `<timestamp> - <LEVEL> - <message>` lines
#[derive(Debug, Clone, Copy, Default)]
pub struct LineFormat;

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        write!(
            writer,
            "{} - {} - ",
            Local::now().format("%Y-%m-%d %H:%M:%S,%3f"),
            event.metadata().level()
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Install the process-wide subscriber appending to `log_file`.
///
/// The level filter comes from `RUST_LOG` and defaults to `info`.
pub fn init(log_file: &Path) -> anyhow::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)
        .with_context(|| format!("Failed to open log file {}", log_file.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .event_format(LineFormat)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install logger: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{EventSink, TracingSink};
    use std::io;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl io::Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn capture(f: impl FnOnce()) -> String {
        let buf = SharedBuf::default();
        let writer = buf.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .event_format(LineFormat)
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        let bytes = buf.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_completion_line_format() {
        let output = capture(|| TracingSink.benchmark_completed("CPU", 1.234));

        let line = output.trim_end();
        let parts: Vec<&str> = line.splitn(3, " - ").collect();
        assert_eq!(parts.len(), 3, "{line}");
        assert_eq!(parts[0].len(), "2024-01-01 00:00:00,000".len());
        assert_eq!(parts[1], "INFO");
        assert_eq!(parts[2], "CPU Benchmark completed in 1.23 seconds");
    }

    #[test]
    fn test_cleanup_failure_is_a_warning() {
        let err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let output = capture(|| TracingSink.cleanup_failed(Path::new("scratch.dat"), &err));

        assert!(output.contains(" - WARN - "), "{output}");
        assert!(output.contains("scratch.dat"));
    }

    #[test]
    fn test_init_creates_log_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bench.log");
        // Another test may already own the global subscriber
        let _ = init(&path);
        assert!(path.exists());
    }
}
