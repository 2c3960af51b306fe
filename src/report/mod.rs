pub mod console;
pub mod logging;
pub mod record;
pub mod sink;
pub mod summary;

pub use console::{format_cpu_section, format_disk_section, format_report, format_summary};
pub use record::IterationRecord;
pub use sink::{EventSink, TracingSink};
pub use summary::{RunningStats, Summary};
