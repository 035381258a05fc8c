// Voting Tally - Library exports for the binary and tests

pub mod config;
pub mod counter;
pub mod export;
pub mod logging;
pub mod session;
pub mod ui;

// Re-export commonly used types for convenience
pub use config::AppConfig;
pub use counter::{Clock, Confirm, CounterEngine, SystemClock};
pub use export::{CsvExporter, DirectorySink, ExportError, ExportKind, ExportSink};
pub use session::{
    Category, Counts, FileStore, MemoryStore, SessionState, StateStore, StoreError, TallyEvent,
};
