// CSV export of the tally session
//
// The exporter renders the session into a UTF-8 CSV document (with a BOM so
// spreadsheet tools pick the right encoding) and hands it to an ExportSink.
// Exporting only reads the session.

pub mod csv;
pub mod sink;

pub use self::csv::{CsvExporter, export_file_name};
pub use sink::{DirectorySink, ExportSink};

/// Export error types
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),
}

/// Which document to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    /// Summary block followed by the chronological event log
    Log,
    /// Summary block only
    Report,
}

impl ExportKind {
    /// File name prefix for this kind
    pub fn file_prefix(&self) -> &'static str {
        match self {
            ExportKind::Log => "voting_log",
            ExportKind::Report => "voting_report",
        }
    }
}
