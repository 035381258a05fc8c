// CSV document rendering

use crate::export::{ExportError, ExportKind};
use crate::session::types::{Category, SessionState};
use ::csv::{Terminator, WriterBuilder};
use chrono::{DateTime, Datelike, Local, TimeZone, Timelike, Utc};

/// UTF-8 byte-order mark, written first so spreadsheet tools detect UTF-8
pub const UTF8_BOM: &str = "\u{FEFF}";

const SUMMARY_TITLE: &str = "--- サマリー ---";
const SUMMARY_HEADER: [&str; 2] = ["項目", "カウント"];
const TOTAL_LABEL: &str = "合計";
const LOG_TITLE: &str = "--- 時系列ログ ---";
const LOG_HEADER: [&str; 3] = ["時刻", "カテゴリ", "UnixTime(ms)"];

/// File name for an export created at `now`, e.g. `voting_log_2024-05-01T09-30-12.csv`
///
/// The instant is rendered in UTC as ISO-8601 with `:` and `.` replaced by `-`,
/// truncated to whole seconds.
pub fn export_file_name(kind: ExportKind, now: DateTime<Utc>) -> String {
    format!(
        "{}_{}.csv",
        kind.file_prefix(),
        now.format("%Y-%m-%dT%H-%M-%S")
    )
}

/// Renders a session into CSV
///
/// Log timestamps are rendered in the exporter's timezone (local time by
/// default).
#[derive(Debug, Clone)]
pub struct CsvExporter<Tz: TimeZone = Local> {
    timezone: Tz,
}

impl Default for CsvExporter<Local> {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvExporter<Local> {
    pub fn new() -> Self {
        Self { timezone: Local }
    }
}

impl<Tz: TimeZone> CsvExporter<Tz> {
    pub fn with_timezone(timezone: Tz) -> Self {
        Self { timezone }
    }

    /// Render the full document for `kind`, BOM included
    pub fn render(&self, state: &SessionState, kind: ExportKind) -> Result<Vec<u8>, ExportError> {
        let mut buf = UTF8_BOM.as_bytes().to_vec();
        buf = write_summary(buf, state)?;

        if kind == ExportKind::Log {
            buf.push(b'\n');
            buf = self.write_log(buf, state)?;
        }

        Ok(buf)
    }

    /// `year/month/day hour:minute:second.millisecond`, without zero padding
    pub fn format_timestamp(&self, timestamp_ms: i64) -> Option<String> {
        let dt = DateTime::from_timestamp_millis(timestamp_ms)?.with_timezone(&self.timezone);
        Some(format!(
            "{}/{}/{} {}:{}:{}.{}",
            dt.year(),
            dt.month(),
            dt.day(),
            dt.hour(),
            dt.minute(),
            dt.second(),
            dt.timestamp_subsec_millis()
        ))
    }

    fn write_log(&self, buf: Vec<u8>, state: &SessionState) -> Result<Vec<u8>, ExportError> {
        let mut writer = csv_writer(buf);
        writer.write_record([LOG_TITLE])?;
        writer.write_record(LOG_HEADER)?;

        for event in &state.log {
            let time = self.format_timestamp(event.timestamp).unwrap_or_default();
            writer.write_record([
                time.as_str(),
                event.category.as_str(),
                event.timestamp.to_string().as_str(),
            ])?;
        }

        finish(writer)
    }
}

fn write_summary(buf: Vec<u8>, state: &SessionState) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv_writer(buf);
    writer.write_record([SUMMARY_TITLE])?;
    writer.write_record(SUMMARY_HEADER)?;

    for category in Category::ALL {
        let count = state.counts.get(category).to_string();
        writer.write_record([category.label(), count.as_str()])?;
    }

    let total = state.counts.total().to_string();
    writer.write_record([TOTAL_LABEL, total.as_str()])?;

    finish(writer)
}

fn csv_writer(buf: Vec<u8>) -> ::csv::Writer<Vec<u8>> {
    WriterBuilder::new()
        .flexible(true)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(buf)
}

fn finish(writer: ::csv::Writer<Vec<u8>>) -> Result<Vec<u8>, ExportError> {
    writer
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))
}
