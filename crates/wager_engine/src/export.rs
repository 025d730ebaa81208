use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use wager_core::Record;

use crate::persist::{ExportDir, PersistError};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("flush error: {0}")]
    Flush(String),
    #[error("export is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("persist error: {0}")]
    Persist(#[from] PersistError),
}

/// Serializes a completed run's records.
pub trait Exporter {
    fn export(&self, records: &[Record]) -> Result<String, ExportError>;
}

/// RFC 4180 CSV with a fixed header row and `\n` line endings.
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvExporter;

impl Exporter for CsvExporter {
    fn export(&self, records: &[Record]) -> Result<String, ExportError> {
        let mut writer = WriterBuilder::new()
            .quote_style(QuoteStyle::Necessary)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(Vec::new());
        writer.write_record(Record::COLUMNS)?;
        for record in records {
            writer.write_record(record.values())?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| ExportError::Flush(e.error().to_string()))?;
        Ok(String::from_utf8(bytes)?)
    }
}

/// `{site}_bets_{YYYY-MM-DDTHH-MM-SS}.csv`, safe on every filesystem.
pub fn export_filename(site: &str, now: DateTime<Utc>) -> String {
    format!("{}_bets_{}.csv", site, now.format("%Y-%m-%dT%H-%M-%S"))
}

/// Saves `content` into `dir`, creating it when missing. Never replaces an
/// existing export; returns the path actually written.
pub fn write_export(dir: &Path, filename: &str, content: &str) -> Result<PathBuf, ExportError> {
    Ok(ExportDir::open(dir)?.save(filename, content)?)
}
