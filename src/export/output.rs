//! Naming and writing of the export file.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::config::OutputConfig;
use crate::source::UserRecord;

use super::ExportError;

/// Second-resolution timestamp embedded in the file name
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

const INDENT: &[u8] = b"    ";

/// `<prefix>_<YYYYMMDD>_<HHMMSS>.json`
pub fn file_name(prefix: &str, now: &DateTime<Local>) -> String {
    format!("{}_{}.json", prefix, now.format(TIMESTAMP_FORMAT))
}

pub fn output_path(config: &OutputConfig, now: &DateTime<Local>) -> PathBuf {
    config.directory.join(file_name(&config.prefix, now))
}

/// Render records as indented UTF-8 JSON. Non-ASCII text is kept as is.
pub fn render(records: &[UserRecord]) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    records.serialize(&mut ser)?;
    Ok(buf)
}

/// Write the rendered records to `path`, replacing any existing file.
///
/// The document is rendered completely before the file is created.
pub fn write_records(path: &Path, records: &[UserRecord]) -> Result<(), ExportError> {
    let bytes = render(records)?;
    fs::write(path, bytes).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })
}
