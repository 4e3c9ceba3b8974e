//! The export run: read users, attach their groups, write one JSON file.

pub mod output;

use std::path::PathBuf;

use chrono::{DateTime, Local};
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::config::{Config, OutputConfig};
use crate::source::{DirectorySource, MysqlSource, SourceError};

pub use crate::source::UserRecord;

/// Key of the synthesized group list on every record
pub const GROUPS_KEY: &str = "groups";

/// Column joined against the membership table
pub const ID_KEY: &str = "id";

/// Export errors
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Database error: {0}")]
    Source(#[from] SourceError),

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize export: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl ExportError {
    /// Whether this is a database-side failure (connection, auth, query, schema)
    pub fn is_database(&self) -> bool {
        matches!(self, ExportError::Source(_))
    }
}

/// Runs one export against the configured database
pub struct Exporter {
    config: Config,
}

impl Exporter {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Connect, export, and close the connection.
    ///
    /// Returns the path of the written file. Nothing is written if any
    /// database step fails.
    pub fn run(&self) -> Result<PathBuf, ExportError> {
        let mut source = MysqlSource::connect(&self.config.database, &self.config.schema)?;
        // `source` is dropped on every path out of here, closing the connection
        export_with(&mut source, &self.config.output, Local::now())
    }
}

/// Export everything `source` yields into a file under `output`, named after `now`.
pub fn export_with<S: DirectorySource>(
    mut source: S,
    output: &OutputConfig,
    now: DateTime<Local>,
) -> Result<PathBuf, ExportError> {
    let records = collect_records(&mut source)?;
    let path = output::output_path(output, &now);
    output::write_records(&path, &records)?;
    debug!(path = %path.display(), users = records.len(), "Export written");
    Ok(path)
}

/// Fetch all users and attach each one's group names under [`GROUPS_KEY`].
///
/// One membership query per user, issued in user order.
pub fn collect_records<S: DirectorySource>(source: &mut S) -> Result<Vec<UserRecord>, SourceError> {
    let mut users = source.users()?;
    debug!(count = users.len(), "Fetched users");

    for (row, user) in users.iter_mut().enumerate() {
        let id = user
            .get(ID_KEY)
            .cloned()
            .ok_or(SourceError::MissingId { row })?;
        let groups = source.group_names(&id)?;
        debug!(user_id = %id, groups = groups.len(), "Fetched groups");

        user.insert(
            GROUPS_KEY.to_string(),
            JsonValue::Array(groups.into_iter().map(JsonValue::String).collect()),
        );
    }

    Ok(users)
}
