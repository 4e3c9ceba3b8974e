//! Read side of the export: where user rows and group memberships come from.

mod connection;
mod value;

pub use connection::{quote_identifier, DirectoryQueries, MysqlSource};
pub use value::{is_lossy, to_json, to_param};

use serde_json::{Map, Value as JsonValue};

/// One user row: column name to value, in column order.
pub type UserRecord = Map<String, JsonValue>;

/// Read-only access to a user directory.
///
/// Implemented by [`MysqlSource`] for the real database; tests supply
/// in-memory implementations.
pub trait DirectorySource {
    /// All rows of the user table, in the order the database returns them.
    fn users(&mut self) -> Result<Vec<UserRecord>, SourceError>;

    /// Names of the groups `user_id` belongs to, in the order the database
    /// returns them.
    fn group_names(&mut self, user_id: &JsonValue) -> Result<Vec<String>, SourceError>;
}

impl<S: DirectorySource + ?Sized> DirectorySource for &mut S {
    fn users(&mut self) -> Result<Vec<UserRecord>, SourceError> {
        (**self).users()
    }

    fn group_names(&mut self, user_id: &JsonValue) -> Result<Vec<String>, SourceError> {
        (**self).group_names(user_id)
    }
}

/// Database errors
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Connection failed: {0}")]
    Connect(#[source] mysql::Error),

    #[error("Query failed: {0}")]
    Query(#[source] mysql::Error),

    #[error("User row {row} has no `id` column")]
    MissingId { row: usize },

    #[error("Invalid group name for user {user_id}: {reason}")]
    InvalidGroupName { user_id: String, reason: String },
}
