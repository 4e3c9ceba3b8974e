use mysql::prelude::Queryable;
use mysql::{Conn, OptsBuilder, Row};
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use crate::config::{DatabaseConfig, SchemaConfig};

use super::value::{is_lossy, to_json, to_param};
use super::{DirectorySource, SourceError, UserRecord};

/// Quote a table name as a MySQL identifier
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// The two statements an export issues
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryQueries {
    /// Every row of the user table
    pub users: String,
    /// Group names of one user, bound to the user id
    pub group_names: String,
}

impl DirectoryQueries {
    pub fn new(schema: &SchemaConfig) -> Self {
        let users = format!("SELECT u.* FROM {} u", quote_identifier(&schema.user_table));
        let group_names = format!(
            "SELECT g.nombre FROM {} g JOIN {} ug ON g.id = ug.idGrupo WHERE ug.idUsuario = ?",
            quote_identifier(&schema.group_table),
            quote_identifier(&schema.membership_table),
        );
        Self { users, group_names }
    }
}

/// A user directory backed by a single MySQL/MariaDB connection.
///
/// The connection lives exactly as long as this value: dropping it closes the
/// connection, whichever way the export ended.
pub struct MysqlSource {
    conn: Conn,
    queries: DirectoryQueries,
    addr: String,
}

impl MysqlSource {
    /// Open the connection
    pub fn connect(config: &DatabaseConfig, schema: &SchemaConfig) -> Result<Self, SourceError> {
        let addr = config.addr();
        debug!(addr = %addr, database = %config.database, "Connecting to database");

        let opts = OptsBuilder::new()
            .ip_or_hostname(Some(config.host.as_str()))
            .tcp_port(config.port)
            .user(Some(config.user.as_str()))
            .pass(Some(config.password.as_str()))
            .db_name(Some(config.database.as_str()));

        // The caller reports the failure; keep this one below INFO
        let conn = Conn::new(opts).map_err(|e| {
            debug!(addr = %addr, error = %e, "Failed to connect to database");
            SourceError::Connect(e)
        })?;

        debug!(addr = %addr, "Database connection established");
        Ok(Self {
            conn,
            queries: DirectoryQueries::new(schema),
            addr,
        })
    }
}

impl DirectorySource for MysqlSource {
    fn users(&mut self) -> Result<Vec<UserRecord>, SourceError> {
        // Prepared statement, so values come back typed
        let rows: Vec<Row> = self
            .conn
            .exec(&self.queries.users, ())
            .map_err(SourceError::Query)?;

        Ok(rows.iter().map(row_to_record).collect())
    }

    fn group_names(&mut self, user_id: &JsonValue) -> Result<Vec<String>, SourceError> {
        let rows: Vec<Row> = self
            .conn
            .exec(&self.queries.group_names, (to_param(user_id),))
            .map_err(SourceError::Query)?;

        rows.into_iter()
            .map(|mut row| match row.take_opt::<String, usize>(0) {
                Some(Ok(name)) => Ok(name),
                Some(Err(e)) => Err(SourceError::InvalidGroupName {
                    user_id: user_id.to_string(),
                    reason: e.to_string(),
                }),
                None => Err(SourceError::InvalidGroupName {
                    user_id: user_id.to_string(),
                    reason: "missing column".to_string(),
                }),
            })
            .collect()
    }
}

impl Drop for MysqlSource {
    fn drop(&mut self) {
        debug!(addr = %self.addr, "Closing database connection");
    }
}

fn row_to_record(row: &Row) -> UserRecord {
    row.columns_ref()
        .iter()
        .enumerate()
        .map(|(i, column)| {
            let name = column.name_str().into_owned();
            let value = match row.as_ref(i) {
                Some(value) => {
                    if is_lossy(value) {
                        warn!(column = %name, "Column holds non-UTF-8 bytes, exported lossily");
                    }
                    to_json(value)
                }
                None => JsonValue::Null,
            };
            (name, value)
        })
        .collect()
}
