use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Connection parameters for the source database
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Table names of the user directory
    #[serde(default)]
    pub schema: SchemaConfig,
    /// Where and how the export file is written
    #[serde(default)]
    pub output: OutputConfig,
}

// ============================================================================
// Database Configuration
// ============================================================================

#[derive(Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_user")]
    pub user: String,
    #[serde(default)]
    pub password: String,
    /// Database (schema) holding the directory tables
    #[serde(default = "default_database")]
    pub database: String,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    3306
}

fn default_user() -> String {
    "root".to_string()
}

fn default_database() -> String {
    "xadeFP".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            user: default_user(),
            password: String::new(),
            database: default_database(),
        }
    }
}

impl DatabaseConfig {
    /// Get the address string (host:port)
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// Password stays out of logs and panic messages
impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .finish()
    }
}

// ============================================================================
// Schema Configuration
// ============================================================================

/// Names of the three tables the export reads.
///
/// The user table may have any columns as long as it has `id`. The group table
/// needs `id` and `nombre`, the membership table `idUsuario` and `idGrupo`.
#[derive(Debug, Clone, Deserialize)]
pub struct SchemaConfig {
    #[serde(default = "default_user_table")]
    pub user_table: String,
    #[serde(default = "default_group_table")]
    pub group_table: String,
    #[serde(default = "default_membership_table")]
    pub membership_table: String,
}

fn default_user_table() -> String {
    "usuariosAD".to_string()
}

fn default_group_table() -> String {
    "gruposAD".to_string()
}

fn default_membership_table() -> String {
    "usuariosADGruposAD".to_string()
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            user_table: default_user_table(),
            group_table: default_group_table(),
            membership_table: default_membership_table(),
        }
    }
}

// ============================================================================
// Output Configuration
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory the export file is created in
    #[serde(default = "default_output_directory")]
    pub directory: PathBuf,
    /// File name prefix, followed by `_<YYYYMMDD>_<HHMMSS>.json`
    #[serde(default = "default_output_prefix")]
    pub prefix: String,
}

fn default_output_directory() -> PathBuf {
    PathBuf::from(".")
}

fn default_output_prefix() -> String {
    "usuarios_ad_export".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
            prefix: default_output_prefix(),
        }
    }
}
