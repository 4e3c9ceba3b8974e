//! Integration test entry point
//!
//! Run with: USUARIOS_EXPORT_RUN_INTEGRATION_TESTS=1 cargo test --test integration
//!
//! Environment variables:
//! - USUARIOS_EXPORT_RUN_INTEGRATION_TESTS: Set to "1" to enable database tests
//! - USUARIOS_EXPORT_TEST_DB_HOST: MariaDB host (default: 127.0.0.1)
//! - USUARIOS_EXPORT_TEST_DB_PORT: MariaDB port (default: 3306)
//! - USUARIOS_EXPORT_TEST_DB_USER: MariaDB user (default: root)
//! - USUARIOS_EXPORT_TEST_DB_PASS: MariaDB password (default: empty)
//! - USUARIOS_EXPORT_TEST_DB_NAME: Database to create test tables in (default: test)
//!
//! Tests that need no server (connection failure) always run.


use mysql::prelude::*;
use mysql::{Conn, OptsBuilder};
use std::env;
use std::sync::atomic::{AtomicU32, Ordering};

use usuarios_ad_export::config::{Config, DatabaseConfig, SchemaConfig};

/// Check if integration tests should run
pub fn should_run_integration_tests() -> bool {
    env::var("USUARIOS_EXPORT_RUN_INTEGRATION_TESTS")
        .map(|v| v == "1")
        .unwrap_or(false)
}

/// Skip test if integration tests are not enabled
#[macro_export]
macro_rules! skip_if_not_enabled {
    () => {
        if !crate::should_run_integration_tests() {
            eprintln!(
                "Skipping integration test (set USUARIOS_EXPORT_RUN_INTEGRATION_TESTS=1 to run)"
            );
            return;
        }
    };
}

/// Get database connection config from environment
pub fn get_database_config() -> DatabaseConfig {
    DatabaseConfig {
        host: env::var("USUARIOS_EXPORT_TEST_DB_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
        port: env::var("USUARIOS_EXPORT_TEST_DB_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3306),
        user: env::var("USUARIOS_EXPORT_TEST_DB_USER").unwrap_or_else(|_| "root".to_string()),
        password: env::var("USUARIOS_EXPORT_TEST_DB_PASS").unwrap_or_default(),
        database: env::var("USUARIOS_EXPORT_TEST_DB_NAME").unwrap_or_else(|_| "test".to_string()),
    }
}

static TABLE_COUNTER: AtomicU32 = AtomicU32::new(0);

/// A private set of directory tables, dropped again when the fixture goes away.
pub struct TestDirectory {
    pub conn: Conn,
    pub schema: SchemaConfig,
    pub database: DatabaseConfig,
}

impl TestDirectory {
    /// Create empty user, group and membership tables with unique names
    pub fn create(name: &str) -> Self {
        let database = get_database_config();
        let opts = OptsBuilder::new()
            .ip_or_hostname(Some(database.host.as_str()))
            .tcp_port(database.port)
            .user(Some(database.user.as_str()))
            .pass(Some(database.password.as_str()))
            .db_name(Some(database.database.as_str()));
        let mut conn = Conn::new(opts).expect("Failed to connect to test database");

        let suffix = format!(
            "{}_{}_{}",
            name,
            std::process::id(),
            TABLE_COUNTER.fetch_add(1, Ordering::SeqCst)
        );
        let schema = SchemaConfig {
            user_table: format!("it_usuarios_{}", suffix),
            group_table: format!("it_grupos_{}", suffix),
            membership_table: format!("it_usuarios_grupos_{}", suffix),
        };

        conn.query_drop(format!(
            "CREATE TABLE `{}` (
                id INT PRIMARY KEY,
                login VARCHAR(64) NOT NULL,
                nombre VARCHAR(128) NULL,
                activo TINYINT NOT NULL DEFAULT 1,
                alta DATETIME NULL
            ) DEFAULT CHARSET = utf8mb4",
            schema.user_table
        ))
        .expect("CREATE user table should succeed");
        conn.query_drop(format!(
            "CREATE TABLE `{}` (
                id INT PRIMARY KEY,
                nombre VARCHAR(64) NOT NULL
            ) DEFAULT CHARSET = utf8mb4",
            schema.group_table
        ))
        .expect("CREATE group table should succeed");
        conn.query_drop(format!(
            "CREATE TABLE `{}` (
                id INT AUTO_INCREMENT PRIMARY KEY,
                idUsuario INT NOT NULL,
                idGrupo INT NOT NULL
            )",
            schema.membership_table
        ))
        .expect("CREATE membership table should succeed");

        Self {
            conn,
            schema,
            database,
        }
    }

    pub fn insert_user(&mut self, id: i32, login: &str, nombre: Option<&str>) {
        let sql = format!(
            "INSERT INTO `{}` (id, login, nombre, alta) VALUES (?, ?, ?, '2023-09-01 08:00:00')",
            self.schema.user_table
        );
        self.conn
            .exec_drop(sql, (id, login, nombre))
            .expect("INSERT user should succeed");
    }

    pub fn insert_group(&mut self, id: i32, nombre: &str) {
        let sql = format!("INSERT INTO `{}` (id, nombre) VALUES (?, ?)", self.schema.group_table);
        self.conn
            .exec_drop(sql, (id, nombre))
            .expect("INSERT group should succeed");
    }

    pub fn add_membership(&mut self, user_id: i32, group_id: i32) {
        let sql = format!(
            "INSERT INTO `{}` (idUsuario, idGrupo) VALUES (?, ?)",
            self.schema.membership_table
        );
        self.conn
            .exec_drop(sql, (user_id, group_id))
            .expect("INSERT membership should succeed");
    }

    /// Exporter config pointing at these tables, writing into `dir`
    pub fn config(&self, dir: &std::path::Path) -> Config {
        let mut config = Config {
            database: self.database.clone(),
            schema: self.schema.clone(),
            ..Config::default()
        };
        config.output.directory = dir.to_path_buf();
        config
    }
}

impl Drop for TestDirectory {
    fn drop(&mut self) {
        for table in [
            &self.schema.membership_table,
            &self.schema.group_table,
            &self.schema.user_table,
        ] {
            let _ = self.conn.query_drop(format!("DROP TABLE IF EXISTS `{}`", table));
        }
    }
}

/// Parse an export file
pub fn read_export(path: &std::path::Path) -> serde_json::Value {
    let content = std::fs::read_to_string(path).expect("export file should exist");
    serde_json::from_str(&content).expect("export file should be valid JSON")
}
