//! Export of the `usuariosAD` directory (users plus group names) to a JSON file.

pub mod config;
pub mod export;
pub mod source;


pub use config::Config;
pub use export::{ExportError, Exporter};
pub use source::{DirectorySource, MysqlSource, SourceError};
