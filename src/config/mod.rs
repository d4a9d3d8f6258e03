// ABOUTME: Configuration: run settings plus the database and table input files
// ABOUTME: Turns the delimited input files into typed aliases and table specs

pub mod databases;
pub mod settings;
pub mod tables;

pub use databases::{DatabaseAlias, DatabaseCatalog};
pub use settings::{load_settings, Settings, DEFAULT_SETTINGS_FILE};
pub use tables::{LoadKind, TableList, TableSpec};
