// ABOUTME: Library module for db2-table-copier
// ABOUTME: Exports all core functionality for use in binary and tests

pub mod commands;
pub mod config;
pub mod db2;
pub mod delimited;
pub mod transfer;
pub mod utils;
