// ABOUTME: Utility functions for tool discovery and display
// ABOUTME: Checks the client program is installed and sanitizes values for output

use anyhow::{bail, Result};
use std::path::PathBuf;
use which::which;

/// Check that the command line processor is available
///
/// # Arguments
///
/// * `program` - Program name (looked up on `PATH`) or path to the client
///
/// # Returns
///
/// The resolved path of the program.
///
/// # Errors
///
/// Returns an error with setup instructions if the program cannot be found.
///
/// # Examples
///
/// ```no_run
/// # use db2_table_copier::utils::check_required_tools;
/// # use anyhow::Result;
/// # fn example() -> Result<()> {
/// let db2 = check_required_tools("db2")?;
/// println!("using {}", db2.display());
/// # Ok(())
/// # }
/// ```
pub fn check_required_tools(program: &str) -> Result<PathBuf> {
    match which(program) {
        Ok(path) => Ok(path),
        Err(_) => bail!(
            "DB2 command line processor '{}' not found.\n\
             \n\
             Add the DB2 client to PATH by sourcing the instance profile, e.g.:\n\
             - . /home/db2inst1/sqllib/db2profile\n\
             or set 'client' in the settings file to the full path of db2.",
            program
        ),
    }
}

/// Sanitize a value from the input files for display
///
/// Removes control characters and limits length so a malformed input file
/// cannot mangle terminal output or logs.
///
/// # Examples
///
/// ```
/// # use db2_table_copier::utils::sanitize_identifier;
/// assert_eq!(sanitize_identifier("ORDERS"), "ORDERS");
/// assert_eq!(sanitize_identifier("ORD\x1b[2JERS"), "ORD[2JERS");
/// ```
pub fn sanitize_identifier(identifier: &str) -> String {
    identifier
        .chars()
        .filter(|c| !c.is_control())
        .take(100)
        .collect()
}

/// Mask a password for display; empty stays empty so "no password" is visible
pub fn mask_password(password: &str) -> &'static str {
    if password.is_empty() {
        ""
    } else {
        "********"
    }
}
