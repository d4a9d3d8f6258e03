// ABOUTME: Wrappers around the db2 command line processor
// ABOUTME: Statement text, process invocation, session handling, and value probes

pub mod probe;
pub mod runner;
pub mod session;
pub mod statements;

pub use probe::{count_rows, last_integer_in_file, max_value};
pub use runner::{Db2Cli, DbClient};
pub use session::{connect, disconnect};
