// ABOUTME: Self-describing delimited file support (layout record + keyed rows)
// ABOUTME: Also holds helpers for scraping values out of captured client output

pub mod layout;
pub mod rows;
pub mod scrape;

pub use layout::{Layout, LAYOUT_MARKER};
pub use rows::{KeySpec, KeyedRows, Row};
pub use scrape::{last_integer_in_text, last_non_blank_line};

/// Field separator used by every input file
pub const DELIMITER: char = ',';
