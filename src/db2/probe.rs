// ABOUTME: Row count and max-value probes read back from captured query output
// ABOUTME: A probe that fails or prints no number yields None rather than an error

use super::statements::{count_statement, max_statement};
use super::DbClient;
use crate::config::TableSpec;
use crate::delimited::{last_integer_in_text, last_non_blank_line};
use anyhow::{Context, Result};
use std::path::Path;

/// Last bare integer in the file at `path`
pub fn last_integer_in_file(path: &Path) -> Result<Option<i64>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(last_integer_in_text(&text))
}

/// Run `statement` captured and scrape the last integer from its output
async fn probe<C: DbClient>(client: &mut C, statement: &str) -> Result<Option<i64>> {
    let succeeded = client.run_captured(statement).await?;
    let scratch = client.scratch_path();

    if !succeeded {
        let text = std::fs::read_to_string(scratch).unwrap_or_default();
        tracing::warn!(
            "⚠ '{}' failed: {}",
            statement,
            last_non_blank_line(&text).unwrap_or("no output").trim()
        );
        return Ok(None);
    }

    let value = last_integer_in_file(scratch)?;
    if value.is_none() {
        let text = std::fs::read_to_string(scratch).unwrap_or_default();
        tracing::warn!(
            "⚠ '{}' printed no number: {}",
            statement,
            last_non_blank_line(&text).unwrap_or("no output").trim()
        );
    }
    Ok(value)
}

/// Number of rows in `table`, restricted by `filter` when given
pub async fn count_rows<C: DbClient>(
    client: &mut C,
    table: &TableSpec,
    filter: Option<&str>,
) -> Result<Option<u64>> {
    let statement = count_statement(&table.schema, &table.table, filter);
    let count = probe(client, &statement).await?;
    Ok(count.and_then(|n| u64::try_from(n).ok()))
}

/// Largest value of `column` in `table`, e.g. the last generated identity key
pub async fn max_value<C: DbClient>(
    client: &mut C,
    table: &TableSpec,
    column: &str,
    filter: Option<&str>,
) -> Result<Option<i64>> {
    let statement = max_statement(&table.schema, &table.table, column, filter);
    probe(client, &statement).await
}
