// ABOUTME: Row counts for every configured table on one database alias
// ABOUTME: Also used by copy to check whether a target already holds data

use crate::config::{DatabaseCatalog, Settings, TableList, TableSpec};
use crate::db2::{self, Db2Cli, DbClient};
use crate::utils::sanitize_identifier;
use anyhow::{bail, Result};

/// Row count of one table; `None` when the count could not be read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableCount {
    pub key: String,
    pub schema: String,
    pub table: String,
    pub rows: Option<u64>,
}

/// Count the rows of each table over the current connection
pub async fn table_counts<C: DbClient>(
    client: &mut C,
    tables: &TableList,
    filter: Option<&str>,
) -> Result<Vec<TableCount>> {
    let mut counts = Vec::with_capacity(tables.len());
    for spec in tables {
        let rows = db2::count_rows(client, spec, filter).await?;
        counts.push(count_of(spec, rows));
    }
    Ok(counts)
}

fn count_of(spec: &TableSpec, rows: Option<u64>) -> TableCount {
    TableCount {
        key: spec.key.clone(),
        schema: spec.schema.clone(),
        table: spec.table.clone(),
        rows,
    }
}

/// Sum of the counts that could be read
pub fn total_rows(counts: &[TableCount]) -> u64 {
    counts.iter().filter_map(|c| c.rows).sum()
}

/// Print `schema table recs: n` for each table
pub fn print_counts(counts: &[TableCount]) {
    for count in counts {
        let rows = count
            .rows
            .map(|n| n.to_string())
            .unwrap_or_else(|| "n/a".to_string());
        println!(
            "{} {} recs: {}",
            sanitize_identifier(&count.schema),
            sanitize_identifier(&count.table),
            rows
        );
    }
}

/// Show the row count of every configured table on `alias`
///
/// # Returns
///
/// The total of the counts that could be read.
///
/// # Errors
///
/// This function will return an error if:
/// - Either input file cannot be parsed
/// - `alias` is not in the databases file
/// - The connection to `alias` fails
/// - The client program cannot be run
///
/// # Examples
///
/// ```no_run
/// # use anyhow::Result;
/// # use db2_table_copier::{commands, config::Settings};
/// # async fn example() -> Result<()> {
/// let total = commands::counts(&Settings::default(), "dev").await?;
/// # Ok(())
/// # }
/// ```
pub async fn counts(settings: &Settings, alias: &str) -> Result<u64> {
    let catalog = DatabaseCatalog::load(&settings.databases_file)?;
    let tables = TableList::load(&settings.tables_file)?;
    let mut client = Db2Cli::new(&settings.client, &settings.scratch_file);
    counts_with(&mut client, &catalog, &tables, settings.row_filter(), alias).await
}

pub async fn counts_with<C: DbClient>(
    client: &mut C,
    catalog: &DatabaseCatalog,
    tables: &TableList,
    filter: Option<&str>,
    alias: &str,
) -> Result<u64> {
    let target = catalog.lookup(alias)?;

    if !db2::connect(client, target).await? {
        bail!(
            "Failed to connect to '{}' ({})",
            target.alias,
            target.database
        );
    }

    let counts = table_counts(client, tables, filter).await?;
    db2::disconnect(client).await?;

    let total = total_rows(&counts);
    print_counts(&counts);
    println!("Total: {} record(s) in {} table(s)", total, counts.len());
    Ok(total)
}
