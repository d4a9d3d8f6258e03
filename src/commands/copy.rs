// ABOUTME: Table copy command: unload from a source alias, reload into targets
// ABOUTME: Keeps identity generators in step and scripts loads for remote targets

use super::counts::{print_counts, table_counts, total_rows};
use crate::config::{DatabaseAlias, DatabaseCatalog, Settings, TableList, TableSpec};
use crate::db2::statements::{export_statement, reload_statement, restart_identity_statement};
use crate::db2::{self, Db2Cli, DbClient};
use crate::transfer::RemotePlan;
use anyhow::{bail, Context, Result};
use dialoguer::Confirm;

/// Outcome of a copy run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CopySummary {
    /// Tables exported from the source
    pub unloaded: usize,
    pub unload_failures: Vec<String>,
    /// Table loads run locally or scripted for a remote target
    pub loaded: usize,
    /// `<alias>:<schema.table>` for every load that failed or was skipped
    pub load_failures: Vec<String>,
    /// `<alias>:<schema.table>` for loaded tables whose identity restart failed
    pub restart_failures: Vec<String>,
    pub remote_files_written: bool,
    /// The user declined to overwrite existing data; nothing was copied
    pub cancelled: bool,
}

impl CopySummary {
    pub fn has_failures(&self) -> bool {
        !self.unload_failures.is_empty()
            || !self.load_failures.is_empty()
            || !self.restart_failures.is_empty()
    }
}

/// A table exported from the source
#[derive(Debug, Clone)]
struct Unloaded<'a> {
    spec: &'a TableSpec,
    /// Highest identity value on the source, when the table has an identity column
    identity_max: Option<i64>,
}

/// Copy every configured table from `source` to each of `targets`
///
/// Steps:
/// 1. Counts the rows already in each local target and, if there are any,
///    asks twice before overwriting (skipped with `assume_yes`)
/// 2. Exports every table from the source to `<table>.ixf`, recording the
///    max value of each identity column
/// 3. Reloads each table into each local target, restarting identity
///    columns at the recorded max + 1
/// 4. For remote targets, writes the transfer list and load script instead
///
/// # Errors
///
/// This function will return an error if:
/// - Either input file cannot be parsed
/// - An alias is not in the databases file
/// - The connection to the source fails
/// - The client program cannot be run
/// - The remote plan files cannot be written
///
/// Failures of individual exports and loads are reported in the returned
/// [`CopySummary`] rather than stopping the run.
///
/// # Examples
///
/// ```no_run
/// # use anyhow::Result;
/// # use db2_table_copier::{commands, config::Settings};
/// # async fn example() -> Result<()> {
/// let targets = vec!["dev".to_string(), "test".to_string()];
/// let summary = commands::copy(&Settings::default(), "prod", &targets, false).await?;
/// # Ok(())
/// # }
/// ```
pub async fn copy(
    settings: &Settings,
    source: &str,
    targets: &[String],
    assume_yes: bool,
) -> Result<CopySummary> {
    let catalog = DatabaseCatalog::load(&settings.databases_file)?;
    let tables = TableList::load(&settings.tables_file)?;
    let mut client = Db2Cli::new(&settings.client, &settings.scratch_file);

    let confirm = |total: u64| {
        if assume_yes {
            Ok(true)
        } else {
            confirm_overwrite(total)
        }
    };

    let job = CopyJob {
        catalog: &catalog,
        tables: &tables,
        settings,
    };
    job.run(&mut client, source, targets, confirm).await
}

/// Everything a copy run reads; the client and prompt are passed in separately
pub struct CopyJob<'a> {
    pub catalog: &'a DatabaseCatalog,
    pub tables: &'a TableList,
    pub settings: &'a Settings,
}

impl<'a> CopyJob<'a> {
    pub async fn run<C, F>(
        &self,
        client: &mut C,
        source: &str,
        targets: &[String],
        mut confirm: F,
    ) -> Result<CopySummary>
    where
        C: DbClient,
        F: FnMut(u64) -> Result<bool>,
    {
        if targets.is_empty() {
            bail!("At least one target alias is required");
        }

        // Resolve every alias before running anything
        let source = self.catalog.lookup(source)?;
        let targets = targets
            .iter()
            .map(|t| self.catalog.lookup(t))
            .collect::<Result<Vec<_>>>()?;

        tracing::info!(
            "Copying {} table(s) from '{}' to {}",
            self.tables.len(),
            source.alias,
            targets
                .iter()
                .map(|t| format!("'{}'", t.alias))
                .collect::<Vec<_>>()
                .join(", ")
        );

        let mut summary = CopySummary::default();

        // Step 1: Make sure the user wants existing target data replaced
        tracing::info!("Step 1/3: Checking target databases for existing rows...");
        for target in &targets {
            if !self.confirm_target(client, target, &mut confirm).await? {
                println!("Done, no unloads/loads performed");
                summary.cancelled = true;
                return Ok(summary);
            }
        }

        // Step 2: Unload from the source
        tracing::info!("Step 2/3: Unloading from '{}'...", source.alias);
        let unloaded = self.unload(client, source, &mut summary).await?;

        // Step 3: Reload into each target
        tracing::info!("Step 3/3: Loading target databases...");
        let mut plan = RemotePlan::new();
        for target in &targets {
            if target.is_remote {
                self.plan_remote(target, &unloaded, &mut plan, &mut summary);
            } else {
                self.load_local(client, target, &unloaded, &mut summary)
                    .await?;
            }
        }

        if targets.iter().any(|t| t.is_remote) {
            plan.write(
                &self.settings.load_list_file,
                &self.settings.load_script_file,
            )
            .context("Failed to write remote load files")?;
            summary.remote_files_written = true;
            println!(
                "Done, for remote target databases check {}/{}",
                self.settings.load_list_file.display(),
                self.settings.load_script_file.display()
            );
        } else {
            println!("Done");
        }

        if summary.has_failures() {
            tracing::warn!(
                "⚠ Copy finished with {} unload, {} load, and {} identity restart failure(s)",
                summary.unload_failures.len(),
                summary.load_failures.len(),
                summary.restart_failures.len()
            );
        } else {
            tracing::info!("✅ Copy complete");
        }
        Ok(summary)
    }

    /// Count rows on a local target and confirm overwriting them; remote targets pass
    async fn confirm_target<C, F>(
        &self,
        client: &mut C,
        target: &DatabaseAlias,
        confirm: &mut F,
    ) -> Result<bool>
    where
        C: DbClient,
        F: FnMut(u64) -> Result<bool>,
    {
        if target.is_remote {
            tracing::info!(
                "  '{}' is remote, existing rows cannot be checked from here",
                target.alias
            );
            return Ok(true);
        }

        if !db2::connect(client, target).await? {
            tracing::warn!("  Skipping row check for '{}'", target.alias);
            return Ok(true);
        }
        let counts = table_counts(client, self.tables, self.settings.row_filter()).await?;
        db2::disconnect(client).await?;

        let total = total_rows(&counts);
        if total == 0 {
            tracing::info!("  '{}' holds no rows in the configured tables", target.alias);
            return Ok(true);
        }

        println!("Rows on '{}':", target.alias);
        print_counts(&counts);
        confirm(total)
    }

    async fn unload<'t, C: DbClient>(
        &'t self,
        client: &mut C,
        source: &DatabaseAlias,
        summary: &mut CopySummary,
    ) -> Result<Vec<Unloaded<'t>>> {
        if !db2::connect(client, source).await? {
            bail!(
                "Failed to connect to source '{}' ({})",
                source.alias,
                source.database
            );
        }

        let filter = self.settings.row_filter();
        let mut unloaded = Vec::with_capacity(self.tables.len());

        for spec in self.tables {
            tracing::info!("Unloading {}", spec.qualified_name());
            let statement = export_statement(&spec.schema, &spec.table, filter);
            if !client.run(&statement).await? {
                tracing::warn!("⚠ Export of {} failed, it will not be loaded", spec.key);
                summary.unload_failures.push(spec.key.clone());
                continue;
            }
            summary.unloaded += 1;

            let identity_max = match &spec.identity_column {
                Some(column) => {
                    let max = db2::max_value(client, spec, column, filter).await?;
                    match max {
                        Some(value) => tracing::info!("  {} max {} is {}", spec.key, column, value),
                        None => tracing::warn!(
                            "⚠ No max value for {}.{}, its identity will not be restarted",
                            spec.key,
                            column
                        ),
                    }
                    max
                }
                None => None,
            };

            unloaded.push(Unloaded { spec, identity_max });
        }

        db2::disconnect(client).await?;
        Ok(unloaded)
    }

    async fn load_local<C: DbClient>(
        &self,
        client: &mut C,
        target: &DatabaseAlias,
        unloaded: &[Unloaded<'_>],
        summary: &mut CopySummary,
    ) -> Result<()> {
        if !db2::connect(client, target).await? {
            tracing::warn!("⚠ Skipping loads into '{}'", target.alias);
            summary
                .load_failures
                .extend(unloaded.iter().map(|u| failure(target, u.spec)));
            return Ok(());
        }

        for table in unloaded {
            let spec = table.spec;
            tracing::info!("Loading {} into '{}'", spec.qualified_name(), target.alias);

            if !client.run(&reload_statement(spec)).await? {
                tracing::warn!("⚠ Load of {} into '{}' failed", spec.key, target.alias);
                summary.load_failures.push(failure(target, spec));
                continue;
            }
            summary.loaded += 1;

            if let Some(statement) = restart_statement(table) {
                tracing::info!("  Fixing identity with: {}", statement);
                if !client.run(&statement).await? {
                    tracing::warn!(
                        "⚠ Identity restart for {} on '{}' failed",
                        spec.key,
                        target.alias
                    );
                    summary.restart_failures.push(failure(target, spec));
                }
            }
        }

        db2::disconnect(client).await?;
        Ok(())
    }

    fn plan_remote(
        &self,
        target: &DatabaseAlias,
        unloaded: &[Unloaded<'_>],
        plan: &mut RemotePlan,
        summary: &mut CopySummary,
    ) {
        tracing::info!("Writing load list/commands for remote '{}'", target.alias);
        for table in unloaded {
            plan.add_transfer(&table.spec.table);
            plan.add_statement(&reload_statement(table.spec));
            if let Some(statement) = restart_statement(table) {
                plan.add_statement(&statement);
            }
            summary.loaded += 1;
        }
    }
}

fn restart_statement(table: &Unloaded<'_>) -> Option<String> {
    let column = table.spec.identity_column.as_deref()?;
    let max = table.identity_max?;
    Some(restart_identity_statement(
        &table.spec.schema,
        &table.spec.table,
        column,
        max + 1,
    ))
}

fn failure(target: &DatabaseAlias, spec: &TableSpec) -> String {
    format!("{}:{}", target.alias, spec.key)
}

/// Ask twice before replacing `total` existing rows
fn confirm_overwrite(total: u64) -> Result<bool> {
    let first = Confirm::new()
        .with_prompt(format!(
            "There are {} records on file, do you want to continue?",
            total
        ))
        .default(false)
        .interact()
        .context("Failed to read confirmation")?;
    if !first {
        return Ok(false);
    }

    Confirm::new()
        .with_prompt("You positive?")
        .default(false)
        .interact()
        .context("Failed to read confirmation")
}
