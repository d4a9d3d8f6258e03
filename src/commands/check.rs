// ABOUTME: Pre-flight check of the input files and the client program
// ABOUTME: Prints what a copy would work with, without touching any database

use crate::config::{DatabaseCatalog, Settings, TableList};
use crate::utils::{check_required_tools, mask_password, sanitize_identifier};
use anyhow::{Context, Result};

pub fn check(settings: &Settings) -> Result<()> {
    tracing::info!("Starting check...");

    // Step 1: Databases file
    let catalog = DatabaseCatalog::load(&settings.databases_file).with_context(|| {
        format!(
            "Failed to load databases file {}",
            settings.databases_file.display()
        )
    })?;
    tracing::info!(
        "✓ {} database alias(es) in {}",
        catalog.len(),
        settings.databases_file.display()
    );

    println!();
    println!(
        "{:<10} {:<12} {:<12} {:<10} {:<6}",
        "Alias", "Database", "User", "Password", "Remote"
    );
    println!("{}", "─".repeat(54));
    for alias in catalog.iter() {
        println!(
            "{:<10} {:<12} {:<12} {:<10} {:<6}",
            sanitize_identifier(&alias.alias),
            sanitize_identifier(&alias.database),
            sanitize_identifier(&alias.userid),
            mask_password(&alias.password),
            if alias.is_remote { "yes" } else { "no" }
        );
    }
    println!();

    // Step 2: Tables file
    let tables = TableList::load(&settings.tables_file).with_context(|| {
        format!(
            "Failed to load tables file {}",
            settings.tables_file.display()
        )
    })?;
    tracing::info!(
        "✓ {} table(s) in {}",
        tables.len(),
        settings.tables_file.display()
    );
    if tables.is_empty() {
        tracing::warn!("⚠ No tables configured, a copy would do nothing");
    }

    println!("{:<30} {:<16} {:<8}", "Table", "Identity", "Reload");
    println!("{}", "─".repeat(56));
    for table in &tables {
        println!(
            "{:<30} {:<16} {:<8}",
            sanitize_identifier(&table.qualified_name()),
            sanitize_identifier(table.identity_column.as_deref().unwrap_or("-")),
            if table.uses_load() { "load" } else { "import" }
        );
    }
    println!();

    // Step 3: Client program
    let client = check_required_tools(&settings.client)?;
    tracing::info!("✓ Using {}", client.display());

    if let Some(filter) = settings.row_filter() {
        tracing::info!("Row filter: where {}", filter);
    }

    tracing::info!("✅ Check complete");
    Ok(())
}
