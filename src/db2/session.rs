// ABOUTME: Connect to and disconnect from a configured database alias

use super::statements::{connect_statement, reset_statement};
use super::DbClient;
use crate::config::DatabaseAlias;
use anyhow::Result;

/// Connect the command line processor to `alias`; `Ok(false)` if the connect failed
pub async fn connect<C: DbClient>(client: &mut C, alias: &DatabaseAlias) -> Result<bool> {
    tracing::info!("Connecting to '{}' ({})...", alias.alias, alias.database);
    let statement = connect_statement(&alias.database, &alias.userid, &alias.password);
    let connected = client.run(&statement).await?;

    if connected {
        tracing::info!("✓ Connected to '{}'", alias.alias);
    } else {
        tracing::warn!("⚠ Could not connect to '{}' ({})", alias.alias, alias.database);
    }
    Ok(connected)
}

/// Drop the current connection; a failed reset is only worth a warning
pub async fn disconnect<C: DbClient>(client: &mut C) -> Result<()> {
    if !client.run(&reset_statement()).await? {
        tracing::warn!("⚠ connect reset failed");
    }
    Ok(())
}
