// ABOUTME: Load plan for remote targets that cannot be loaded from this host
// ABOUTME: Writes a file transfer list and a statement script for manual execution

use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Artifacts for loading remote targets by hand
///
/// The transfer list has one line per exported file, `$1 <table>.ixf $2`, so
/// it can be turned into copy commands by substituting a program and a
/// destination (e.g. `scp` and `user@host:/home/db2inst1/db2data`). The
/// script holds the reload and identity restart statements, one per line
/// terminated by `;`, ready for `db2 -tsvf`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemotePlan {
    transfers: Vec<String>,
    statements: Vec<String>,
}

impl RemotePlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `<table>.ixf` for transfer
    pub fn add_transfer(&mut self, table: &str) {
        self.transfers.push(format!("$1 {}.ixf $2", table));
    }

    pub fn add_statement(&mut self, statement: &str) {
        self.statements.push(format!("{};", statement));
    }

    pub fn is_empty(&self) -> bool {
        self.transfers.is_empty() && self.statements.is_empty()
    }

    pub fn transfer_list(&self) -> String {
        join_lines(&self.transfers)
    }

    pub fn script(&self) -> String {
        join_lines(&self.statements)
    }

    /// Write both files, replacing whatever was there before
    pub fn write(&self, list_path: &Path, script_path: &Path) -> Result<()> {
        write_atomically(list_path, &self.transfer_list())?;
        write_atomically(script_path, &self.script())?;
        tracing::info!(
            "✓ Wrote {} transfer(s) to {} and {} statement(s) to {}",
            self.transfers.len(),
            list_path.display(),
            self.statements.len(),
            script_path.display()
        );
        Ok(())
    }
}

fn join_lines(lines: &[String]) -> String {
    lines.iter().map(|l| format!("{}\n", l)).collect()
}

/// Write through a temp file in the same directory so a partial file never appears
fn write_atomically(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
    file.write_all(contents.as_bytes())
        .with_context(|| format!("Failed to write {}", path.display()))?;
    file.persist(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_contents() {
        let mut plan = RemotePlan::new();
        assert!(plan.is_empty());

        plan.add_transfer("ORDERS");
        plan.add_statement("load client from ORDERS.ixf of ixf messages ORDERS_load.msg create into APP.ORDERS");
        plan.add_statement("alter table APP.ORDERS alter column ORDER_ID restart with 11");

        assert!(!plan.is_empty());
        assert_eq!(plan.transfer_list(), "$1 ORDERS.ixf $2\n");
        assert_eq!(
            plan.script(),
            "load client from ORDERS.ixf of ixf messages ORDERS_load.msg create into APP.ORDERS;\n\
             alter table APP.ORDERS alter column ORDER_ID restart with 11;\n"
        );
    }

    #[test]
    fn test_write_replaces_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        let list = dir.path().join("db2LoadList.txt");
        let script = dir.path().join("db2LoadCommands.sql");
        std::fs::write(&list, "old contents\nmore\n").unwrap();

        let mut plan = RemotePlan::new();
        plan.add_transfer("COUNTRIES");
        plan.add_statement("import from COUNTRIES.ixf of ixf messages COUNTRIES_load.msg create into REF.COUNTRIES");
        plan.write(&list, &script).unwrap();

        assert_eq!(std::fs::read_to_string(&list).unwrap(), "$1 COUNTRIES.ixf $2\n");
        assert!(std::fs::read_to_string(&script)
            .unwrap()
            .ends_with("create into REF.COUNTRIES;\n"));
    }
}
