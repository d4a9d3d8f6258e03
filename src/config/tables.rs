// ABOUTME: Table list read from the tables input file
// ABOUTME: Each entry names a schema/table, its identity column, and how to reload it

use crate::delimited::{KeyedRows, Layout};
use anyhow::{bail, Result};
use std::fmt;
use std::path::Path;

const COL_SCHEMA: &str = "schema";
const COL_TABLE: &str = "tableName";
const COL_IDENTITY: &str = "identityColumn";
const COL_LOAD_KIND: &str = "typeOfLoad";

/// How a table is reloaded on the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadKind {
    /// `import ... create into`, works on missing tables
    #[default]
    Import,
    /// `load client ...`, the table must already exist
    Load,
}

impl LoadKind {
    fn parse(value: &str, table: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "load" => LoadKind::Load,
            "import" | "" => LoadKind::Import,
            other => {
                tracing::warn!(
                    "⚠ Unrecognized typeOfLoad '{}' for {}, using import",
                    other,
                    table
                );
                LoadKind::Import
            }
        }
    }
}

impl fmt::Display for LoadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadKind::Import => write!(f, "import"),
            LoadKind::Load => write!(f, "load"),
        }
    }
}

/// One table to copy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSpec {
    /// `schema.table`, the key in the tables file
    pub key: String,
    pub schema: String,
    pub table: String,
    pub identity_column: Option<String>,
    pub load_kind: LoadKind,
}

impl TableSpec {
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema, self.table)
    }

    /// Identity tables always go through `load ... identityoverride`
    pub fn uses_load(&self) -> bool {
        self.identity_column.is_some() || self.load_kind == LoadKind::Load
    }
}

/// Tables to copy, in file order
#[derive(Debug, Clone, Default)]
pub struct TableList {
    tables: Vec<TableSpec>,
}

impl TableList {
    /// Read the tables file, keyed on `schema,tableName` (positions 1 and 2)
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let layout = Layout::from_file(path)?;
        let rows = KeyedRows::from_file(path, &"1,2".parse()?)?;
        Self::from_rows(&layout, &rows)
    }

    pub fn from_rows(layout: &Layout, rows: &KeyedRows) -> Result<Self> {
        let mut tables = Vec::with_capacity(rows.len());

        for (key, row) in rows.iter() {
            let schema = row.get(layout, COL_SCHEMA)?.to_string();
            let table = row.get(layout, COL_TABLE)?.to_string();
            if schema.is_empty() || table.is_empty() {
                bail!(
                    "Entry '{}' in {} needs both a schema and a tableName",
                    key,
                    layout.source().display()
                );
            }

            let identity = row.get_or_empty(layout, COL_IDENTITY);
            let identity_column = (!identity.is_empty()).then(|| identity.to_string());
            let load_kind = LoadKind::parse(row.get_or_empty(layout, COL_LOAD_KIND), key);

            if identity_column.is_some() && load_kind == LoadKind::Import {
                tracing::debug!("{} has an identity column, it will be loaded rather than imported", key);
            }

            tables.push(TableSpec {
                key: key.to_string(),
                schema,
                table,
                identity_column,
                load_kind,
            });
        }

        Ok(Self { tables })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TableSpec> {
        self.tables.iter()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl<'a> IntoIterator for &'a TableList {
    type Item = &'a TableSpec;
    type IntoIter = std::slice::Iter<'a, TableSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.tables.iter()
    }
}
