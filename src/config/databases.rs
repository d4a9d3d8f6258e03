// ABOUTME: Database alias catalog read from the databases input file
// ABOUTME: Resolves short aliases (prod, dev, test) to connection details

use crate::delimited::{KeySpec, KeyedRows, Layout};
use anyhow::{bail, Context, Result};
use std::path::Path;

const COL_ALIAS: &str = "alias";
const COL_DATABASE: &str = "database";
const COL_USERID: &str = "userid";
const COL_PASSWORD: &str = "password";
const COL_IS_REMOTE: &str = "isRemote";

/// Connection details for one alias
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseAlias {
    /// Name the user refers to the database by; not the catalog alias
    pub alias: String,
    /// Catalog name handed to `connect to`
    pub database: String,
    pub userid: String,
    pub password: String,
    /// Remote targets are scripted instead of loaded
    pub is_remote: bool,
}

impl DatabaseAlias {
    pub fn has_credentials(&self) -> bool {
        !self.userid.trim().is_empty()
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value, "True" | "true" | "yes")
}

/// All aliases from the databases file, in file order
#[derive(Debug, Clone, Default)]
pub struct DatabaseCatalog {
    aliases: Vec<DatabaseAlias>,
}

impl DatabaseCatalog {
    /// Read the databases file
    ///
    /// The file must carry a layout record declaring at least `alias` and
    /// `database`; `userid`, `password` and `isRemote` are optional. Rows are
    /// keyed on their first field.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let layout = Layout::from_file(path)?;
        let rows = KeyedRows::from_file(path, &KeySpec::default())?;
        Self::from_rows(&layout, &rows)
    }

    pub fn from_rows(layout: &Layout, rows: &KeyedRows) -> Result<Self> {
        let mut aliases = Vec::with_capacity(rows.len());

        for (key, row) in rows.iter() {
            let alias = row.get(layout, COL_ALIAS)?.to_string();
            let database = row.get(layout, COL_DATABASE)?.to_string();
            if alias.is_empty() || database.is_empty() {
                bail!(
                    "Entry '{}' in {} needs both an alias and a database",
                    key,
                    layout.source().display()
                );
            }

            aliases.push(DatabaseAlias {
                alias,
                database,
                userid: row.get_or_empty(layout, COL_USERID).to_string(),
                password: row.get_or_empty(layout, COL_PASSWORD).to_string(),
                is_remote: is_truthy(row.get_or_empty(layout, COL_IS_REMOTE)),
            });
        }

        Ok(Self { aliases })
    }

    /// Find `alias`, or fail listing the aliases that do exist
    pub fn lookup(&self, alias: &str) -> Result<&DatabaseAlias> {
        self.aliases
            .iter()
            .rev()
            .find(|a| a.alias == alias)
            .with_context(|| {
                let known: Vec<&str> = self.aliases.iter().map(|a| a.alias.as_str()).collect();
                format!(
                    "Unknown database alias '{}'. Known aliases: {}",
                    alias,
                    known.join(", ")
                )
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = &DatabaseAlias> {
        self.aliases.iter()
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATABASES: &str = "\
# Databases
##Layout, alias, database, userid, password, isRemote
prod, PRODDB, produser, prodpw, False
dev, DEVDB, , ,
test, TESTDB, tester, secret, True
";

    fn catalog(text: &str) -> Result<DatabaseCatalog> {
        let layout = Layout::parse(text, "db2Databases.input")?;
        let rows = KeyedRows::parse(text, &KeySpec::default(), "db2Databases.input")?;
        DatabaseCatalog::from_rows(&layout, &rows)
    }

    #[test]
    fn test_load_aliases() {
        let catalog = catalog(DATABASES).unwrap();
        assert_eq!(catalog.len(), 3);

        let prod = catalog.lookup("prod").unwrap();
        assert_eq!(prod.database, "PRODDB");
        assert_eq!(prod.userid, "produser");
        assert!(!prod.is_remote);
        assert!(prod.has_credentials());

        let dev = catalog.lookup("dev").unwrap();
        assert!(!dev.has_credentials());

        assert!(catalog.lookup("test").unwrap().is_remote);
    }

    #[test]
    fn test_remote_flag_values() {
        assert!(is_truthy("True"));
        assert!(is_truthy("true"));
        assert!(is_truthy("yes"));
        assert!(!is_truthy("TRUE"));
        assert!(!is_truthy("1"));
        assert!(!is_truthy(""));
    }

    #[test]
    fn test_unknown_alias_lists_known() {
        let catalog = catalog(DATABASES).unwrap();
        let err = catalog.lookup("qa").unwrap_err().to_string();
        assert!(err.contains("'qa'"));
        assert!(err.contains("prod, dev, test"));
    }

    #[test]
    fn test_reordered_columns() {
        let text = "##Layout, isRemote, database, alias\nyes, REMOTEDB, far\n";
        let catalog = catalog(text).unwrap();
        let far = catalog.lookup("far").unwrap();
        assert_eq!(far.database, "REMOTEDB");
        assert!(far.is_remote);
        assert_eq!(far.password, "");
    }

    #[test]
    fn test_missing_database_column_is_error() {
        assert!(catalog("##Layout, alias, userid\nprod, u\n").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db2Databases.input");
        std::fs::write(&path, DATABASES).unwrap();

        let catalog = DatabaseCatalog::load(&path).unwrap();
        let names: Vec<&str> = catalog.iter().map(|a| a.alias.as_str()).collect();
        assert_eq!(names, vec!["prod", "dev", "test"]);
    }
}
