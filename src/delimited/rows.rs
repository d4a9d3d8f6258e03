// ABOUTME: Loads data rows of a delimited file into a map keyed by composite key
// ABOUTME: Keys are built from one-based field positions joined with '.'

use super::{Layout, DELIMITER};
use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// One-based field positions that make up a row key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySpec(Vec<usize>);

impl KeySpec {
    /// Highest one-based position the key reads
    fn widest(&self) -> usize {
        self.0.iter().copied().max().unwrap_or(1)
    }
}

impl Default for KeySpec {
    fn default() -> Self {
        Self(vec![1])
    }
}

impl FromStr for KeySpec {
    type Err = anyhow::Error;

    /// Parse `"1"` or `"1,2"`; a blank string means `"1"`
    fn from_str(s: &str) -> Result<Self> {
        if s.trim().is_empty() {
            return Ok(Self::default());
        }

        let mut positions = Vec::new();
        for part in s.split(DELIMITER) {
            let part = part.trim();
            let pos: usize = part
                .parse()
                .with_context(|| format!("Invalid key position '{}' in '{}'", part, s))?;
            if pos == 0 {
                bail!("Key positions are one-based, got 0 in '{}'", s);
            }
            positions.push(pos);
        }
        Ok(Self(positions))
    }
}

/// A data row: the trimmed fields of one line, in file order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row(Vec<String>);

impl Row {
    fn parse(line: &str) -> Self {
        Self(line.split(DELIMITER).map(|f| f.trim().to_string()).collect())
    }

    /// Field at zero-based `position`
    pub fn field(&self, position: usize) -> Option<&str> {
        self.0.get(position).map(String::as_str)
    }

    /// Field for column `name` as declared by `layout`
    pub fn get(&self, layout: &Layout, name: &str) -> Result<&str> {
        let position = layout.require(name)?;
        self.field(position).with_context(|| {
            format!(
                "Row {:?} in {} has no value for column '{}' (position {})",
                self.0,
                layout.source().display(),
                name,
                position + 1
            )
        })
    }

    /// Field for an optional column; empty when the layout or the row lacks it
    pub fn get_or_empty(&self, layout: &Layout, name: &str) -> &str {
        layout
            .position(name)
            .and_then(|p| self.field(p))
            .unwrap_or("")
    }

    pub fn fields(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Rows of a delimited file keyed by their composite key, in file order
#[derive(Debug, Clone, Default)]
pub struct KeyedRows {
    entries: Vec<(String, Row)>,
    index: HashMap<String, usize>,
}

impl KeyedRows {
    /// Read `path` and key its data rows by `key_spec`
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or a row is too short to
    /// supply every key position.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use anyhow::Result;
    /// # use db2_table_copier::delimited::KeyedRows;
    /// # fn example() -> Result<()> {
    /// let tables = KeyedRows::from_file("db2Tables.input", &"1,2".parse()?)?;
    /// let row = tables.get("APP.ORDERS");
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_file(path: impl AsRef<Path>, key_spec: &KeySpec) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Error processing: {}", path.display()))?;
        Self::parse(&text, key_spec, path)
    }

    /// Key the rows of already-loaded text; `source` is only used in messages
    pub fn parse(text: &str, key_spec: &KeySpec, source: impl AsRef<Path>) -> Result<Self> {
        let source: PathBuf = source.as_ref().to_path_buf();
        let mut rows = Self::default();

        for (line_no, line) in text.lines().enumerate() {
            // Comments, including the layout record
            if line.starts_with('#') || line.trim().is_empty() {
                continue;
            }

            let row = Row::parse(line);
            if row.len() < key_spec.widest() {
                bail!(
                    "{}:{}: row has {} field(s) but the key needs position {}",
                    source.display(),
                    line_no + 1,
                    row.len(),
                    key_spec.widest()
                );
            }

            let key = key_spec
                .0
                .iter()
                .map(|&pos| row.0[pos - 1].as_str())
                .collect::<Vec<_>>()
                .join(".");
            let key = key.trim_matches('.').to_string();

            tracing::debug!("Key {} -> {:?}", key, row.0);
            rows.insert(key, row, &source);
        }

        Ok(rows)
    }

    fn insert(&mut self, key: String, row: Row, source: &Path) {
        match self.index.get(&key) {
            Some(&slot) => {
                tracing::warn!(
                    "Warning: {} is duplicated in {}, second value used",
                    key,
                    source.display()
                );
                self.entries[slot].1 = row;
            }
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, row));
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Row> {
        self.index.get(key).map(|&slot| &self.entries[slot].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Row)> {
        self.entries.iter().map(|(k, r)| (k.as_str(), r))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLES: &str = "\
# Tables to copy
##Layout, schema, tableName, identityColumn, typeOfLoad
APP, ORDERS, ORDER_ID, load
APP , CUSTOMERS, , import

REF, COUNTRIES
";

    #[test]
    fn test_key_spec_parse() {
        assert_eq!("1".parse::<KeySpec>().unwrap(), KeySpec(vec![1]));
        assert_eq!(" 1, 2 ".parse::<KeySpec>().unwrap(), KeySpec(vec![1, 2]));
        assert_eq!("  ".parse::<KeySpec>().unwrap(), KeySpec::default());
        assert!("0".parse::<KeySpec>().is_err());
        assert!("1,x".parse::<KeySpec>().is_err());
        assert!("-1".parse::<KeySpec>().is_err());
    }

    #[test]
    fn test_composite_keys_in_file_order() {
        let rows = KeyedRows::parse(TABLES, &"1,2".parse().unwrap(), "t").unwrap();
        let keys: Vec<&str> = rows.keys().collect();
        assert_eq!(keys, vec!["APP.ORDERS", "APP.CUSTOMERS", "REF.COUNTRIES"]);

        let customers = rows.get("APP.CUSTOMERS").unwrap();
        assert_eq!(customers.fields(), &["APP", "CUSTOMERS", "", "import"]);
    }

    #[test]
    fn test_key_order_follows_spec() {
        let rows = KeyedRows::parse(TABLES, &"2,1".parse().unwrap(), "t").unwrap();
        assert!(rows.get("ORDERS.APP").is_some());
    }

    #[test]
    fn test_duplicate_key_second_value_wins() {
        let text = "##Layout, alias, database\ndev, DEV1\nprod, PRD\ndev, DEV2\n";
        let rows = KeyedRows::parse(text, &KeySpec::default(), "t").unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows.get("dev").unwrap().field(1), Some("DEV2"));
        // Keeps the slot of its first appearance
        assert_eq!(rows.keys().next(), Some("dev"));
    }

    #[test]
    fn test_key_dots_are_trimmed() {
        let text = ", X\n";
        let rows = KeyedRows::parse(text, &"1,2".parse().unwrap(), "t").unwrap();
        assert!(rows.get("X").is_some());
    }

    #[test]
    fn test_short_row_is_error() {
        let err = KeyedRows::parse("##Layout, a, b\nonly\n", &"1,2".parse().unwrap(), "f.input")
            .unwrap_err()
            .to_string();
        assert!(err.contains("f.input:2"));
    }

    #[test]
    fn test_row_lookup_through_layout() {
        let layout = Layout::parse(TABLES, "t").unwrap();
        let rows = KeyedRows::parse(TABLES, &"1,2".parse().unwrap(), "t").unwrap();

        let countries = rows.get("REF.COUNTRIES").unwrap();
        assert_eq!(countries.get(&layout, "tableName").unwrap(), "COUNTRIES");
        assert!(countries.get(&layout, "identityColumn").is_err());
        assert_eq!(countries.get_or_empty(&layout, "identityColumn"), "");
        assert_eq!(countries.get_or_empty(&layout, "notDeclared"), "");
        assert!(countries.get(&layout, "notDeclared").is_err());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db2Tables.input");
        std::fs::write(&path, TABLES).unwrap();

        let rows = KeyedRows::from_file(&path, &"1,2".parse().unwrap()).unwrap();
        assert_eq!(rows.len(), 3);
    }
}
