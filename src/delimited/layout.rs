// ABOUTME: Discovers the column layout declared in-band by a `##Layout` record
// ABOUTME: Maps each declared column name to its zero-based position in data rows

use super::DELIMITER;
use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Marker that starts a layout record
pub const LAYOUT_MARKER: &str = "##Layout";

/// Column layout of a delimited file
///
/// A layout record looks like `##Layout, alias, database, userid` and declares
/// that data rows carry `alias` at position 0, `database` at 1 and so on. The
/// column order is free, so readers must always resolve positions by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    source: PathBuf,
    positions: HashMap<String, usize>,
}

impl Layout {
    /// Read `path` and discover its layout
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains no layout record.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use anyhow::Result;
    /// # use db2_table_copier::delimited::Layout;
    /// # fn example() -> Result<()> {
    /// let layout = Layout::from_file("db2Databases.input")?;
    /// let alias_pos = layout.require("alias")?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Error processing: {}", path.display()))?;
        Self::parse(&text, path)
    }

    /// Discover the layout in already-loaded text; `source` is only used in messages
    pub fn parse(text: &str, source: impl AsRef<Path>) -> Result<Self> {
        let source = source.as_ref().to_path_buf();
        let mut positions = HashMap::new();

        for line in text.lines().filter(|l| l.starts_with(LAYOUT_MARKER)) {
            let fields: Vec<&str> = line.split(DELIMITER).map(str::trim).collect();
            tracing::debug!("Layout record in {}: {:?}", source.display(), fields);

            // Element 0 is the marker itself
            for (idx, name) in fields.iter().enumerate().skip(1) {
                if !name.is_empty() {
                    positions.insert((*name).to_string(), idx - 1);
                }
            }
        }

        if positions.is_empty() {
            bail!("No layout found in {}", source.display());
        }

        tracing::debug!("Layout for {}: {:?}", source.display(), positions);
        Ok(Self { source, positions })
    }

    /// Position of `name`, if the layout declares it
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    /// Position of `name`, or an error naming the file and the missing column
    pub fn require(&self, name: &str) -> Result<usize> {
        self.position(name).with_context(|| {
            format!(
                "Layout record in {} does not declare column '{}'",
                self.source.display(),
                name
            )
        })
    }

    /// File this layout was read from
    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
