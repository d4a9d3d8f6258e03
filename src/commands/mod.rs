// ABOUTME: Command implementations behind each CLI subcommand
// ABOUTME: Exports copy, counts, and check

pub mod check;
pub mod copy;
pub mod counts;

pub use check::check;
pub use copy::{copy, CopyJob, CopySummary};
pub use counts::counts;

#[cfg(test)]
pub(crate) mod tests {
    use crate::config::{DatabaseCatalog, TableList};
    use crate::delimited::{KeyedRows, Layout};

    const DATABASES: &str = "\
##Layout, alias, database, userid, password, isRemote
prod, PRODDB, produser, prodpw, False
dev, DEVDB, , , False
far, FARDB, faruser, farpw, True
";

    const TABLES: &str = "\
##Layout, schema, tableName, identityColumn, typeOfLoad
APP, ORDERS, ORDER_ID, load
APP, CUSTOMERS, , import
REF, COUNTRIES, , load
";

    pub(crate) fn catalog() -> DatabaseCatalog {
        let layout = Layout::parse(DATABASES, "db2Databases.input").unwrap();
        let rows = KeyedRows::parse(DATABASES, &Default::default(), "db2Databases.input").unwrap();
        DatabaseCatalog::from_rows(&layout, &rows).unwrap()
    }

    pub(crate) fn tables() -> TableList {
        let layout = Layout::parse(TABLES, "db2Tables.input").unwrap();
        let rows = KeyedRows::parse(TABLES, &"1,2".parse().unwrap(), "db2Tables.input").unwrap();
        TableList::from_rows(&layout, &rows).unwrap()
    }
}
