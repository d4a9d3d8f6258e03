// ABOUTME: Builds the command text handed to the command line processor
// ABOUTME: Connect, count/max queries, export, reload, and identity restart

use crate::config::TableSpec;

fn where_clause(filter: Option<&str>) -> String {
    match filter {
        Some(f) => format!(" where {}", f),
        None => String::new(),
    }
}

/// `connect to` statement; credentials are only passed when a user id is set
pub fn connect_statement(database: &str, userid: &str, password: &str) -> String {
    if userid.trim().is_empty() {
        format!("connect to {}", database)
    } else {
        format!("connect to {} user {} using {}", database, userid, password)
    }
}

pub fn reset_statement() -> String {
    "connect reset".to_string()
}

pub fn count_statement(schema: &str, table: &str, filter: Option<&str>) -> String {
    format!(
        "select count(*) from {}.{}{}",
        schema,
        table,
        where_clause(filter)
    )
}

pub fn max_statement(schema: &str, table: &str, column: &str, filter: Option<&str>) -> String {
    format!(
        "select max({}) from {}.{}{}",
        column,
        schema,
        table,
        where_clause(filter)
    )
}

/// Export a table to `<table>.ixf` in the working directory
pub fn export_statement(schema: &str, table: &str, filter: Option<&str>) -> String {
    format!(
        "export to {t}.ixf of ixf messages {t}.msg select * from {s}.{t}{w}",
        t = table,
        s = schema,
        w = where_clause(filter)
    )
}

/// Reload `<table>.ixf` into the target
///
/// Identity tables, and tables configured for `load`, use `load client` so
/// that `identityoverride` can keep the exported key values. Everything else
/// goes through `import`.
pub fn reload_statement(spec: &TableSpec) -> String {
    let mut statement = if spec.uses_load() {
        let mut s = format!("load client from {}.ixf of ixf ", spec.table);
        if spec.identity_column.is_some() {
            s.push_str("modified by identityoverride ");
        }
        s
    } else {
        format!("import from {}.ixf of ixf ", spec.table)
    };

    statement.push_str(&format!(
        "messages {}_load.msg create into {}",
        spec.table,
        spec.qualified_name()
    ));
    statement
}

pub fn restart_identity_statement(schema: &str, table: &str, column: &str, next: i64) -> String {
    format!(
        "alter table {}.{} alter column {} restart with {}",
        schema, table, column, next
    )
}

/// Copy of `command` safe for logs: the value after `using` is masked
pub fn redact(command: &str) -> String {
    let mut words: Vec<&str> = command.split(' ').collect();
    for i in 0..words.len() {
        if words[i].eq_ignore_ascii_case("using") && i + 1 < words.len() {
            words[i + 1] = "********";
        }
    }
    words.join(" ")
}
