// ABOUTME: Integration tests for the full copy workflow
// ABOUTME: Drives the commands against a fake db2 script that logs what it is asked to run

#![cfg(unix)]

use db2_table_copier::commands;
use db2_table_copier::config::Settings;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

const DATABASES: &str = "\
# alias is what you type on the command line, database is the catalog name
##Layout, alias, database, userid, password, isRemote
prod, PRODDB, produser, prodpw, False
dev, DEVDB, , , False
far, FARDB, faruser, farpw, True
";

const TABLES: &str = "\
##Layout, schema, tableName, identityColumn, typeOfLoad
APP, ORDERS, ORDER_ID, load
APP, CUSTOMERS, , import
";

/// Write a stand-in for db2 that records each statement and answers queries
fn fake_db2(dir: &Path) -> String {
    let log = dir.join("db2.log");
    let script = dir.join("db2");
    let body = format!(
        r#"#!/bin/sh
echo "$1" >> "{log}"
case "$1" in
  "select count(*)"*) printf '\n1\n-----------\n          0\n\n  1 record(s) selected.\n' ;;
  "select max("*) printf '\n1\n-----------\n         99\n\n  1 record(s) selected.\n' ;;
esac
exit 0
"#,
        log = log.display()
    );
    std::fs::write(&script, body).unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
    script.to_str().unwrap().to_string()
}

fn settings(dir: &Path) -> Settings {
    let databases = dir.join("db2Databases.input");
    let tables = dir.join("db2Tables.input");
    std::fs::write(&databases, DATABASES).unwrap();
    std::fs::write(&tables, TABLES).unwrap();

    Settings {
        client: fake_db2(dir),
        databases_file: databases,
        tables_file: tables,
        scratch_file: dir.join("db2out.txt"),
        load_list_file: dir.join("db2LoadList.txt"),
        load_script_file: dir.join("db2LoadCommands.sql"),
        row_filter: None,
    }
}

fn logged(dir: &Path) -> Vec<String> {
    std::fs::read_to_string(dir.join("db2.log"))
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

#[tokio::test]
async fn test_copy_and_counts_with_fake_client() {
    let dir = tempfile::tempdir().unwrap();
    let settings = settings(dir.path());

    // Copy to one local and one remote target
    let targets = vec!["dev".to_string(), "far".to_string()];
    let summary = commands::copy(&settings, "prod", &targets, false)
        .await
        .expect("copy should succeed against the fake client");

    assert!(!summary.cancelled);
    assert!(!summary.has_failures());
    assert_eq!(summary.unloaded, 2);
    // Two local loads plus two scripted remote loads
    assert_eq!(summary.loaded, 4);
    assert!(summary.remote_files_written);

    let log = logged(dir.path());
    assert!(log.contains(&"connect to PRODDB user produser using prodpw".to_string()));
    assert!(log.contains(
        &"alter table APP.ORDERS alter column ORDER_ID restart with 100".to_string()
    ));
    assert!(!log.iter().any(|l| l.contains("FARDB")));

    let list = std::fs::read_to_string(&settings.load_list_file).unwrap();
    assert_eq!(list, "$1 ORDERS.ixf $2\n$1 CUSTOMERS.ixf $2\n");

    let script = std::fs::read_to_string(&settings.load_script_file).unwrap();
    assert_eq!(
        script,
        "load client from ORDERS.ixf of ixf modified by identityoverride messages ORDERS_load.msg create into APP.ORDERS;\n\
         alter table APP.ORDERS alter column ORDER_ID restart with 100;\n\
         import from CUSTOMERS.ixf of ixf messages CUSTOMERS_load.msg create into APP.CUSTOMERS;\n"
    );

    // Counts over the same fake client
    let total = commands::counts(&settings, "dev").await.unwrap();
    assert_eq!(total, 0);

    // Unknown aliases are rejected before anything runs
    let before = logged(dir.path()).len();
    let result = commands::counts(&settings, "qa").await;
    assert!(result.is_err());
    assert_eq!(logged(dir.path()).len(), before);
}
