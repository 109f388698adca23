// Schema migrations against fresh and partially-migrated databases

use rusqlite::Connection;
use stepvc_store::migrations::{applied_migrations, apply_migrations, migration_ids, LEDGER_TABLE};

fn migrated() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    apply_migrations(&mut conn).unwrap();
    conn
}

fn tables(conn: &Connection) -> Vec<String> {
    conn.prepare("SELECT name FROM sqlite_master WHERE type = 'table'")
        .unwrap()
        .query_map([], |row| row.get::<_, String>(0))
        .unwrap()
        .map(|name| name.unwrap())
        .collect()
}

#[test]
fn test_fresh_database_gets_every_table() {
    let conn = migrated();
    let present = tables(&conn);
    let wanted = [
        LEDGER_TABLE,
        "configs",
        "snapshots",
        "commits",
        "branches",
        "tags",
        "stashes",
        "merge_requests",
    ];
    let missing: Vec<&str> = wanted
        .into_iter()
        .filter(|t| !present.iter().any(|p| p == t))
        .collect();
    assert!(missing.is_empty(), "tables not created: {:?}", missing);
}

#[test]
fn test_rerun_is_a_no_op() {
    let mut conn = migrated();
    let rerun = apply_migrations(&mut conn).unwrap();

    assert!(rerun.applied.is_empty());
    assert_eq!(rerun.already_applied, migration_ids());
    assert_eq!(applied_migrations(&conn).unwrap(), migration_ids());
}

#[test]
fn test_ledger_stores_sha256_hex() {
    let conn = migrated();
    let sums: Vec<String> = conn
        .prepare(&format!("SELECT checksum FROM {LEDGER_TABLE}"))
        .unwrap()
        .query_map([], |row| row.get(0))
        .unwrap()
        .map(|s| s.unwrap())
        .collect();
    assert_eq!(sums.len(), migration_ids().len());
    assert!(sums
        .iter()
        .all(|s| s.len() == 64 && s.chars().all(|c| c.is_ascii_hexdigit())));
}

#[test]
fn test_edited_migration_is_rejected() {
    let mut conn = migrated();
    conn.execute(
        &format!("UPDATE {LEDGER_TABLE} SET checksum = 'deadbeef' WHERE migration_id = ?1"),
        ["001_initial_schema"],
    )
    .unwrap();

    let err = apply_migrations(&mut conn).unwrap_err();
    assert_eq!(err.op(), Some("migration_checksum"));
    assert_eq!(err.entity_id(), Some("001_initial_schema"));
    assert!(err.message().contains("deadbeef"));
}

#[test]
fn test_partial_ledger_runs_only_missing() {
    let mut conn = migrated();
    conn.execute_batch(&format!(
        "DROP TABLE merge_requests; DROP TABLE stashes;
         DELETE FROM {LEDGER_TABLE} WHERE migration_id = '002_stashes_and_merge_requests';"
    ))
    .unwrap();

    let report = apply_migrations(&mut conn).unwrap();
    assert_eq!(report.applied, vec!["002_stashes_and_merge_requests"]);
    assert_eq!(report.already_applied, vec!["001_initial_schema"]);
    assert!(tables(&conn).iter().any(|t| t == "stashes"));
}

#[test]
fn test_ledger_gap_is_rejected() {
    let mut conn = migrated();
    conn.execute(
        &format!("DELETE FROM {LEDGER_TABLE} WHERE migration_id = ?1"),
        ["001_initial_schema"],
    )
    .unwrap();

    let err = apply_migrations(&mut conn).unwrap_err();
    assert_eq!(err.op(), Some("migration_gap"));
    assert_eq!(err.entity_id(), Some("001_initial_schema"));
}
