use student_registry_core::db::migrations::latest_version;
use student_registry_core::db::{open_db, open_db_in_memory, Database, DbError, SessionProvider};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_table_exists(&conn, "users");
    assert_table_exists(&conn, "students");
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("registry.db");

    let conn_first = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    drop(conn_first);

    let conn_second = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_table_exists(&conn_second, "users");
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.db");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }

    assert!(matches!(
        Database::open(&path),
        Err(DbError::UnsupportedSchemaVersion { .. })
    ));
}

#[test]
fn sessions_enable_foreign_keys() {
    let db = Database::open_in_memory().unwrap();
    let session = db.acquire().unwrap();

    let enabled: i64 = session
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(enabled, 1);
}

#[test]
fn in_memory_sessions_share_committed_data() {
    let db = Database::open_in_memory().unwrap();
    assert!(db.path().is_none());

    {
        let session = db.acquire().unwrap();
        session
            .execute(
                "INSERT INTO users (username, email, password) VALUES ('noelle', 'noelle@mail.com', 'x');",
                [],
            )
            .unwrap();
    }

    let other = db.acquire().unwrap();
    assert_eq!(count_users(&other), 1);
}

#[test]
fn separate_in_memory_databases_are_isolated() {
    let first = Database::open_in_memory().unwrap();
    let second = Database::open_in_memory().unwrap();

    first
        .acquire()
        .unwrap()
        .execute(
            "INSERT INTO users (username, email, password) VALUES ('magna', 'magna@mail.com', 'x');",
            [],
        )
        .unwrap();

    assert_eq!(count_users(&second.acquire().unwrap()), 0);
}

#[test]
fn file_database_sessions_see_each_others_commits() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("registry.db");
    let db = Database::open(&path).unwrap();
    assert_eq!(db.path(), Some(path.as_path()));

    db.acquire()
        .unwrap()
        .execute(
            "INSERT INTO users (username, email, password) VALUES ('luck', 'luck@mail.com', 'x');",
            [],
        )
        .unwrap();

    assert_eq!(count_users(&db.acquire().unwrap()), 1);
}

fn count_users(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM users;", [], |row| row.get(0))
        .unwrap()
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
