use rusqlite::Connection;
use student_registry_core::db::open_db_in_memory;
use student_registry_core::{DbError, Filter, FilterError, Specification, Student, User};

#[test]
fn index_filter_returns_matching_record_on_both_paths() {
    let conn = open_db_in_memory().unwrap();
    let id = insert_user(&conn, "yuno123", "yuno@mail.com");

    let by_key: User = Filter::Index
        .filter(&Specification::id(id), &conn, None)
        .unwrap()
        .unwrap();
    let by_query: User = Filter::Index
        .filter(&Specification::id(id), &conn, Some("id"))
        .unwrap()
        .unwrap();

    assert_eq!(by_key, by_query);
    assert_eq!(by_key.username, "yuno123");
    assert_eq!(by_key.email, "yuno@mail.com");
    assert!(by_key.is_active);
    assert!(!by_key.is_superuser);
    assert!(by_key.created_at > 0);
    assert_eq!(by_key.updated_at, None);
}

#[test]
fn index_filter_returns_none_for_missing_id() {
    let conn = open_db_in_memory().unwrap();

    let missing = Filter::Index
        .filter::<User>(&Specification::id(404), &conn, None)
        .unwrap();
    assert!(missing.is_none());

    let missing_by_query = Filter::Index
        .filter::<User>(&Specification::id(404), &conn, Some("id"))
        .unwrap();
    assert!(missing_by_query.is_none());
}

#[test]
fn exactly_one_lookup_reports_absence_as_storage_error() {
    let conn = open_db_in_memory().unwrap();
    let id = insert_user(&conn, "yuno123", "yuno@mail.com");

    let found: User = Filter::Index
        .filter_one(&Specification::id(id), &conn, None)
        .unwrap();
    assert_eq!(found.id, id);

    let by_id = Filter::Index
        .filter_one::<User>(&Specification::id(404), &conn, None)
        .unwrap_err();
    assert!(matches!(
        by_id,
        FilterError::Db(DbError::NoRowFound {
            table: "users",
            column: "id"
        })
    ));

    let by_email = Filter::Unique
        .filter_one::<User>(&Specification::email("nobody@mail.com"), &conn, None)
        .unwrap_err();
    assert!(matches!(
        by_email,
        FilterError::Db(DbError::NoRowFound {
            table: "users",
            column: "email"
        })
    ));
}

#[test]
fn index_filter_rejects_non_id_specifications() {
    let conn = open_db_in_memory().unwrap();

    let err = Filter::Index
        .filter::<User>(&Specification::username("yuno123"), &conn, None)
        .unwrap_err();
    assert!(matches!(err, FilterError::InvalidArgument(_)));
}

#[test]
fn index_filter_surfaces_storage_errors_unchanged() {
    let conn = Connection::open_in_memory().unwrap();

    let err = Filter::Index
        .filter::<User>(&Specification::id(1), &conn, None)
        .unwrap_err();
    assert!(matches!(err, FilterError::Db(DbError::Sqlite(_))));
}

#[test]
fn unique_filter_returns_exactly_one_record() {
    let conn = open_db_in_memory().unwrap();
    let id = insert_user(&conn, "yuno123", "yuno@mail.com");
    insert_user(&conn, "asta", "asta@mail.com");

    let by_username: User = Filter::Unique
        .filter(&Specification::username("yuno123"), &conn, Some("username"))
        .unwrap()
        .unwrap();
    assert_eq!(by_username.id, id);

    let by_email: User = Filter::Unique
        .filter(&Specification::email("yuno@mail.com"), &conn, Some("email"))
        .unwrap()
        .unwrap();
    assert_eq!(by_email.id, id);
}

#[test]
fn unique_filter_defaults_to_email_field() {
    let conn = open_db_in_memory().unwrap();
    let id = insert_user(&conn, "noelle", "noelle@mail.com");

    let found: User = Filter::Unique
        .filter(&Specification::email("noelle@mail.com"), &conn, None)
        .unwrap()
        .unwrap();
    assert_eq!(found.id, id);
}

#[test]
fn unique_filter_without_match_is_storage_error() {
    let conn = open_db_in_memory().unwrap();
    insert_user(&conn, "asta", "asta@mail.com");

    let err = Filter::Unique
        .filter::<User>(&Specification::username("nobody"), &conn, Some("username"))
        .unwrap_err();
    assert!(matches!(
        err,
        FilterError::Db(DbError::NoRowFound {
            table: "users",
            column: "username"
        })
    ));
}

#[test]
fn unique_filter_with_duplicate_rows_is_storage_error() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE users (
            id INTEGER PRIMARY KEY,
            username TEXT NOT NULL,
            email TEXT NOT NULL,
            password TEXT NOT NULL,
            is_active INTEGER NOT NULL DEFAULT 1,
            is_superuser INTEGER NOT NULL DEFAULT 0,
            created_at INTEGER NOT NULL DEFAULT 0,
            updated_at INTEGER
        );
        INSERT INTO users (username, email, password) VALUES ('twin', 'a@mail.com', 'x');
        INSERT INTO users (username, email, password) VALUES ('twin', 'b@mail.com', 'x');",
    )
    .unwrap();

    let err = Filter::Unique
        .filter::<User>(&Specification::username("twin"), &conn, Some("username"))
        .unwrap_err();
    assert!(matches!(
        err,
        FilterError::Db(DbError::MultipleRowsFound { count: 2, .. })
    ));
}

#[test]
fn unique_filter_rejects_unknown_field_before_querying() {
    // No schema: any executed query would fail with a storage error instead.
    let conn = Connection::open_in_memory().unwrap();

    let err = Filter::Unique
        .filter::<User>(&Specification::username("asta"), &conn, Some("nickname"))
        .unwrap_err();
    assert!(matches!(err, FilterError::InvalidArgument(_)));
}

#[test]
fn unique_filter_rejects_mismatched_specification() {
    let conn = open_db_in_memory().unwrap();

    let id_spec = Filter::Unique
        .filter::<User>(&Specification::id(1), &conn, Some("username"))
        .unwrap_err();
    assert!(matches!(id_spec, FilterError::InvalidArgument(_)));

    let crossed = Filter::Unique
        .filter::<User>(&Specification::email("a@mail.com"), &conn, Some("username"))
        .unwrap_err();
    assert!(matches!(crossed, FilterError::InvalidArgument(_)));
}

#[test]
fn unique_filter_rejects_record_kind_without_unique_column() {
    let conn = open_db_in_memory().unwrap();

    let err = Filter::Unique
        .filter::<Student>(&Specification::email("a@mail.com"), &conn, Some("email"))
        .unwrap_err();
    assert!(matches!(err, FilterError::InvalidArgument(_)));
}

fn insert_user(conn: &Connection, username: &str, email: &str) -> i64 {
    conn.execute(
        "INSERT INTO users (username, email, password) VALUES (?1, ?2, 'hashed');",
        [username, email],
    )
    .unwrap();
    conn.last_insert_rowid()
}
