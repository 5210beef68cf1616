//! End-to-end tests for the named-statement facade over SQLite.

use std::fs;
use std::path::Path;

use assert_matches::assert_matches;
use ssql_db::{
    Behavior, DatabaseConfig, Db, Error, FromRow, OnDuplicate, Querier, StatementsConfig,
};
use tempfile::{tempdir, TempDir};

const USERS_SQL: &str = "\
-- name: create_table
CREATE TABLE users (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT UNIQUE
)

-- name: insert
INSERT INTO users (id, name, email) VALUES (?, ?, ?)

-- name: get_by_id
SELECT * FROM users WHERE id = ?

-- name: list
SELECT * FROM users ORDER BY id
";

const ORDERS_SQL: &str = "\
-- name: create_table
CREATE TABLE orders (
    id INTEGER PRIMARY KEY,
    user_id INTEGER NOT NULL REFERENCES users (id),
    total REAL NOT NULL
)

-- name: insert
INSERT INTO orders (user_id, total) VALUES (:user_id, :total)

-- name: for_user
SELECT id, user_id, total FROM orders WHERE user_id = ? ORDER BY id
";

#[derive(Debug, PartialEq)]
struct User {
    id: i64,
    name: String,
    email: Option<String>,
}

impl FromRow for User {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(User {
            id: row.get("id")?,
            name: row.get("name")?,
            email: row.get("email")?,
        })
    }
}

#[derive(serde::Serialize)]
struct NewOrder {
    user_id: i64,
    total: f64,
}

fn write(dir: &Path, relative: &str, contents: &str) {
    let path = dir.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn statements_dir() -> TempDir {
    let dir = tempdir().unwrap();
    write(dir.path(), "sql/users.sql", USERS_SQL);
    write(dir.path(), "sql/shop/orders.sql", ORDERS_SQL);
    dir
}

fn open_with(dir: &TempDir, database: DatabaseConfig) -> Db {
    let statements = StatementsConfig::new(format!("{}/sql/**/*.sql", dir.path().display()));
    let db = Db::connect(&database, &statements).unwrap();
    db.exec("users.create_table", []).unwrap();
    db.exec("orders.create_table", []).unwrap();
    db
}

fn open(dir: &TempDir) -> Db {
    open_with(dir, DatabaseConfig::default())
}

#[test]
fn get_by_id_runs_the_named_sql_with_its_argument() {
    let dir = statements_dir();
    let db = open(&dir);

    assert_eq!(
        db.sql("users.get_by_id").unwrap(),
        "SELECT * FROM users WHERE id = ?"
    );

    db.exec(
        "users.insert",
        rusqlite::params![42, "ada", "ada@example.com"],
    )
    .unwrap();
    db.exec("users.insert", rusqlite::params![7, "grace", None::<String>])
        .unwrap();

    let user: User = db.get("users.get_by_id", [42]).unwrap();
    assert_eq!(
        user,
        User {
            id: 42,
            name: "ada".into(),
            email: Some("ada@example.com".into()),
        }
    );
}

#[test]
fn select_scans_every_row() {
    let dir = statements_dir();
    let db = open(&dir);

    db.exec("users.insert", rusqlite::params![2, "b", None::<String>])
        .unwrap();
    db.exec("users.insert", rusqlite::params![1, "a", None::<String>])
        .unwrap();

    let users: Vec<User> = db.select("users.list", []).unwrap();
    assert_eq!(
        users.iter().map(|u| u.id).collect::<Vec<_>>(),
        vec![1, 2]
    );
}

#[test]
fn named_exec_binds_struct_fields() {
    let dir = statements_dir();
    let db = open(&dir);
    db.exec("users.insert", rusqlite::params![1, "ada", None::<String>])
        .unwrap();

    let first = db
        .named_exec("orders.insert", &NewOrder { user_id: 1, total: 9.5 })
        .unwrap();
    let second = db
        .named_exec("orders.insert", &NewOrder { user_id: 1, total: 20.0 })
        .unwrap();
    assert_eq!(first.rows_affected, 1);
    assert_eq!(second.last_insert_rowid, first.last_insert_rowid + 1);

    let orders: Vec<(i64, i64, f64)> = db.select("orders.for_user", [1]).unwrap();
    assert_eq!(orders, vec![(1, 1, 9.5), (2, 1, 20.0)]);
}

#[test]
fn missing_tag_fails_without_touching_the_pool() {
    let dir = statements_dir();
    let db = open_with(
        &dir,
        DatabaseConfig {
            max_connections: 1,
            connection_timeout_ms: 200,
            ..DatabaseConfig::default()
        },
    );

    // The only pooled connection is checked out by the transaction.
    let tx = db.begin().unwrap();

    let err = db.exec("orders.missing_tag", [1]).unwrap_err();
    assert_matches!(
        err,
        Error::Statement(ssql_statements::Error::NotFound(ref name)) if name == "orders.missing_tag"
    );
    assert!(err.is_not_found());

    // A resolvable name does need a connection and times out.
    assert_matches!(
        db.exec("users.insert", rusqlite::params![1, "a", None::<String>]),
        Err(Error::Pool(_))
    );

    tx.rollback().unwrap();
}

#[test]
fn rollback_discards_transaction_work() {
    let dir = statements_dir();
    let db = open(&dir);

    let tx = db.begin().unwrap();
    tx.exec("users.insert", rusqlite::params![1, "ada", None::<String>])
        .unwrap();
    let inside: Option<User> = tx.get_optional("users.get_by_id", [1]).unwrap();
    assert!(inside.is_some());

    tx.rollback().unwrap();

    let after: Option<User> = db.get_optional("users.get_by_id", [1]).unwrap();
    assert!(after.is_none());

    let conn = db.pool().get().unwrap();
    assert!(conn.is_autocommit());
}

#[test]
fn commit_makes_transaction_work_visible() {
    let dir = statements_dir();
    let db = open(&dir);

    let tx = db.begin_with(Behavior::Immediate).unwrap();
    tx.exec("users.insert", rusqlite::params![1, "ada", None::<String>])
        .unwrap();
    tx.named_exec("orders.insert", &NewOrder { user_id: 1, total: 3.0 })
        .unwrap();
    tx.commit().unwrap();

    let orders: Vec<(i64, i64, f64)> = db.select("orders.for_user", [1]).unwrap();
    assert_eq!(orders.len(), 1);
}

#[test]
fn constraint_violations_pass_through_unchanged() {
    let dir = statements_dir();
    let db = open(&dir);

    // Foreign keys are enforced by default.
    let err = db
        .named_exec("orders.insert", &NewOrder { user_id: 99, total: 1.0 })
        .unwrap_err();
    assert_matches!(
        err,
        Error::Sqlite(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::ConstraintViolation
    );
}

#[test]
fn open_with_driver_dsn_and_pattern() {
    let dir = statements_dir();
    let db_path = dir.path().join("app.db");
    let pattern = format!("{}/sql/**/*.sql", dir.path().display());

    let db = Db::open("sqlite", &db_path.to_string_lossy(), &pattern).unwrap();
    db.exec("users.create_table", []).unwrap();
    db.exec("users.insert", rusqlite::params![1, "ada", None::<String>])
        .unwrap();
    drop(db);

    // A second facade over the same file sees the committed row.
    let db = Db::open("sqlite3", &db_path.to_string_lossy(), &pattern).unwrap();
    let user: User = db.get("users.get_by_id", [1]).unwrap();
    assert_eq!(user.name, "ada");
}

#[test]
fn construction_fails_on_bad_statement_file() {
    let dir = statements_dir();
    write(dir.path(), "sql/broken.sql", "SELECT 1\n");

    let statements = StatementsConfig::new(format!("{}/sql/**/*.sql", dir.path().display()));
    let err = Db::connect(&DatabaseConfig::default(), &statements).unwrap_err();
    assert_matches!(
        err,
        Error::Statement(ssql_statements::Error::Parse { .. })
    );
}

#[test]
fn construction_fails_on_unknown_driver() {
    let dir = statements_dir();
    let pattern = format!("{}/sql/**/*.sql", dir.path().display());

    let err = Db::open("postgres", "postgres://localhost/app", &pattern).unwrap_err();
    assert_matches!(err, Error::UnsupportedDriver(_));
}

#[test]
fn duplicate_policy_comes_from_config() {
    let dir = statements_dir();
    write(dir.path(), "sql/zz/users.sql", "-- name: extra\nSELECT 1\n");

    let pattern = format!("{}/sql/**/*.sql", dir.path().display());
    let statements = StatementsConfig {
        pattern,
        on_duplicate: OnDuplicate::Reject,
    };
    let err = Db::connect(&DatabaseConfig::default(), &statements).unwrap_err();
    assert_matches!(
        err,
        Error::Statement(ssql_statements::Error::DuplicateNamespace { .. })
    );
}

#[test]
fn construction_fails_on_zero_pool_settings() {
    let dir = statements_dir();
    let statements = StatementsConfig::new(format!("{}/sql/**/*.sql", dir.path().display()));

    let err = Db::connect(
        &DatabaseConfig {
            connection_timeout_ms: 0,
            ..DatabaseConfig::default()
        },
        &statements,
    )
    .unwrap_err();
    assert_matches!(err, Error::InvalidConfig(_));

    let err = Db::connect(
        &DatabaseConfig {
            max_connections: 0,
            ..DatabaseConfig::default()
        },
        &statements,
    )
    .unwrap_err();
    assert_matches!(err, Error::InvalidConfig(_));
}
