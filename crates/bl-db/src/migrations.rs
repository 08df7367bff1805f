//! Embedded SQL migrations and runner.
//!
//! Migrations are stored as `&str` constants and executed in order.  A
//! `schema_migrations` table tracks which versions have been applied.

use rusqlite::Connection;
use bl_core::{Error, Result};

/// V1: the reviews table. Field constraints are enforced by the engine at
/// write time in addition to input validation; each CHECK is named
/// `ck_<column>` so [`write_error`] can report the offending field.
const V1_REVIEWS: &str = r#"
CREATE TABLE reviews (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    shop_name     TEXT    NOT NULL CONSTRAINT ck_shop_name CHECK (length(trim(shop_name)) > 0),
    burger_name   TEXT    NOT NULL CONSTRAINT ck_burger_name CHECK (length(trim(burger_name)) > 0),
    rating        INTEGER NOT NULL CONSTRAINT ck_rating CHECK (rating BETWEEN 1 AND 5),
    rating_style  INTEGER NOT NULL CONSTRAINT ck_rating_style CHECK (rating_style BETWEEN 1 AND 5),
    rating_volume INTEGER NOT NULL CONSTRAINT ck_rating_volume CHECK (rating_volume BETWEEN 1 AND 5),
    rating_patty  INTEGER NOT NULL CONSTRAINT ck_rating_patty CHECK (rating_patty BETWEEN 1 AND 5),
    rating_buns   INTEGER NOT NULL CONSTRAINT ck_rating_buns CHECK (rating_buns BETWEEN 1 AND 5),
    rating_sauce  INTEGER NOT NULL CONSTRAINT ck_rating_sauce CHECK (rating_sauce BETWEEN 1 AND 5),
    price         INTEGER NOT NULL CONSTRAINT ck_price CHECK (price >= 0),
    visit_date    TEXT    NOT NULL,
    image_url     TEXT,
    tags          TEXT,
    comment       TEXT
);
"#;

/// Ordered list of (version, sql) pairs.
const MIGRATIONS: &[(i64, &str)] = &[(1, V1_REVIEWS)];

const CHECK_PREFIX: &str = "ck_";

/// Map a failed review write onto the crate error.
///
/// A violated `ck_<column>` constraint becomes a validation error on that
/// column; anything else is a database error.
pub fn write_error(e: rusqlite::Error) -> Error {
    if let rusqlite::Error::SqliteFailure(err, Some(msg)) = &e {
        if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_CHECK {
            if let Some((_, column)) = msg.split_once(CHECK_PREFIX) {
                return Error::validation(column.trim(), "rejected by storage constraint");
            }
        }
    }
    Error::database(e.to_string())
}

/// Run all pending migrations on `conn`.
///
/// Creates the `schema_migrations` tracking table if it does not exist,
/// then applies each outstanding migration inside a transaction.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version    INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
    )
    .map_err(|e| Error::database(format!("Failed to create schema_migrations: {e}")))?;

    for &(version, sql) in MIGRATIONS {
        let already: bool = conn
            .query_row(
                "SELECT COUNT(*) > 0 FROM schema_migrations WHERE version = ?1",
                [version],
                |row| row.get(0),
            )
            .map_err(|e| Error::database(e.to_string()))?;

        if already {
            continue;
        }

        let tx = conn
            .unchecked_transaction()
            .map_err(|e| Error::database(e.to_string()))?;

        tx.execute_batch(sql)
            .map_err(|e| Error::database(format!("Migration V{version} failed: {e}")))?;

        tx.execute(
            "INSERT INTO schema_migrations (version) VALUES (?1)",
            [version],
        )
        .map_err(|e| Error::database(e.to_string()))?;

        tx.commit()
            .map_err(|e| Error::database(e.to_string()))?;

        tracing::debug!(version, "Applied migration");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        // second call is a no-op
        run_migrations(&conn).unwrap();

        let applied: i64 = conn
            .query_row("SELECT COUNT(*) FROM schema_migrations", [], |row| row.get(0))
            .unwrap();
        assert_eq!(applied, MIGRATIONS.len() as i64);
    }

    #[test]
    fn test_rating_check_constraint() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let insert = |rating: i64| {
            conn.execute(
                "INSERT INTO reviews (shop_name, burger_name, rating, rating_style, rating_volume,
                    rating_patty, rating_buns, rating_sauce, price, visit_date)
                 VALUES ('Joe''s', 'Classic', ?1, 3, 3, 3, 3, 3, 10, '2024-01-15T12:00:00')",
                [rating],
            )
        };

        assert!(insert(5).is_ok());
        assert!(insert(0).is_err());
        assert!(insert(6).is_err());
    }

    #[test]
    fn test_check_violation_names_the_column() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let err = conn
            .execute(
                "INSERT INTO reviews (shop_name, burger_name, rating, rating_style, rating_volume,
                    rating_patty, rating_buns, rating_sauce, price, visit_date)
                 VALUES ('a', 'b', 3, 3, 3, 3, 3, 9, 10, '2024-01-15T12:00:00')",
                [],
            )
            .unwrap_err();
        match write_error(err) {
            Error::Validation(errors) => {
                assert_eq!(errors.fields()[0].field, "rating_sauce");
            }
            other => panic!("expected validation error, got {other:?}"),
        }

        let err = conn.execute("INSERT INTO missing_table VALUES (1)", []).unwrap_err();
        assert!(matches!(write_error(err), Error::Database { .. }));
    }

    #[test]
    fn test_required_columns() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let result = conn.execute(
            "INSERT INTO reviews (shop_name, burger_name, rating, rating_style, rating_volume,
                rating_patty, rating_buns, rating_sauce, price)
             VALUES ('a', 'b', 1, 1, 1, 1, 1, 1, 0)",
            [],
        );
        assert!(result.is_err(), "visit_date must be NOT NULL");

        let result = conn.execute(
            "INSERT INTO reviews (shop_name, burger_name, rating, rating_style, rating_volume,
                rating_patty, rating_buns, rating_sauce, price, visit_date)
             VALUES ('', 'b', 1, 1, 1, 1, 1, 1, 0, '2024-01-01T00:00:00')",
            [],
        );
        assert!(result.is_err(), "empty shop_name must be rejected");
    }
}
