//! Catalog database schema.
//!
//! Holds the `item` table the categories are served from. Migrations are
//! versioned through `PRAGMA user_version` and safe to run repeatedly.

use rusqlite::Connection;
use tracing::info;

/// Version recorded once the `item` table exists.
pub const ITEM_TABLE_VERSION: i64 = 1;

pub fn version(conn: &Connection) -> rusqlite::Result<i64> {
    conn.query_row("PRAGMA user_version", [], |row| row.get(0))
}

/// Create the `item` table.
pub fn migrate_up(conn: &mut Connection) -> rusqlite::Result<()> {
    let tx = conn.transaction()?;
    tx.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS item (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            image VARCHAR(255) NOT NULL,
            title VARCHAR(255) NOT NULL
        );
        PRAGMA user_version = {ITEM_TABLE_VERSION};"
    ))?;
    tx.commit()?;
    info!("Schema at version {ITEM_TABLE_VERSION}");
    Ok(())
}

/// Drop the `item` table and every row in it.
pub fn migrate_down(conn: &mut Connection) -> rusqlite::Result<()> {
    let tx = conn.transaction()?;
    tx.execute_batch("DROP TABLE IF EXISTS item; PRAGMA user_version = 0;")?;
    tx.commit()?;
    info!("Schema reverted to version 0");
    Ok(())
}

#[cfg(test)]
mod tests {
    use rusqlite::params;

    use super::*;

    /// `(name, type, notnull, pk)` for each column of `table`.
    fn columns(conn: &Connection, table: &str) -> Vec<(String, String, bool, bool)> {
        let mut stmt = conn
            .prepare(&format!("PRAGMA table_info({table})"))
            .unwrap();
        stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, i64>(3)? == 1,
                row.get::<_, i64>(5)? > 0,
            ))
        })
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap()
    }

    fn table_exists(conn: &Connection, table: &str) -> bool {
        conn.query_row(
            "SELECT count(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            params![table],
            |row| row.get::<_, i64>(0),
        )
        .unwrap()
            == 1
    }

    #[test]
    fn test_up_creates_item_table() {
        let mut conn = Connection::open_in_memory().unwrap();
        migrate_up(&mut conn).unwrap();

        let columns = columns(&conn, "item");
        assert_eq!(
            columns,
            vec![
                ("id".to_string(), "INTEGER".to_string(), false, true),
                ("image".to_string(), "VARCHAR(255)".to_string(), true, false),
                ("title".to_string(), "VARCHAR(255)".to_string(), true, false),
            ]
        );
        assert_eq!(version(&conn).unwrap(), ITEM_TABLE_VERSION);
    }

    #[test]
    fn test_not_null_is_enforced() {
        let mut conn = Connection::open_in_memory().unwrap();
        migrate_up(&mut conn).unwrap();

        let missing_title = conn.execute("INSERT INTO item (image) VALUES ('lampadas.svg')", []);
        assert!(missing_title.is_err());

        conn.execute(
            "INSERT INTO item (image, title) VALUES (?1, ?2)",
            params!["lampadas.svg", "Lâmpadas"],
        )
        .unwrap();
        assert_eq!(conn.last_insert_rowid(), 1);
    }

    #[test]
    fn test_migrations_are_idempotent() {
        let mut conn = Connection::open_in_memory().unwrap();
        migrate_up(&mut conn).unwrap();
        conn.execute(
            "INSERT INTO item (image, title) VALUES ('pilhas.svg', 'Pilhas e Baterias')",
            [],
        )
        .unwrap();
        migrate_up(&mut conn).unwrap();

        let rows: i64 = conn
            .query_row("SELECT count(*) FROM item", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);

        migrate_down(&mut conn).unwrap();
        assert!(!table_exists(&conn, "item"));
        assert_eq!(version(&conn).unwrap(), 0);

        migrate_down(&mut conn).unwrap();
        assert!(!table_exists(&conn, "item"));
    }
}
