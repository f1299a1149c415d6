//! Facts table definition.
//!
//! # Invariants
//! - `Id` uses AUTOINCREMENT so deleted ids are never handed out again.
//! - `CreatedAt` holds RFC 3339 UTC text; `IsVerified` holds 0 or 1.

use super::DbResult;
use rusqlite::Connection;

/// Name of the single table owned by the database backend.
pub const FACTS_TABLE: &str = "Facts";

const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Creates the `Facts` table when it does not exist yet.
pub fn ensure_schema(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{ensure_schema, FACTS_TABLE};
    use rusqlite::Connection;

    #[test]
    fn ensure_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();
        ensure_schema(&conn).unwrap();

        let columns: Vec<String> = conn
            .prepare(&format!("PRAGMA table_info({FACTS_TABLE});"))
            .unwrap()
            .query_map([], |row| row.get::<_, String>(1))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(
            columns,
            vec!["Id", "Text", "Category", "CreatedAt", "IsVerified"]
        );
    }
}
