//! SQLite-backed fact repository.
//!
//! # Responsibility
//! - Provide the fact CRUD contract over the `Facts` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Every operation is a single statement; no multi-call transactions.
//! - Read paths reject invalid persisted state instead of masking it.
//! - The connection is owned by the repository and closed on drop.

use crate::db::{open_db, open_db_in_memory, schema::ensure_schema};
use crate::model::fact::{
    parse_storage_timestamp, timestamp_to_storage, Fact, FactDraft, FactId,
};
use crate::repo::fact_repo::{FactRepository, RepoError, RepoResult};
use chrono::Utc;
use log::debug;
use rusqlite::{params, Connection, Row};
use std::path::Path;

const FACT_COLUMNS: &str = "Id, Text, Category, CreatedAt, IsVerified";

/// SQLite-backed fact repository.
#[derive(Debug)]
pub struct SqliteFactRepository {
    conn: Connection,
}

impl SqliteFactRepository {
    /// Opens (creating if absent) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> RepoResult<Self> {
        Ok(Self {
            conn: open_db(path)?,
        })
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> RepoResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
        })
    }

    /// Wraps an already open connection, ensuring the schema first.
    pub fn from_connection(conn: Connection) -> RepoResult<Self> {
        ensure_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Gives the connection back to the caller.
    pub fn into_connection(self) -> Connection {
        self.conn
    }
}

impl FactRepository for SqliteFactRepository {
    fn list_facts(&self) -> RepoResult<Vec<Fact>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {FACT_COLUMNS} FROM Facts ORDER BY Id;"))?;
        let mut rows = stmt.query([])?;
        let mut facts = Vec::new();

        while let Some(row) = rows.next()? {
            facts.push(parse_fact_row(row)?);
        }

        Ok(facts)
    }

    fn get_fact(&self, id: FactId) -> RepoResult<Option<Fact>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {FACT_COLUMNS} FROM Facts WHERE Id = ?1;"))?;
        let mut rows = stmt.query([id])?;

        match rows.next()? {
            Some(row) => Ok(Some(parse_fact_row(row)?)),
            None => Ok(None),
        }
    }

    fn create_fact(&mut self, draft: &FactDraft) -> RepoResult<Fact> {
        let created_at = Utc::now();

        self.conn.execute(
            "INSERT INTO Facts (Text, Category, CreatedAt, IsVerified)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                draft.text.as_str(),
                draft.category.as_str(),
                timestamp_to_storage(&created_at),
                bool_to_int(draft.is_verified),
            ],
        )?;

        let id = self.conn.last_insert_rowid();
        debug!("event=fact_create module=repo backend=sqlite status=ok id={id}");
        Ok(Fact::from_draft(id, draft, created_at))
    }

    fn update_fact(&mut self, id: FactId, draft: &FactDraft) -> RepoResult<Option<Fact>> {
        let mut stmt = self.conn.prepare(&format!(
            "UPDATE Facts
             SET
                Text = ?1,
                Category = ?2,
                IsVerified = ?3
             WHERE Id = ?4
             RETURNING {FACT_COLUMNS};"
        ))?;

        let mut rows = stmt.query(params![
            draft.text.as_str(),
            draft.category.as_str(),
            bool_to_int(draft.is_verified),
            id,
        ])?;

        let updated = match rows.next()? {
            Some(row) => Some(parse_fact_row(row)?),
            None => None,
        };
        if updated.is_some() {
            debug!("event=fact_update module=repo backend=sqlite status=ok id={id}");
        }
        Ok(updated)
    }

    fn delete_fact(&mut self, id: FactId) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM Facts WHERE Id = ?1;", [id])?;

        if changed > 0 {
            debug!("event=fact_delete module=repo backend=sqlite status=ok id={id}");
        }
        Ok(changed > 0)
    }
}

fn parse_fact_row(row: &Row<'_>) -> RepoResult<Fact> {
    let id: FactId = row.get("Id")?;

    let created_text: String = row.get("CreatedAt")?;
    let created_at = parse_storage_timestamp(&created_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid timestamp `{created_text}` in Facts.CreatedAt for id {id}"
        ))
    })?;

    let is_verified = match row.get::<_, i64>("IsVerified")? {
        0 => false,
        1 => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid IsVerified value `{other}` in Facts.IsVerified for id {id}"
            )));
        }
    };

    Ok(Fact {
        id,
        text: row.get("Text")?,
        category: row.get("Category")?,
        created_at,
        is_verified,
    })
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
