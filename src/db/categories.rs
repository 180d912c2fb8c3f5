use super::db::Db;
use crate::libs::session::Session;
use anyhow::Result;
use clap::ValueEnum;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

const INSERT_CATEGORY: &str = "INSERT OR IGNORE INTO categories (user_id, kind, name) VALUES (?1, ?2, ?3)";
const SELECT_BY_KIND: &str = "SELECT name FROM categories WHERE user_id = ?1 AND kind = ?2 ORDER BY name COLLATE NOCASE";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum CategoryKind {
    Journal,
    Knowledge,
}

impl CategoryKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryKind::Journal => "journal",
            CategoryKind::Knowledge => "knowledge",
        }
    }
}

/// Per-user category names, one list per [`CategoryKind`].
pub struct Categories<'a> {
    conn: &'a Connection,
    session: &'a Session,
}

impl<'a> Categories<'a> {
    pub fn new(db: &'a Db, session: &'a Session) -> Self {
        Self { conn: &db.conn, session }
    }

    pub(crate) fn from_conn(conn: &'a Connection, session: &'a Session) -> Self {
        Self { conn, session }
    }

    /// Records `name` under `kind` unless it is blank or already known.
    pub fn ensure(&self, kind: CategoryKind, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Ok(());
        }
        self.conn.execute(INSERT_CATEGORY, params![self.session.user_id(), kind.as_str(), name])?;
        Ok(())
    }

    pub fn list(&self, kind: CategoryKind) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(SELECT_BY_KIND)?;
        let rows = stmt.query_map(params![self.session.user_id(), kind.as_str()], |row| row.get(0))?;
        Ok(rows.collect::<Result<Vec<String>, _>>()?)
    }
}
