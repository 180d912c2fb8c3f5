use super::db::Db;
use crate::libs::session::Session;
use anyhow::Result;
use chrono::{Local, NaiveDateTime};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};
use std::fmt;

const INSERT_ACTIVITY: &str =
    "INSERT INTO activity_log (user_id, action, entity_type, entity_title, created_at) VALUES (?1, ?2, ?3, ?4, ?5)";
const SELECT_RECENT: &str = "SELECT * FROM activity_log WHERE user_id = ?1 ORDER BY created_at DESC, id DESC LIMIT ?2";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActivityAction {
    Create,
    Update,
    Delete,
    Archive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityType {
    Todo,
    Journal,
    Meeting,
    Knowledge,
}

impl ActivityAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityAction::Create => "create",
            ActivityAction::Update => "update",
            ActivityAction::Delete => "delete",
            ActivityAction::Archive => "archive",
        }
    }

    /// Past-tense verb for feed lines.
    pub fn verb(&self) -> &'static str {
        match self {
            ActivityAction::Create => "created",
            ActivityAction::Update => "updated",
            ActivityAction::Delete => "deleted",
            ActivityAction::Archive => "archived",
        }
    }
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Todo => "todo",
            EntityType::Journal => "journal",
            EntityType::Meeting => "meeting",
            EntityType::Knowledge => "knowledge",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ToSql for ActivityAction {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for ActivityAction {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "create" => Ok(ActivityAction::Create),
            "update" => Ok(ActivityAction::Update),
            "delete" => Ok(ActivityAction::Delete),
            "archive" => Ok(ActivityAction::Archive),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

impl ToSql for EntityType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for EntityType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "todo" => Ok(EntityType::Todo),
            "journal" => Ok(EntityType::Journal),
            "meeting" => Ok(EntityType::Meeting),
            "knowledge" => Ok(EntityType::Knowledge),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub id: i64,
    pub action: ActivityAction,
    pub entity_type: EntityType,
    pub entity_title: String,
    pub created_at: NaiveDateTime,
}

/// Append-only feed of what the user changed, shown on the dashboard.
pub struct Activity<'a> {
    conn: &'a Connection,
    session: &'a Session,
}

impl<'a> Activity<'a> {
    pub fn new(db: &'a Db, session: &'a Session) -> Self {
        Self { conn: &db.conn, session }
    }

    pub fn record(&self, action: ActivityAction, entity_type: EntityType, title: &str) -> Result<()> {
        self.conn.execute(
            INSERT_ACTIVITY,
            params![self.session.user_id(), action, entity_type, title, Local::now().naive_local()],
        )?;
        Ok(())
    }

    /// Newest entries first.
    pub fn recent(&self, limit: usize) -> Result<Vec<ActivityEntry>> {
        let mut stmt = self.conn.prepare(SELECT_RECENT)?;
        let rows = stmt.query_map(params![self.session.user_id(), limit as i64], activity_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

fn activity_from_row(row: &Row<'_>) -> rusqlite::Result<ActivityEntry> {
    Ok(ActivityEntry {
        id: row.get("id")?,
        action: row.get("action")?,
        entity_type: row.get("entity_type")?,
        entity_title: row.get("entity_title")?,
        created_at: row.get("created_at")?,
    })
}
