use super::categories::{Categories, CategoryKind};
use super::db::{json_column, to_json_column, Db};
use super::todos::Todos;
use crate::libs::error::StoreError;
use crate::libs::session::Session;
use anyhow::Result;
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

const ENTITY: &str = "journal entry";

const INSERT_JOURNAL: &str = "INSERT INTO journals (
    user_id, date, time, category, tags, description, linked_todo_id, is_archived, created_at, updated_at
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)";
const UPDATE_JOURNAL: &str = "UPDATE journals SET
    date = ?2, time = ?3, category = ?4, tags = ?5, description = ?6, linked_todo_id = ?7, updated_at = ?8
WHERE id = ?1";
const UPDATE_ARCHIVED: &str = "UPDATE journals SET is_archived = ?2, updated_at = ?3 WHERE id = ?1";
const DELETE_JOURNAL: &str = "DELETE FROM journals WHERE id = ?1";
const SELECT_BY_ID: &str = "SELECT * FROM journals WHERE id = ?1";
const SELECT_ACTIVE: &str = "SELECT * FROM journals WHERE user_id = ?1 AND is_archived = FALSE ORDER BY date DESC, time DESC";
const SELECT_ARCHIVED: &str = "SELECT * FROM journals WHERE user_id = ?1 AND is_archived = TRUE ORDER BY date DESC, time DESC";
const SELECT_ON_DATE: &str = "SELECT * FROM journals WHERE user_id = ?1 AND is_archived = FALSE AND date = ?2 ORDER BY time ASC";
const SELECT_BETWEEN: &str = "SELECT * FROM journals WHERE user_id = ?1 AND is_archived = FALSE AND date BETWEEN ?2 AND ?3
    ORDER BY date ASC, time ASC";
const SELECT_ALL: &str = "SELECT * FROM journals WHERE user_id = ?1 ORDER BY id";
const COUNT_JOURNALS: &str = "SELECT COUNT(*) FROM journals WHERE user_id = ?1 AND is_archived = ?2";
const ARCHIVE_BEFORE: &str = "UPDATE journals SET is_archived = TRUE WHERE user_id = ?1 AND is_archived = FALSE AND date < ?2";

/// One work-log line: what happened, when, optionally tied to a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: Option<i64>,
    #[serde(default)]
    pub user_id: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub description: String,
    #[serde(default)]
    pub linked_todo_id: Option<i64>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

impl JournalEntry {
    pub fn new(date: NaiveDate, time: NaiveTime, description: &str) -> Self {
        Self {
            id: None,
            user_id: String::new(),
            date,
            time,
            category: None,
            tags: Vec::new(),
            description: description.to_string(),
            linked_todo_id: None,
            archived: false,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn validate(&self) -> Result<(), StoreError> {
        if self.description.trim().is_empty() {
            return Err(StoreError::invalid("journal description is required"));
        }
        Ok(())
    }
}

pub struct Journals<'a> {
    conn: &'a Connection,
    session: &'a Session,
    db: &'a Db,
}

impl<'a> Journals<'a> {
    pub fn new(db: &'a Db, session: &'a Session) -> Self {
        Self {
            conn: &db.conn,
            session,
            db,
        }
    }

    pub fn insert(&self, entry: &JournalEntry) -> Result<i64> {
        self.check(entry)?;
        let now = Local::now().naive_local();
        let created_at = entry.created_at.unwrap_or(now);
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            INSERT_JOURNAL,
            params![
                self.session.user_id(),
                entry.date,
                entry.time,
                entry.category,
                to_json_column(&entry.tags)?,
                entry.description.trim(),
                entry.linked_todo_id,
                entry.archived,
                created_at,
                entry.updated_at.unwrap_or(created_at),
            ],
        )?;
        let id = tx.last_insert_rowid();
        self.remember_category(entry)?;
        tx.commit()?;
        tracing::debug!(id, date = %entry.date, "journal entry inserted");
        Ok(id)
    }

    pub fn get(&self, id: i64) -> Result<JournalEntry> {
        let entry = self
            .conn
            .query_row(SELECT_BY_ID, params![id], journal_from_row)
            .optional()?
            .ok_or(StoreError::NotFound { entity: ENTITY, id })?;
        self.session.authorize(ENTITY, id, &entry.user_id)?;
        Ok(entry)
    }

    pub fn update(&self, entry: &JournalEntry) -> Result<()> {
        let id = entry.id.ok_or_else(|| StoreError::invalid("journal entry has no id"))?;
        self.get(id)?;
        self.check(entry)?;
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            UPDATE_JOURNAL,
            params![
                id,
                entry.date,
                entry.time,
                entry.category,
                to_json_column(&entry.tags)?,
                entry.description.trim(),
                entry.linked_todo_id,
                Local::now().naive_local(),
            ],
        )?;
        self.remember_category(entry)?;
        tx.commit()?;
        Ok(())
    }

    fn check(&self, entry: &JournalEntry) -> Result<()> {
        entry.validate()?;
        if let Some(todo_id) = entry.linked_todo_id {
            Todos::new(self.db, self.session).get(todo_id)?;
        }
        Ok(())
    }

    /// Records the category once the row write has gone through.
    fn remember_category(&self, entry: &JournalEntry) -> Result<()> {
        match &entry.category {
            Some(category) => Categories::from_conn(self.conn, self.session).ensure(CategoryKind::Journal, category),
            None => Ok(()),
        }
    }

    pub fn archive(&self, id: i64) -> Result<()> {
        self.get(id)?;
        self.conn.execute(UPDATE_ARCHIVED, params![id, true, Local::now().naive_local()])?;
        Ok(())
    }

    pub fn restore(&self, id: i64) -> Result<()> {
        self.get(id)?;
        self.conn.execute(UPDATE_ARCHIVED, params![id, false, Local::now().naive_local()])?;
        Ok(())
    }

    pub fn delete(&self, id: i64) -> Result<()> {
        self.get(id)?;
        self.conn.execute(DELETE_JOURNAL, params![id])?;
        Ok(())
    }

    /// Active entries, newest day first and latest time first within a day.
    pub fn list_active(&self) -> Result<Vec<JournalEntry>> {
        self.query(SELECT_ACTIVE, params![self.session.user_id()])
    }

    pub fn list_archived(&self) -> Result<Vec<JournalEntry>> {
        self.query(SELECT_ARCHIVED, params![self.session.user_id()])
    }

    /// Entries of one day in time order.
    pub fn on_date(&self, date: NaiveDate) -> Result<Vec<JournalEntry>> {
        self.query(SELECT_ON_DATE, params![self.session.user_id(), date])
    }

    /// Entries with `from <= date <= to`, chronological.
    pub fn between(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<JournalEntry>> {
        self.query(SELECT_BETWEEN, params![self.session.user_id(), from, to])
    }

    pub fn latest(&self) -> Result<Option<JournalEntry>> {
        Ok(self.list_active()?.into_iter().next())
    }

    pub fn list_all(&self) -> Result<Vec<JournalEntry>> {
        self.query(SELECT_ALL, params![self.session.user_id()])
    }

    pub fn count(&self, archived: bool) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row(COUNT_JOURNALS, params![self.session.user_id(), archived], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Archives entries dated before `cutoff`.
    pub fn archive_before(&self, cutoff: NaiveDate) -> Result<usize> {
        Ok(self.conn.execute(ARCHIVE_BEFORE, params![self.session.user_id(), cutoff])?)
    }

    fn query(&self, sql: &str, params: impl rusqlite::Params) -> Result<Vec<JournalEntry>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, journal_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

fn journal_from_row(row: &Row<'_>) -> rusqlite::Result<JournalEntry> {
    Ok(JournalEntry {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        date: row.get("date")?,
        time: row.get("time")?,
        category: row.get("category")?,
        tags: json_column(row, "tags")?,
        description: row.get("description")?,
        linked_todo_id: row.get("linked_todo_id")?,
        archived: row.get("is_archived")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
