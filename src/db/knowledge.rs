use super::categories::{Categories, CategoryKind};
use super::db::{json_column, to_json_column, Db};
use super::journals::Journals;
use super::todos::Todos;
use crate::libs::error::StoreError;
use crate::libs::session::Session;
use anyhow::Result;
use chrono::{Local, NaiveDateTime};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

const ENTITY: &str = "knowledge item";

const INSERT_ITEM: &str = "INSERT INTO knowledge (
    user_id, title, description, category, tags, url, linked_todo_ids, linked_journal_ids, created_at, updated_at
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)";
const UPDATE_ITEM: &str = "UPDATE knowledge SET
    title = ?2, description = ?3, category = ?4, tags = ?5, url = ?6, linked_todo_ids = ?7, linked_journal_ids = ?8,
    updated_at = ?9
WHERE id = ?1";
const DELETE_ITEM: &str = "DELETE FROM knowledge WHERE id = ?1";
const SELECT_BY_ID: &str = "SELECT * FROM knowledge WHERE id = ?1";
const SELECT_ALL: &str = "SELECT * FROM knowledge WHERE user_id = ?1 ORDER BY updated_at DESC, id DESC";
const COUNT_ITEMS: &str = "SELECT COUNT(*) FROM knowledge WHERE user_id = ?1";

/// A reference note, optionally pointing at tasks and journal entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeItem {
    pub id: Option<i64>,
    #[serde(default)]
    pub user_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub linked_todo_ids: Vec<i64>,
    #[serde(default)]
    pub linked_journal_ids: Vec<i64>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

impl KnowledgeItem {
    pub fn new(title: &str) -> Self {
        Self {
            id: None,
            user_id: String::new(),
            title: title.to_string(),
            description: String::new(),
            category: None,
            tags: Vec::new(),
            url: None,
            linked_todo_ids: Vec::new(),
            linked_journal_ids: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    pub fn validate(&self) -> Result<(), StoreError> {
        if self.title.trim().is_empty() {
            return Err(StoreError::invalid("knowledge title is required"));
        }
        Ok(())
    }
}

pub struct Knowledge<'a> {
    conn: &'a Connection,
    session: &'a Session,
    db: &'a Db,
}

impl<'a> Knowledge<'a> {
    pub fn new(db: &'a Db, session: &'a Session) -> Self {
        Self {
            conn: &db.conn,
            session,
            db,
        }
    }

    pub fn insert(&self, item: &KnowledgeItem) -> Result<i64> {
        self.check(item)?;
        let created_at = item.created_at.unwrap_or_else(|| Local::now().naive_local());
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            INSERT_ITEM,
            params![
                self.session.user_id(),
                item.title.trim(),
                item.description,
                item.category,
                to_json_column(&item.tags)?,
                item.url,
                to_json_column(&item.linked_todo_ids)?,
                to_json_column(&item.linked_journal_ids)?,
                created_at,
                item.updated_at.unwrap_or(created_at),
            ],
        )?;
        let id = tx.last_insert_rowid();
        self.remember_category(item)?;
        tx.commit()?;
        Ok(id)
    }

    pub fn get(&self, id: i64) -> Result<KnowledgeItem> {
        let item = self
            .conn
            .query_row(SELECT_BY_ID, params![id], item_from_row)
            .optional()?
            .ok_or(StoreError::NotFound { entity: ENTITY, id })?;
        self.session.authorize(ENTITY, id, &item.user_id)?;
        Ok(item)
    }

    pub fn update(&self, item: &KnowledgeItem) -> Result<()> {
        let id = item.id.ok_or_else(|| StoreError::invalid("knowledge item has no id"))?;
        self.get(id)?;
        self.check(item)?;
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            UPDATE_ITEM,
            params![
                id,
                item.title.trim(),
                item.description,
                item.category,
                to_json_column(&item.tags)?,
                item.url,
                to_json_column(&item.linked_todo_ids)?,
                to_json_column(&item.linked_journal_ids)?,
                Local::now().naive_local(),
            ],
        )?;
        self.remember_category(item)?;
        tx.commit()?;
        Ok(())
    }

    fn check(&self, item: &KnowledgeItem) -> Result<()> {
        item.validate()?;
        let todos = Todos::new(self.db, self.session);
        for &todo_id in &item.linked_todo_ids {
            todos.get(todo_id)?;
        }
        let journals = Journals::new(self.db, self.session);
        for &journal_id in &item.linked_journal_ids {
            journals.get(journal_id)?;
        }
        Ok(())
    }

    /// Records the category once the row write has gone through.
    fn remember_category(&self, item: &KnowledgeItem) -> Result<()> {
        match &item.category {
            Some(category) => Categories::from_conn(self.conn, self.session).ensure(CategoryKind::Knowledge, category),
            None => Ok(()),
        }
    }

    pub fn delete(&self, id: i64) -> Result<()> {
        self.get(id)?;
        self.conn.execute(DELETE_ITEM, params![id])?;
        Ok(())
    }

    /// All items of the session user, most recently edited first.
    pub fn list(&self) -> Result<Vec<KnowledgeItem>> {
        let mut stmt = self.conn.prepare(SELECT_ALL)?;
        let rows = stmt.query_map(params![self.session.user_id()], item_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn count(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row(COUNT_ITEMS, params![self.session.user_id()], |row| row.get(0))?;
        Ok(count as usize)
    }
}

fn item_from_row(row: &Row<'_>) -> rusqlite::Result<KnowledgeItem> {
    Ok(KnowledgeItem {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        category: row.get("category")?,
        tags: json_column(row, "tags")?,
        url: row.get("url")?,
        linked_todo_ids: json_column(row, "linked_todo_ids")?,
        linked_journal_ids: json_column(row, "linked_journal_ids")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
