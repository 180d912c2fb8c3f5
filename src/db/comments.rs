use super::db::Db;
use super::todos::Todos;
use crate::libs::error::StoreError;
use crate::libs::session::Session;
use crate::libs::task::TaskComment;
use anyhow::Result;
use chrono::Local;
use rusqlite::{params, Connection, Row};

const INSERT_COMMENT: &str = "INSERT INTO todo_comments (todo_id, user_id, text, created_at) VALUES (?1, ?2, ?3, ?4)";
const SELECT_BY_TASK: &str = "SELECT * FROM todo_comments WHERE todo_id = ?1 ORDER BY created_at ASC, id ASC";
const SELECT_ALL: &str = "SELECT * FROM todo_comments WHERE user_id = ?1 ORDER BY id";

/// Comments attached to tasks. Access follows ownership of the parent task.
pub struct Comments<'a> {
    conn: &'a Connection,
    session: &'a Session,
    todos: Todos<'a>,
}

impl<'a> Comments<'a> {
    pub fn new(db: &'a Db, session: &'a Session) -> Self {
        Self {
            conn: &db.conn,
            session,
            todos: Todos::new(db, session),
        }
    }

    pub fn add(&self, task_id: i64, text: &str) -> Result<i64> {
        if text.trim().is_empty() {
            return Err(StoreError::invalid("comment text is required").into());
        }
        self.todos.get(task_id)?;
        self.conn.execute(
            INSERT_COMMENT,
            params![task_id, self.session.user_id(), text.trim(), Local::now().naive_local()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Comments on a task, oldest first.
    pub fn list(&self, task_id: i64) -> Result<Vec<TaskComment>> {
        self.todos.get(task_id)?;
        let mut stmt = self.conn.prepare(SELECT_BY_TASK)?;
        let rows = stmt.query_map(params![task_id], comment_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    pub fn list_all(&self) -> Result<Vec<TaskComment>> {
        let mut stmt = self.conn.prepare(SELECT_ALL)?;
        let rows = stmt.query_map(params![self.session.user_id()], comment_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Inserts a comment verbatim, keeping its timestamp. Used by import.
    pub(crate) fn restore(&self, comment: &TaskComment) -> Result<i64> {
        self.todos.get(comment.task_id)?;
        let created_at = comment.created_at.unwrap_or_else(|| Local::now().naive_local());
        self.conn
            .execute(INSERT_COMMENT, params![comment.task_id, self.session.user_id(), comment.text, created_at])?;
        Ok(self.conn.last_insert_rowid())
    }
}

fn comment_from_row(row: &Row<'_>) -> rusqlite::Result<TaskComment> {
    Ok(TaskComment {
        id: row.get("id")?,
        task_id: row.get("todo_id")?,
        user_id: row.get("user_id")?,
        text: row.get("text")?,
        created_at: row.get("created_at")?,
    })
}
