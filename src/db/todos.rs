//! Todo persistence and the recurring-task lifecycle.
//!
//! [`Todos`] is the only way to mutate the `todos` table. Every method is
//! scoped to the [`Session`] the store was opened with:
//!
//! - inserts are stamped with the session user id;
//! - list queries filter on the session user id;
//! - by-id operations load the row first and run [`Session::authorize`] on it,
//!   failing with [`StoreError::NotFound`] or [`StoreError::Forbidden`].
//!
//! Status changes go through [`Todos::update`], [`Todos::set_status`] or
//! [`Todos::bulk_set_status`]. All three apply the roll-forward rule from
//! [`crate::libs::recurrence`]: completing a recurring task inserts its
//! successor in the same transaction as the status change, so either both
//! writes land or neither does.
//!
//! ## Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use worksuite::db::{db::Db, todos::Todos};
//! use worksuite::libs::recurrence::{Cadence, Recurrence};
//! use worksuite::libs::session::Session;
//! use worksuite::libs::task::{Status, Task};
//!
//! let db = Db::in_memory()?;
//! let session = Session::new("alice")?;
//! let todos = Todos::new(&db, &session);
//!
//! let mut task = Task::new("Water the plants");
//! task.due_date = NaiveDate::from_ymd_opt(2024, 1, 1);
//! task.recurrence = Some(Recurrence::new(Cadence::Weekly, 2)?);
//! let id = todos.insert(&task)?;
//!
//! let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let successor = todos.set_status(id, Status::Done, today)?.unwrap();
//! assert_eq!(todos.get(successor)?.due_date, NaiveDate::from_ymd_opt(2024, 1, 15));
//! # Ok::<(), anyhow::Error>(())
//! ```

use super::db::Db;
use crate::libs::error::StoreError;
use crate::libs::recurrence::{self, Cadence, MonthOverflow, Recurrence};
use crate::libs::session::Session;
use crate::libs::task::{Status, Task};
use anyhow::Result;
use chrono::{Local, NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::collections::HashSet;

const ENTITY: &str = "task";

const INSERT_TODO: &str = "INSERT INTO todos (
    user_id, parent_id, title, description, owner, start_date, due_date, priority, status,
    is_archived, is_recurring, recurring_type, recurring_interval, sort_order, created_at, updated_at
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)";
const UPDATE_TODO: &str = "UPDATE todos SET
    parent_id = ?2, title = ?3, description = ?4, owner = ?5, start_date = ?6, due_date = ?7,
    priority = ?8, status = ?9, is_archived = ?10, is_recurring = ?11, recurring_type = ?12,
    recurring_interval = ?13, sort_order = ?14, updated_at = ?15
WHERE id = ?1";
const UPDATE_STATUS: &str = "UPDATE todos SET status = ?2, updated_at = ?3 WHERE id = ?1";
const UPDATE_ARCHIVED: &str = "UPDATE todos SET is_archived = ?2, updated_at = ?3 WHERE id = ?1";
const DELETE_TODO: &str = "DELETE FROM todos WHERE id = ?1";
const SELECT_BY_ID: &str = "SELECT * FROM todos WHERE id = ?1";
const SELECT_ACTIVE: &str = "SELECT * FROM todos WHERE user_id = ?1 AND is_archived = FALSE AND parent_id IS NULL
    ORDER BY sort_order ASC, created_at DESC";
const SELECT_SUBTASKS: &str = "SELECT * FROM todos WHERE user_id = ?1 AND parent_id = ?2 ORDER BY created_at ASC";
const SELECT_ARCHIVED: &str = "SELECT * FROM todos WHERE user_id = ?1 AND is_archived = TRUE ORDER BY updated_at DESC";
const SELECT_ALL: &str = "SELECT * FROM todos WHERE user_id = ?1 ORDER BY id";
const COUNT_TODOS: &str = "SELECT COUNT(*) FROM todos WHERE user_id = ?1 AND is_archived = ?2";
const SELECT_OWNERS: &str = "SELECT DISTINCT owner FROM todos
    WHERE user_id = ?1 AND is_archived = FALSE AND owner IS NOT NULL AND owner <> '' ORDER BY owner";
const ARCHIVE_DONE_BEFORE: &str = "UPDATE todos SET is_archived = TRUE
    WHERE user_id = ?1 AND is_archived = FALSE AND status = 'done' AND DATE(updated_at) < DATE(?2)";

pub struct Todos<'a> {
    conn: &'a Connection,
    session: &'a Session,
    month_overflow: MonthOverflow,
}

impl<'a> Todos<'a> {
    pub fn new(db: &'a Db, session: &'a Session) -> Self {
        Self {
            conn: &db.conn,
            session,
            month_overflow: MonthOverflow::default(),
        }
    }

    /// Overflow policy used when a monthly task rolls forward.
    pub fn with_month_overflow(mut self, policy: MonthOverflow) -> Self {
        self.month_overflow = policy;
        self
    }

    /// Inserts a new task owned by the session user and returns its id.
    pub fn insert(&self, task: &Task) -> Result<i64> {
        task.validate()?;
        if let Some(parent_id) = task.parent_id {
            self.get(parent_id)?;
        }
        let id = insert_row(self.conn, self.session.user_id(), task)?;
        tracing::debug!(id, title = %task.title, "task inserted");
        Ok(id)
    }

    /// Loads a task by id, enforcing ownership.
    pub fn get(&self, id: i64) -> Result<Task> {
        let task = self
            .conn
            .query_row(SELECT_BY_ID, params![id], task_from_row)
            .optional()?
            .ok_or(StoreError::NotFound { entity: ENTITY, id })?;
        self.session.authorize(ENTITY, id, &task.user_id)?;
        Ok(task)
    }

    /// Saves every editable field of `task`.
    ///
    /// Returns the id of the successor when the save completes a recurring task.
    pub fn update(&self, task: &Task, today: NaiveDate) -> Result<Option<i64>> {
        let id = task.id.ok_or_else(|| StoreError::invalid("task has no id"))?;
        task.validate()?;
        let previous = self.get(id)?;
        if let Some(parent_id) = task.parent_id {
            self.check_parent(id, parent_id)?;
        }

        let (is_recurring, cadence, interval) = recurrence_columns(task.recurrence.as_ref());
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            UPDATE_TODO,
            params![
                id,
                task.parent_id,
                task.title,
                task.description,
                task.owner,
                task.start_date,
                task.due_date,
                task.priority,
                task.status,
                task.archived,
                is_recurring,
                cadence,
                interval,
                task.sort_order,
                now(),
            ],
        )?;
        let mut saved = task.clone();
        saved.user_id = previous.user_id.clone();
        let successor = self.roll_forward(&tx, previous.status, &saved, today)?;
        tx.commit()?;

        Ok(successor)
    }

    /// Fails when `parent_id` is missing, foreign, or a descendant of `id`.
    fn check_parent(&self, id: i64, parent_id: i64) -> Result<()> {
        let mut seen = HashSet::new();
        let mut current = Some(parent_id);
        while let Some(ancestor) = current {
            if ancestor == id {
                return Err(StoreError::invalid(format!("task #{} cannot be moved under its own subtask", id)).into());
            }
            if !seen.insert(ancestor) {
                break;
            }
            current = self.get(ancestor)?.parent_id;
        }
        Ok(())
    }

    /// Changes only the status of a task, rolling recurring tasks forward.
    pub fn set_status(&self, id: i64, status: Status, today: NaiveDate) -> Result<Option<i64>> {
        let previous = self.get(id)?;

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(UPDATE_STATUS, params![id, status, now()])?;
        let mut saved = previous.clone();
        saved.status = status;
        let successor = self.roll_forward(&tx, previous.status, &saved, today)?;
        tx.commit()?;

        Ok(successor)
    }

    /// Applies [`Todos::set_status`] to each id in order and returns the successors created.
    pub fn bulk_set_status(&self, ids: &[i64], status: Status, today: NaiveDate) -> Result<Vec<i64>> {
        let mut successors = Vec::new();
        for &id in ids {
            if let Some(successor) = self.set_status(id, status, today)? {
                successors.push(successor);
            }
        }
        Ok(successors)
    }

    fn roll_forward(&self, conn: &Connection, previous: Status, saved: &Task, today: NaiveDate) -> Result<Option<i64>> {
        if !recurrence::rolls_forward(previous, saved) {
            return Ok(None);
        }
        let Some(next) = recurrence::successor(saved, today, self.month_overflow)? else {
            return Ok(None);
        };
        let successor_id = insert_row(conn, self.session.user_id(), &next)?;
        tracing::info!(
            original = ?saved.id,
            successor = successor_id,
            due = ?next.due_date,
            "recurring task rolled forward"
        );
        Ok(Some(successor_id))
    }

    pub fn archive(&self, id: i64) -> Result<()> {
        self.get(id)?;
        self.conn.execute(UPDATE_ARCHIVED, params![id, true, now()])?;
        Ok(())
    }

    pub fn restore(&self, id: i64) -> Result<()> {
        self.get(id)?;
        self.conn.execute(UPDATE_ARCHIVED, params![id, false, now()])?;
        Ok(())
    }

    /// Deletes a task together with its subtasks and comments.
    pub fn delete(&self, id: i64) -> Result<()> {
        self.get(id)?;
        self.conn.execute(DELETE_TODO, params![id])?;
        tracing::debug!(id, "task deleted");
        Ok(())
    }

    /// Deletes every listed task; all ids are authorized before anything is removed.
    pub fn delete_many(&self, ids: &[i64]) -> Result<usize> {
        for &id in ids {
            self.get(id)?;
        }
        let tx = self.conn.unchecked_transaction()?;
        let mut deleted = 0;
        for &id in ids {
            deleted += tx.execute(DELETE_TODO, params![id])?;
        }
        tx.commit()?;
        Ok(deleted)
    }

    /// Non-archived top-level tasks in manual order, newest first within equal order.
    pub fn list_active(&self) -> Result<Vec<Task>> {
        self.query(SELECT_ACTIVE, params![self.session.user_id()])
    }

    pub fn subtasks(&self, parent_id: i64) -> Result<Vec<Task>> {
        self.get(parent_id)?;
        self.query(SELECT_SUBTASKS, params![self.session.user_id(), parent_id])
    }

    pub fn list_archived(&self) -> Result<Vec<Task>> {
        self.query(SELECT_ARCHIVED, params![self.session.user_id()])
    }

    /// Every task of the session user, archived or not.
    pub fn list_all(&self) -> Result<Vec<Task>> {
        self.query(SELECT_ALL, params![self.session.user_id()])
    }

    pub fn count(&self, archived: bool) -> Result<usize> {
        let count: i64 = self.conn.query_row(COUNT_TODOS, params![self.session.user_id(), archived], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Distinct owner labels of active tasks, for facet pickers.
    pub fn owners(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(SELECT_OWNERS)?;
        let rows = stmt.query_map(params![self.session.user_id()], |row| row.get(0))?;
        Ok(rows.collect::<Result<Vec<String>, _>>()?)
    }

    /// Archives done tasks last touched before `cutoff`.
    pub fn archive_completed_before(&self, cutoff: NaiveDate) -> Result<usize> {
        Ok(self.conn.execute(ARCHIVE_DONE_BEFORE, params![self.session.user_id(), cutoff])?)
    }

    fn query(&self, sql: &str, params: impl rusqlite::Params) -> Result<Vec<Task>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, task_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn recurrence_columns(recurrence: Option<&Recurrence>) -> (bool, Option<Cadence>, Option<i64>) {
    match recurrence {
        Some(r) => (true, Some(r.cadence), Some(i64::from(r.interval))),
        None => (false, None, None),
    }
}

fn insert_row(conn: &Connection, user_id: &str, task: &Task) -> Result<i64> {
    let created_at = task.created_at.unwrap_or_else(now);
    let updated_at = task.updated_at.unwrap_or(created_at);
    let (is_recurring, cadence, interval) = recurrence_columns(task.recurrence.as_ref());
    conn.execute(
        INSERT_TODO,
        params![
            user_id,
            task.parent_id,
            task.title,
            task.description,
            task.owner,
            task.start_date,
            task.due_date,
            task.priority,
            task.status,
            task.archived,
            is_recurring,
            cadence,
            interval,
            task.sort_order,
            created_at,
            updated_at,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn task_from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    let is_recurring: bool = row.get("is_recurring")?;
    let cadence: Option<Cadence> = row.get("recurring_type")?;
    let interval: Option<i64> = row.get("recurring_interval")?;
    let recurrence = match (is_recurring, cadence, interval) {
        (true, Some(cadence), Some(interval)) if interval >= 1 => Some(Recurrence {
            cadence,
            interval: interval as u32,
        }),
        _ => None,
    };

    Ok(Task {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        parent_id: row.get("parent_id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        owner: row.get("owner")?,
        start_date: row.get("start_date")?,
        due_date: row.get("due_date")?,
        priority: row.get("priority")?,
        status: row.get("status")?,
        archived: row.get("is_archived")?,
        recurrence,
        sort_order: row.get("sort_order")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}
