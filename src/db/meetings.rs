use super::db::{json_column, to_json_column, Db};
use super::todos::Todos;
use crate::libs::error::StoreError;
use crate::libs::session::Session;
use anyhow::Result;
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

const ENTITY: &str = "meeting";
const ACTION_ENTITY: &str = "meeting action";

const INSERT_MEETING: &str = "INSERT INTO meetings (
    user_id, date, time, subject, goal, participants, notes, is_archived, created_at, updated_at
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)";
const UPDATE_MEETING: &str = "UPDATE meetings SET
    date = ?2, time = ?3, subject = ?4, goal = ?5, participants = ?6, notes = ?7, updated_at = ?8
WHERE id = ?1";
const UPDATE_ARCHIVED: &str = "UPDATE meetings SET is_archived = ?2, updated_at = ?3 WHERE id = ?1";
const DELETE_MEETING: &str = "DELETE FROM meetings WHERE id = ?1";
const SELECT_BY_ID: &str = "SELECT * FROM meetings WHERE id = ?1";
const SELECT_ACTIVE: &str = "SELECT * FROM meetings WHERE user_id = ?1 AND is_archived = FALSE ORDER BY date ASC, time ASC";
const SELECT_UPCOMING: &str = "SELECT * FROM meetings WHERE user_id = ?1 AND is_archived = FALSE AND date >= ?2
    ORDER BY date ASC, time ASC LIMIT ?3";
const SELECT_ARCHIVED: &str = "SELECT * FROM meetings WHERE user_id = ?1 AND is_archived = TRUE ORDER BY date DESC, time DESC";
const SELECT_ALL: &str = "SELECT * FROM meetings WHERE user_id = ?1 ORDER BY id";
const COUNT_MEETINGS: &str = "SELECT COUNT(*) FROM meetings WHERE user_id = ?1 AND is_archived = ?2";
const ARCHIVE_BEFORE: &str = "UPDATE meetings SET is_archived = TRUE WHERE user_id = ?1 AND is_archived = FALSE AND date < ?2";

const INSERT_ACTION: &str = "INSERT INTO meeting_actions (
    meeting_id, description, assignee, due_date, linked_todo_id, is_completed, created_at
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";
const DELETE_ACTIONS: &str = "DELETE FROM meeting_actions WHERE meeting_id = ?1";
const SELECT_ACTIONS: &str = "SELECT * FROM meeting_actions WHERE meeting_id = ?1 ORDER BY id";
const SELECT_ACTION_OWNER: &str = "SELECT a.is_completed, m.user_id FROM meeting_actions a
    JOIN meetings m ON m.id = a.meeting_id WHERE a.id = ?1";
const TOGGLE_ACTION: &str = "UPDATE meeting_actions SET is_completed = ?2 WHERE id = ?1";

/// A follow-up agreed in a meeting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeetingAction {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub meeting_id: Option<i64>,
    pub description: String,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub linked_todo_id: Option<i64>,
    #[serde(default, alias = "is_completed")]
    pub completed: bool,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}

impl MeetingAction {
    pub fn new(description: &str) -> Self {
        Self {
            id: None,
            meeting_id: None,
            description: description.to_string(),
            assignee: None,
            due_date: None,
            linked_todo_id: None,
            completed: false,
            created_at: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meeting {
    pub id: Option<i64>,
    #[serde(default)]
    pub user_id: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub subject: String,
    #[serde(default)]
    pub goal: Option<String>,
    #[serde(default)]
    pub participants: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub actions: Vec<MeetingAction>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

impl Meeting {
    pub fn new(date: NaiveDate, time: NaiveTime, subject: &str) -> Self {
        Self {
            id: None,
            user_id: String::new(),
            date,
            time,
            subject: subject.to_string(),
            goal: None,
            participants: Vec::new(),
            notes: None,
            archived: false,
            actions: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }

    pub fn validate(&self) -> Result<(), StoreError> {
        if self.subject.trim().is_empty() {
            return Err(StoreError::invalid("meeting subject is required"));
        }
        if self.actions.iter().any(|a| a.description.trim().is_empty()) {
            return Err(StoreError::invalid("action description is required"));
        }
        Ok(())
    }

    pub fn open_actions(&self) -> usize {
        self.actions.iter().filter(|a| !a.completed).count()
    }
}

pub struct Meetings<'a> {
    conn: &'a Connection,
    session: &'a Session,
    db: &'a Db,
}

impl<'a> Meetings<'a> {
    pub fn new(db: &'a Db, session: &'a Session) -> Self {
        Self {
            conn: &db.conn,
            session,
            db,
        }
    }

    /// Inserts or updates a meeting and replaces its action list.
    ///
    /// The meeting row and all action rows are written in one transaction.
    pub fn save(&self, meeting: &Meeting) -> Result<i64> {
        meeting.validate()?;
        if let Some(id) = meeting.id {
            self.get(id)?;
        }
        let todos = Todos::new(self.db, self.session);
        for todo_id in meeting.actions.iter().filter_map(|a| a.linked_todo_id) {
            todos.get(todo_id)?;
        }

        let now = Local::now().naive_local();
        let participants = to_json_column(&meeting.participants)?;
        let tx = self.conn.unchecked_transaction()?;
        let id = match meeting.id {
            Some(id) => {
                tx.execute(
                    UPDATE_MEETING,
                    params![id, meeting.date, meeting.time, meeting.subject.trim(), meeting.goal, participants, meeting.notes, now],
                )?;
                tx.execute(DELETE_ACTIONS, params![id])?;
                id
            }
            None => {
                let created_at = meeting.created_at.unwrap_or(now);
                tx.execute(
                    INSERT_MEETING,
                    params![
                        self.session.user_id(),
                        meeting.date,
                        meeting.time,
                        meeting.subject.trim(),
                        meeting.goal,
                        participants,
                        meeting.notes,
                        meeting.archived,
                        created_at,
                        meeting.updated_at.unwrap_or(created_at),
                    ],
                )?;
                tx.last_insert_rowid()
            }
        };
        for action in &meeting.actions {
            tx.execute(
                INSERT_ACTION,
                params![
                    id,
                    action.description.trim(),
                    action.assignee,
                    action.due_date,
                    action.linked_todo_id,
                    action.completed,
                    action.created_at.unwrap_or(now),
                ],
            )?;
        }
        tx.commit()?;
        tracing::debug!(id, actions = meeting.actions.len(), "meeting saved");

        Ok(id)
    }

    pub fn get(&self, id: i64) -> Result<Meeting> {
        let mut meeting = self
            .conn
            .query_row(SELECT_BY_ID, params![id], meeting_from_row)
            .optional()?
            .ok_or(StoreError::NotFound { entity: ENTITY, id })?;
        self.session.authorize(ENTITY, id, &meeting.user_id)?;
        meeting.actions = self.actions(id)?;
        Ok(meeting)
    }

    fn actions(&self, meeting_id: i64) -> Result<Vec<MeetingAction>> {
        let mut stmt = self.conn.prepare(SELECT_ACTIONS)?;
        let rows = stmt.query_map(params![meeting_id], action_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    /// Flips the completion flag of an action and returns the new value.
    pub fn toggle_action(&self, action_id: i64) -> Result<bool> {
        let (completed, owner): (bool, String) = self
            .conn
            .query_row(SELECT_ACTION_OWNER, params![action_id], |row| Ok((row.get(0)?, row.get(1)?)))
            .optional()?
            .ok_or(StoreError::NotFound {
                entity: ACTION_ENTITY,
                id: action_id,
            })?;
        self.session.authorize(ACTION_ENTITY, action_id, &owner)?;
        self.conn.execute(TOGGLE_ACTION, params![action_id, !completed])?;
        Ok(!completed)
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

    /// Deletes the meeting and, through the foreign key, its actions.
    pub fn delete(&self, id: i64) -> Result<()> {
        self.get(id)?;
        self.conn.execute(DELETE_MEETING, params![id])?;
        Ok(())
    }

    /// Active meetings in calendar order.
    pub fn list_active(&self) -> Result<Vec<Meeting>> {
        self.query(SELECT_ACTIVE, params![self.session.user_id()])
    }

    /// The next `limit` active meetings dated today or later.
    pub fn upcoming(&self, today: NaiveDate, limit: usize) -> Result<Vec<Meeting>> {
        self.query(SELECT_UPCOMING, params![self.session.user_id(), today, limit as i64])
    }

    pub fn list_archived(&self) -> Result<Vec<Meeting>> {
        self.query(SELECT_ARCHIVED, params![self.session.user_id()])
    }

    pub fn list_all(&self) -> Result<Vec<Meeting>> {
        self.query(SELECT_ALL, params![self.session.user_id()])
    }

    pub fn count(&self, archived: bool) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row(COUNT_MEETINGS, params![self.session.user_id(), archived], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn archive_before(&self, cutoff: NaiveDate) -> Result<usize> {
        Ok(self.conn.execute(ARCHIVE_BEFORE, params![self.session.user_id(), cutoff])?)
    }

    fn query(&self, sql: &str, params: impl rusqlite::Params) -> Result<Vec<Meeting>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(params, meeting_from_row)?;
        let mut meetings = rows.collect::<Result<Vec<_>, _>>()?;
        for meeting in &mut meetings {
            if let Some(id) = meeting.id {
                meeting.actions = self.actions(id)?;
            }
        }
        Ok(meetings)
    }
}

fn meeting_from_row(row: &Row<'_>) -> rusqlite::Result<Meeting> {
    Ok(Meeting {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        date: row.get("date")?,
        time: row.get("time")?,
        subject: row.get("subject")?,
        goal: row.get("goal")?,
        participants: json_column(row, "participants")?,
        notes: row.get("notes")?,
        archived: row.get("is_archived")?,
        actions: Vec::new(),
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn action_from_row(row: &Row<'_>) -> rusqlite::Result<MeetingAction> {
    Ok(MeetingAction {
        id: row.get("id")?,
        meeting_id: row.get("meeting_id")?,
        description: row.get("description")?,
        assignee: row.get("assignee")?,
        due_date: row.get("due_date")?,
        linked_todo_id: row.get("linked_todo_id")?,
        completed: row.get("is_completed")?,
        created_at: row.get("created_at")?,
    })
}
