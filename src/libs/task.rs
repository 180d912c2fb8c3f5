use super::error::StoreError;
use super::recurrence::Recurrence;
use chrono::{NaiveDate, NaiveDateTime};
use clap::ValueEnum;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Task importance. Declaration order is rank order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    #[serde(alias = "zeer-laag")]
    VeryLow,
    #[serde(alias = "laag")]
    Low,
    #[default]
    #[serde(alias = "normaal")]
    Normal,
    #[serde(alias = "hoog")]
    High,
    #[serde(alias = "kritiek")]
    Critical,
}

/// Task lifecycle state. Declaration order is rank order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    #[default]
    #[serde(alias = "nieuw")]
    New,
    #[serde(alias = "gepland")]
    Planned,
    InProgress,
    OnHold,
    #[serde(alias = "afgerond")]
    Done,
    #[serde(alias = "geannuleerd")]
    Cancelled,
}

impl Priority {
    pub const ALL: [Priority; 5] = [Priority::VeryLow, Priority::Low, Priority::Normal, Priority::High, Priority::Critical];

    pub fn rank(&self) -> u8 {
        *self as u8
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::VeryLow => "very-low",
            Priority::Low => "low",
            Priority::Normal => "normal",
            Priority::High => "high",
            Priority::Critical => "critical",
        }
    }
}

impl Status {
    pub const ALL: [Status; 6] = [Status::New, Status::Planned, Status::InProgress, Status::OnHold, Status::Done, Status::Cancelled];

    pub fn rank(&self) -> u8 {
        *self as u8
    }

    /// Done and cancelled tasks no longer count as open work.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Done | Status::Cancelled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::New => "new",
            Status::Planned => "planned",
            Status::InProgress => "in-progress",
            Status::OnHold => "on-hold",
            Status::Done => "done",
            Status::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "very-low" | "zeer-laag" => Ok(Priority::VeryLow),
            "low" | "laag" => Ok(Priority::Low),
            "normal" | "normaal" => Ok(Priority::Normal),
            "high" | "hoog" => Ok(Priority::High),
            "critical" | "kritiek" => Ok(Priority::Critical),
            other => Err(StoreError::invalid(format!("unknown priority '{}'", other))),
        }
    }
}

impl FromStr for Status {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "new" | "nieuw" => Ok(Status::New),
            "planned" | "gepland" => Ok(Status::Planned),
            "in-progress" => Ok(Status::InProgress),
            "on-hold" => Ok(Status::OnHold),
            "done" | "afgerond" => Ok(Status::Done),
            "cancelled" | "geannuleerd" => Ok(Status::Cancelled),
            other => Err(StoreError::invalid(format!("unknown status '{}'", other))),
        }
    }
}

impl ToSql for Priority {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Priority {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_str()?.parse().map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

impl ToSql for Status {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Status {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_str()?.parse().map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

/// A todo item. A task with `parent_id` set is a subtask.
///
/// `recurrence` doubles as the recurrence flag: a task is recurring exactly
/// when it carries a rule, so cadence and interval can never be set on a
/// one-off task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: Option<i64>,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub parent_id: Option<i64>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub recurrence: Option<Recurrence>,
    #[serde(default)]
    pub sort_order: i64,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

impl Task {
    pub fn new(title: &str) -> Self {
        Task {
            id: None,
            user_id: String::new(),
            parent_id: None,
            title: title.to_string(),
            description: None,
            owner: None,
            start_date: None,
            due_date: None,
            priority: Priority::default(),
            status: Status::default(),
            archived: false,
            recurrence: None,
            sort_order: 0,
            created_at: None,
            updated_at: None,
        }
    }

    pub fn is_open(&self) -> bool {
        !self.status.is_terminal()
    }

    pub fn validate(&self) -> Result<(), StoreError> {
        if self.title.trim().is_empty() {
            return Err(StoreError::invalid("task title is required"));
        }
        if let Some(recurrence) = &self.recurrence {
            recurrence.validate()?;
        }
        if self.parent_id.is_some() && self.parent_id == self.id {
            return Err(StoreError::invalid("a task cannot be its own parent"));
        }
        Ok(())
    }
}

/// A note attached to a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskComment {
    pub id: Option<i64>,
    pub task_id: i64,
    #[serde(default)]
    pub user_id: String,
    pub text: String,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
}
