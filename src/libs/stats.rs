//! Dashboard counters and storage statistics.
//!
//! ```text
//! open            status not done/cancelled
//! overdue         open and due before today
//! due today       open and due today
//! starting today  open and starting today
//! completed week  done, updated within the current week
//! completed month done, updated within the current calendar month
//! ```
//!
//! Week and month windows are inclusive on both ends.

use super::task::{Status, Task};
use crate::db::db::Db;
use crate::db::journals::Journals;
use crate::db::knowledge::Knowledge;
use crate::db::meetings::Meetings;
use crate::db::todos::Todos;
use crate::libs::session::Session;
use anyhow::Result;
use chrono::{Datelike, Days, Months, NaiveDate};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// First day of the dashboard week.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum WeekStart {
    #[default]
    Monday,
    Sunday,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub open: usize,
    pub overdue: usize,
    pub due_today: usize,
    pub starting_today: usize,
    pub completed_week: usize,
    pub completed_month: usize,
}

impl DashboardStats {
    pub fn compute(tasks: &[Task], today: NaiveDate, week_start: WeekStart) -> Self {
        let (week_from, week_to) = week_bounds(today, week_start);
        let (month_from, month_to) = month_bounds(today);
        let completed_within = |from: NaiveDate, to: NaiveDate| {
            tasks
                .iter()
                .filter(|t| t.status == Status::Done)
                .filter_map(|t| t.updated_at.map(|at| at.date()))
                .filter(|&date| date >= from && date <= to)
                .count()
        };

        DashboardStats {
            open: tasks.iter().filter(|t| t.is_open()).count(),
            overdue: tasks.iter().filter(|t| is_overdue(t, today)).count(),
            due_today: tasks.iter().filter(|t| t.is_open() && t.due_date == Some(today)).count(),
            starting_today: tasks.iter().filter(|t| t.is_open() && t.start_date == Some(today)).count(),
            completed_week: completed_within(week_from, week_to),
            completed_month: completed_within(month_from, month_to),
        }
    }
}

/// Open and past its due date. Due today is not overdue.
pub fn is_overdue(task: &Task, today: NaiveDate) -> bool {
    task.is_open() && task.due_date.is_some_and(|due| due < today)
}

/// First and last day of the week containing `today`.
pub fn week_bounds(today: NaiveDate, week_start: WeekStart) -> (NaiveDate, NaiveDate) {
    let offset = match week_start {
        WeekStart::Monday => today.weekday().num_days_from_monday(),
        WeekStart::Sunday => today.weekday().num_days_from_sunday(),
    };
    let start = today - Days::new(u64::from(offset));
    (start, start + Days::new(6))
}

/// First and last day of the calendar month containing `today`.
pub fn month_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = today.with_day(1).unwrap_or(today);
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(today);
    (first, last)
}

/// Overdue, due today or starting today, each task once, at most `limit`.
///
/// Overdue tasks come first, then due today, then starting today; input order is
/// kept within each group.
pub fn urgent_tasks(tasks: &[Task], today: NaiveDate, limit: usize) -> Vec<&Task> {
    let overdue = tasks.iter().filter(|t| is_overdue(t, today));
    let due_today = tasks.iter().filter(|t| t.is_open() && t.due_date == Some(today));
    let starting = tasks
        .iter()
        .filter(|t| t.is_open() && t.start_date == Some(today) && t.due_date != Some(today) && !is_overdue(t, today));
    overdue.chain(due_today).chain(starting).take(limit).collect()
}

/// Row counts shown on the settings screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StorageStats {
    pub todos_active: usize,
    pub todos_archived: usize,
    pub journals_active: usize,
    pub journals_archived: usize,
    pub meetings_active: usize,
    pub meetings_archived: usize,
    pub knowledge: usize,
}

impl StorageStats {
    pub fn collect(db: &Db, session: &Session) -> Result<Self> {
        let todos = Todos::new(db, session);
        let journals = Journals::new(db, session);
        let meetings = Meetings::new(db, session);
        Ok(StorageStats {
            todos_active: todos.count(false)?,
            todos_archived: todos.count(true)?,
            journals_active: journals.count(false)?,
            journals_archived: journals.count(true)?,
            meetings_active: meetings.count(false)?,
            meetings_archived: meetings.count(true)?,
            knowledge: Knowledge::new(db, session).count()?,
        })
    }

    pub fn total(&self) -> usize {
        self.todos_active
            + self.todos_archived
            + self.journals_active
            + self.journals_archived
            + self.meetings_active
            + self.meetings_archived
            + self.knowledge
    }
}
