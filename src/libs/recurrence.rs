//! Recurring-task roll-forward.
//!
//! When a recurring task moves into [`Status::Done`] from any other status, exactly
//! one successor is produced: same title, description, owner, priority and
//! recurrence, status reset to [`Status::New`], and both start and due date set
//! to the anchor date advanced by one recurrence step.
//!
//! The anchor is the due date, falling back to the start date, falling back to
//! "today".
//!
//! ## Month arithmetic
//!
//! Adding calendar months can overshoot the target month (January 31st plus one
//! month). [`MonthOverflow`] pins what happens:
//!
//! ```text
//! 2024-01-31 + 1 month
//!   Clamp    -> 2024-02-29   (last day of the target month)
//!   Rollover -> 2024-03-02   (surplus days spill into the next month)
//! ```
//!
//! ```rust
//! use chrono::NaiveDate;
//! use worksuite::libs::recurrence::{Cadence, MonthOverflow, Recurrence};
//!
//! let every_two_weeks = Recurrence::new(Cadence::Weekly, 2)?;
//! let next = every_two_weeks.advance(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), MonthOverflow::Clamp)?;
//! assert_eq!(next, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
//! # Ok::<(), worksuite::libs::error::StoreError>(())
//! ```

use super::error::StoreError;
use super::task::{Status, Task};
use chrono::{Datelike, Days, Months, NaiveDate};
use clap::ValueEnum;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Repeat unit of a recurring task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Cadence {
    #[serde(alias = "dagelijks")]
    Daily,
    #[serde(alias = "wekelijks")]
    Weekly,
    #[serde(alias = "maandelijks")]
    Monthly,
}

impl Cadence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cadence::Daily => "daily",
            Cadence::Weekly => "weekly",
            Cadence::Monthly => "monthly",
        }
    }
}

impl fmt::Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Cadence {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" | "dagelijks" => Ok(Cadence::Daily),
            "weekly" | "wekelijks" => Ok(Cadence::Weekly),
            "monthly" | "maandelijks" => Ok(Cadence::Monthly),
            other => Err(StoreError::invalid(format!("unknown cadence '{}'", other))),
        }
    }
}

impl ToSql for Cadence {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Cadence {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_str()?.parse().map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

/// Policy for calendar-month additions that land past the end of the target month.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum MonthOverflow {
    /// Use the last day of the target month.
    #[default]
    Clamp,
    /// Carry the surplus days into the following month.
    Rollover,
}

/// A validated recurrence rule. Interval is at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recurrence {
    pub cadence: Cadence,
    pub interval: u32,
}

impl Recurrence {
    pub fn new(cadence: Cadence, interval: u32) -> Result<Self, StoreError> {
        let recurrence = Self { cadence, interval };
        recurrence.validate()?;
        Ok(recurrence)
    }

    /// Applies an optional new cadence and interval to an existing rule.
    ///
    /// A cadence alone starts over at interval 1, an interval alone keeps the
    /// current cadence. An interval without any cadence is rejected.
    pub fn revise(current: Option<Recurrence>, cadence: Option<Cadence>, interval: Option<u32>) -> Result<Option<Recurrence>, StoreError> {
        match (cadence, interval, current) {
            (Some(cadence), interval, _) => Recurrence::new(cadence, interval.unwrap_or(1)).map(Some),
            (None, Some(interval), Some(current)) => Recurrence::new(current.cadence, interval).map(Some),
            (None, Some(_), None) => Err(StoreError::invalid("an interval needs a cadence on a task that does not recur")),
            (None, None, current) => Ok(current),
        }
    }

    pub fn validate(&self) -> Result<(), StoreError> {
        if self.interval == 0 {
            return Err(StoreError::invalid("recurrence interval must be at least 1"));
        }
        Ok(())
    }

    /// Moves `anchor` forward by one step of this rule.
    pub fn advance(&self, anchor: NaiveDate, policy: MonthOverflow) -> Result<NaiveDate, StoreError> {
        self.validate()?;
        let interval = u64::from(self.interval);
        let next = match self.cadence {
            Cadence::Daily => anchor.checked_add_days(Days::new(interval)),
            Cadence::Weekly => anchor.checked_add_days(Days::new(interval * 7)),
            Cadence::Monthly => add_months(anchor, self.interval, policy),
        };
        next.ok_or_else(|| StoreError::invalid(format!("{} cannot be advanced by {} {}", anchor, self.interval, self.cadence)))
    }
}

/// Calendar-month addition under the given overflow policy.
pub fn add_months(date: NaiveDate, months: u32, policy: MonthOverflow) -> Option<NaiveDate> {
    match policy {
        MonthOverflow::Clamp => date.checked_add_months(Months::new(months)),
        MonthOverflow::Rollover => {
            let first = date.with_day0(0)?.checked_add_months(Months::new(months))?;
            first.checked_add_days(Days::new(u64::from(date.day0())))
        }
    }
}

/// Date a successor is computed from: due date, else start date, else `today`.
pub fn anchor_date(task: &Task, today: NaiveDate) -> NaiveDate {
    task.due_date.or(task.start_date).unwrap_or(today)
}

/// Whether saving `task` (whose stored status was `previous`) must spawn a successor.
pub fn rolls_forward(previous: Status, task: &Task) -> bool {
    task.recurrence.is_some() && task.status == Status::Done && previous != Status::Done
}

/// Builds the successor of a completed recurring task, or `None` for a one-off task.
pub fn successor(task: &Task, today: NaiveDate, policy: MonthOverflow) -> Result<Option<Task>, StoreError> {
    let Some(recurrence) = task.recurrence else {
        return Ok(None);
    };
    let next = recurrence.advance(anchor_date(task, today), policy)?;

    let mut next_task = Task::new(&task.title);
    next_task.user_id = task.user_id.clone();
    next_task.description = task.description.clone();
    next_task.owner = task.owner.clone();
    next_task.priority = task.priority;
    next_task.status = Status::New;
    next_task.start_date = Some(next);
    next_task.due_date = Some(next);
    next_task.recurrence = Some(recurrence);

    Ok(Some(next_task))
}
