use super::config::DashboardConfig;
use super::session::Session;
use super::stats::{urgent_tasks, DashboardStats};
use super::task::Task;
use crate::db::activity::{Activity, ActivityEntry};
use crate::db::db::Db;
use crate::db::journals::{JournalEntry, Journals};
use crate::db::meetings::{Meeting, Meetings};
use crate::db::todos::Todos;
use anyhow::Result;
use chrono::NaiveDate;

/// Everything the overview screen shows, loaded in one go.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub today: NaiveDate,
    pub stats: DashboardStats,
    pub urgent: Vec<Task>,
    pub upcoming_meetings: Vec<Meeting>,
    pub latest_journal: Option<JournalEntry>,
    pub recent_activity: Vec<ActivityEntry>,
}

impl Dashboard {
    pub fn load(db: &Db, session: &Session, today: NaiveDate, config: &DashboardConfig) -> Result<Self> {
        // Counters cover top-level work only, like the todo list.
        let tasks: Vec<Task> = Todos::new(db, session)
            .list_all()?
            .into_iter()
            .filter(|task| !task.archived && task.parent_id.is_none())
            .collect();

        let stats = DashboardStats::compute(&tasks, today, config.week_start);
        let urgent = urgent_tasks(&tasks, today, config.urgent_limit).into_iter().cloned().collect();
        tracing::debug!(open = stats.open, overdue = stats.overdue, "dashboard computed");

        Ok(Dashboard {
            today,
            stats,
            urgent,
            upcoming_meetings: Meetings::new(db, session).upcoming(today, config.upcoming_meetings)?,
            latest_journal: Journals::new(db, session).latest()?,
            recent_activity: Activity::new(db, session).recent(config.recent_activity)?,
        })
    }
}
