use super::dashboard::Dashboard;
use super::formatter::{format_date, format_time, join_list, time_ago, truncate};
use super::stats::{is_overdue, StorageStats};
use super::task::{Task, TaskComment};
use crate::db::journals::JournalEntry;
use crate::db::knowledge::KnowledgeItem;
use crate::db::meetings::Meeting;
use anyhow::Result;
use chrono::{Local, NaiveDate};
use prettytable::{row, Table};

const TITLE_WIDTH: usize = 48;

pub struct View {}

impl View {
    pub fn tasks(tasks: &[&Task], today: NaiveDate) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "TITLE", "OWNER", "START", "DUE", "PRIORITY", "STATUS", "REPEAT"]);
        for task in tasks {
            let due = match (format_date(task.due_date), is_overdue(task, today)) {
                (date, true) => format!("{} !", date),
                (date, false) => date,
            };
            let repeat = task
                .recurrence
                .map(|r| format!("{}/{}", r.cadence, r.interval))
                .unwrap_or_default();
            table.add_row(row![
                task.id.unwrap_or(0),
                truncate(&task.title, TITLE_WIDTH),
                task.owner.as_deref().unwrap_or(""),
                format_date(task.start_date),
                due,
                task.priority,
                task.status,
                repeat
            ]);
        }
        table.printstd();

        Ok(())
    }

    pub fn task_detail(task: &Task, subtasks: &[Task], comments: &[TaskComment]) -> Result<()> {
        let mut table = Table::new();
        table.add_row(row!["ID", task.id.unwrap_or(0)]);
        table.add_row(row!["TITLE", task.title]);
        table.add_row(row!["DESCRIPTION", task.description.as_deref().unwrap_or("")]);
        table.add_row(row!["OWNER", task.owner.as_deref().unwrap_or("")]);
        table.add_row(row!["START", format_date(task.start_date)]);
        table.add_row(row!["DUE", format_date(task.due_date)]);
        table.add_row(row!["PRIORITY", task.priority]);
        table.add_row(row!["STATUS", task.status]);
        if let Some(recurrence) = task.recurrence {
            table.add_row(row!["REPEAT", format!("every {} x {}", recurrence.interval, recurrence.cadence)]);
        }
        table.printstd();

        if !subtasks.is_empty() {
            let mut table = Table::new();
            table.add_row(row!["SUBTASK", "TITLE", "STATUS"]);
            for subtask in subtasks {
                table.add_row(row![subtask.id.unwrap_or(0), subtask.title, subtask.status]);
            }
            table.printstd();
        }

        if !comments.is_empty() {
            let mut table = Table::new();
            table.add_row(row!["WHEN", "COMMENT"]);
            for comment in comments {
                let when = comment
                    .created_at
                    .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or_default();
                table.add_row(row![when, comment.text]);
            }
            table.printstd();
        }

        Ok(())
    }

    pub fn journals(entries: &[&JournalEntry]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "DATE", "TIME", "CATEGORY", "DESCRIPTION", "TAGS", "TASK"]);
        for entry in entries {
            table.add_row(row![
                entry.id.unwrap_or(0),
                entry.date,
                format_time(entry.time),
                entry.category.as_deref().unwrap_or(""),
                truncate(&entry.description, TITLE_WIDTH),
                join_list(&entry.tags),
                entry.linked_todo_id.map(|id| id.to_string()).unwrap_or_default()
            ]);
        }
        table.printstd();

        Ok(())
    }

    pub fn meetings(meetings: &[&Meeting]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "DATE", "TIME", "SUBJECT", "PARTICIPANTS", "ACTIONS"]);
        for meeting in meetings {
            table.add_row(row![
                meeting.id.unwrap_or(0),
                meeting.date,
                format_time(meeting.time),
                truncate(&meeting.subject, TITLE_WIDTH),
                join_list(&meeting.participants),
                format!("{}/{}", meeting.open_actions(), meeting.actions.len())
            ]);
        }
        table.printstd();

        Ok(())
    }

    pub fn meeting_detail(meeting: &Meeting) -> Result<()> {
        let mut table = Table::new();
        table.add_row(row!["ID", meeting.id.unwrap_or(0)]);
        table.add_row(row!["WHEN", format!("{} {}", meeting.date, format_time(meeting.time))]);
        table.add_row(row!["SUBJECT", meeting.subject]);
        table.add_row(row!["GOAL", meeting.goal.as_deref().unwrap_or("")]);
        table.add_row(row!["PARTICIPANTS", join_list(&meeting.participants)]);
        table.add_row(row!["NOTES", meeting.notes.as_deref().unwrap_or("")]);
        table.printstd();

        if !meeting.actions.is_empty() {
            let mut table = Table::new();
            table.add_row(row!["ACTION", "DESCRIPTION", "ASSIGNEE", "DUE", "DONE"]);
            for action in &meeting.actions {
                table.add_row(row![
                    action.id.unwrap_or(0),
                    action.description,
                    action.assignee.as_deref().unwrap_or(""),
                    format_date(action.due_date),
                    if action.completed { "x" } else { "" }
                ]);
            }
            table.printstd();
        }

        Ok(())
    }

    pub fn knowledge(items: &[&KnowledgeItem]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["ID", "TITLE", "CATEGORY", "TAGS", "URL"]);
        for item in items {
            table.add_row(row![
                item.id.unwrap_or(0),
                truncate(&item.title, TITLE_WIDTH),
                item.category.as_deref().unwrap_or(""),
                join_list(&item.tags),
                item.url.as_deref().unwrap_or("")
            ]);
        }
        table.printstd();

        Ok(())
    }

    pub fn dashboard(dashboard: &Dashboard) -> Result<()> {
        let stats = &dashboard.stats;
        let mut table = Table::new();
        table.add_row(row!["OPEN", "OVERDUE", "DUE TODAY", "STARTING TODAY", "DONE THIS WEEK", "DONE THIS MONTH"]);
        table.add_row(row![
            stats.open,
            stats.overdue,
            stats.due_today,
            stats.starting_today,
            stats.completed_week,
            stats.completed_month
        ]);
        table.printstd();

        if !dashboard.urgent.is_empty() {
            let urgent: Vec<&Task> = dashboard.urgent.iter().collect();
            Self::tasks(&urgent, dashboard.today)?;
        }

        if !dashboard.upcoming_meetings.is_empty() {
            let meetings: Vec<&Meeting> = dashboard.upcoming_meetings.iter().collect();
            Self::meetings(&meetings)?;
        }

        if let Some(entry) = &dashboard.latest_journal {
            Self::journals(&[entry])?;
        }

        if !dashboard.recent_activity.is_empty() {
            let now = Local::now().naive_local();
            let mut table = Table::new();
            table.add_row(row!["WHEN", "ACTIVITY"]);
            for activity in &dashboard.recent_activity {
                table.add_row(row![
                    time_ago(activity.created_at, now),
                    format!("{} {} '{}'", activity.entity_type, activity.action.verb(), activity.entity_title)
                ]);
            }
            table.printstd();
        }

        Ok(())
    }

    pub fn storage(stats: &StorageStats) -> Result<()> {
        let mut table = Table::new();
        table.add_row(row!["KIND", "ACTIVE", "ARCHIVED"]);
        table.add_row(row!["todos", stats.todos_active, stats.todos_archived]);
        table.add_row(row!["journals", stats.journals_active, stats.journals_archived]);
        table.add_row(row!["meetings", stats.meetings_active, stats.meetings_archived]);
        table.add_row(row!["knowledge", stats.knowledge, "-"]);
        table.add_row(row!["total", stats.total(), ""]);
        table.printstd();

        Ok(())
    }

    pub fn migrations(history: &[(u32, String, String)]) -> Result<()> {
        let mut table = Table::new();
        table.add_row(row!["VERSION", "NAME", "APPLIED"]);
        for (version, name, applied_at) in history {
            table.add_row(row![version, name, applied_at]);
        }
        table.printstd();

        Ok(())
    }
}
