//! View state and list derivation.
//!
//! Every list screen keeps its state in a plain value ([`TaskView`],
//! [`JournalView`], [`MeetingView`], [`KnowledgeView`]) and derives what to
//! show from an already-fetched collection. The functions here never touch
//! the database and never read the clock: "today" is always a parameter, so
//! the same input always yields the same output.

use super::task::{Priority, Status, Task};
use crate::db::journals::JournalEntry;
use crate::db::knowledge::KnowledgeItem;
use crate::db::meetings::Meeting;
use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Which slice of the task list is shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TaskTab {
    /// Open tasks relevant today, see [`TodayMode`].
    #[default]
    Today,
    /// Every open task.
    All,
    /// Done or cancelled tasks.
    Completed,
}

/// Date the "today" tab keys on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TodayMode {
    Due,
    Start,
    #[default]
    Both,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum TaskSort {
    /// Newest first.
    #[default]
    Created,
    StartDate,
    DueDate,
    /// Highest priority first.
    Priority,
    Status,
    Owner,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskView {
    pub tab: TaskTab,
    pub today_mode: TodayMode,
    pub sort: TaskSort,
    pub query: String,
    pub priority: Option<Priority>,
    pub owner: Option<String>,
}

/// Tasks visible under `view`, in display order.
pub fn filter_tasks<'t>(tasks: &'t [Task], view: &TaskView, today: NaiveDate) -> Vec<&'t Task> {
    let mut visible: Vec<&Task> = tasks
        .iter()
        .filter(|task| in_tab(task, view.tab, view.today_mode, today))
        .filter(|task| matches_query(task, &view.query))
        .filter(|task| view.priority.map_or(true, |p| task.priority == p))
        .filter(|task| match &view.owner {
            Some(owner) => task.owner.as_deref() == Some(owner.as_str()),
            None => true,
        })
        .collect();
    sort_tasks(&mut visible, view.sort);
    visible
}

fn in_tab(task: &Task, tab: TaskTab, mode: TodayMode, today: NaiveDate) -> bool {
    match tab {
        TaskTab::Completed => task.status.is_terminal(),
        TaskTab::All => task.is_open(),
        TaskTab::Today => {
            let due = task.due_date == Some(today);
            let start = task.start_date == Some(today);
            task.is_open()
                && match mode {
                    TodayMode::Due => due,
                    TodayMode::Start => start,
                    TodayMode::Both => due || start,
                }
        }
    }
}

/// Case-insensitive substring match on title, description and owner.
/// A blank query matches everything.
pub fn matches_query(task: &Task, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    [Some(task.title.as_str()), task.description.as_deref(), task.owner.as_deref()]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Stable sort: tasks comparing equal keep their relative order.
pub fn sort_tasks(tasks: &mut [&Task], sort: TaskSort) {
    match sort {
        TaskSort::Created => tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        TaskSort::StartDate => tasks.sort_by(|a, b| nulls_last(a.start_date, b.start_date)),
        TaskSort::DueDate => tasks.sort_by(|a, b| nulls_last(a.due_date, b.due_date)),
        TaskSort::Priority => tasks.sort_by(|a, b| b.priority.rank().cmp(&a.priority.rank())),
        TaskSort::Status => tasks.sort_by_key(|task| task.status.rank()),
        TaskSort::Owner => tasks.sort_by_cached_key(|task| task.owner.as_deref().unwrap_or_default().to_lowercase()),
    }
}

fn nulls_last(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Counts per status, in status order.
pub fn status_counts(tasks: &[Task]) -> Vec<(Status, usize)> {
    Status::ALL
        .iter()
        .map(|&status| (status, tasks.iter().filter(|t| t.status == status).count()))
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JournalView {
    pub query: String,
    pub category: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Entries matching text, category and the inclusive date range, input order kept.
pub fn filter_journals<'j>(entries: &'j [JournalEntry], view: &JournalView) -> Vec<&'j JournalEntry> {
    let needle = view.query.trim().to_lowercase();
    entries
        .iter()
        .filter(|entry| {
            needle.is_empty()
                || entry.description.to_lowercase().contains(&needle)
                || entry.category.as_deref().is_some_and(|c| c.to_lowercase().contains(&needle))
                || entry.tags.iter().any(|tag| tag.to_lowercase().contains(&needle))
        })
        .filter(|entry| match &view.category {
            Some(category) => entry.category.as_deref() == Some(category.as_str()),
            None => true,
        })
        .filter(|entry| view.from.map_or(true, |from| entry.date >= from))
        .filter(|entry| view.to.map_or(true, |to| entry.date <= to))
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum MeetingTab {
    #[default]
    Upcoming,
    Past,
    All,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeetingView {
    pub tab: MeetingTab,
    pub query: String,
}

/// Upcoming meetings keep calendar order; past meetings are listed most recent first.
pub fn filter_meetings<'m>(meetings: &'m [Meeting], view: &MeetingView, today: NaiveDate) -> Vec<&'m Meeting> {
    let needle = view.query.trim().to_lowercase();
    let mut visible: Vec<&Meeting> = meetings
        .iter()
        .filter(|meeting| match view.tab {
            MeetingTab::Upcoming => meeting.date >= today,
            MeetingTab::Past => meeting.date < today,
            MeetingTab::All => true,
        })
        .filter(|meeting| {
            needle.is_empty()
                || meeting.subject.to_lowercase().contains(&needle)
                || meeting.participants.iter().any(|p| p.to_lowercase().contains(&needle))
        })
        .collect();
    if view.tab == MeetingTab::Past {
        visible.sort_by(|a, b| (b.date, b.time).cmp(&(a.date, a.time)));
    }
    visible
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KnowledgeView {
    pub query: String,
    pub category: Option<String>,
}

pub fn filter_knowledge<'k>(items: &'k [KnowledgeItem], view: &KnowledgeView) -> Vec<&'k KnowledgeItem> {
    let needle = view.query.trim().to_lowercase();
    items
        .iter()
        .filter(|item| {
            needle.is_empty()
                || item.title.to_lowercase().contains(&needle)
                || item.description.to_lowercase().contains(&needle)
                || item.category.as_deref().is_some_and(|c| c.to_lowercase().contains(&needle))
                || item.tags.iter().any(|tag| tag.to_lowercase().contains(&needle))
        })
        .filter(|item| match &view.category {
            Some(category) => item.category.as_deref() == Some(category.as_str()),
            None => true,
        })
        .collect()
}
