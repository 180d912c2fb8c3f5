//! JSON backups and plain-text journal summaries.
//!
//! A backup holds any subset of the four data sections. Absent sections are
//! omitted from the file, so a backup can be partial:
//!
//! ```json
//! {
//!   "version": 1,
//!   "exportedAt": "2024-05-10T09:30:00",
//!   "todos": [ ... ],
//!   "todoComments": [ ... ],
//!   "journals": [ ... ],
//!   "meetings": [ { ..., "actions": [ ... ] } ],
//!   "knowledge": [ ... ]
//! }
//! ```
//!
//! Journal summaries are human-readable text files:
//!
//! ```text
//! Work Journal - 2024-05-10
//! ==================================================
//!
//! 09:30 - General
//! --------------------------------------------------
//! Sprint planning
//! Tags: planning, team
//! ```

use super::error::StoreError;
use super::formatter::{format_time, join_list};
use super::session::Session;
use super::task::{Task, TaskComment};
use crate::db::comments::Comments;
use crate::db::db::Db;
use crate::db::journals::{JournalEntry, Journals};
use crate::db::knowledge::{Knowledge, KnowledgeItem};
use crate::db::meetings::{Meeting, MeetingAction, Meetings};
use crate::db::todos::Todos;
use anyhow::Result;
use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

pub const BACKUP_VERSION: u32 = 1;
pub const DEFAULT_CATEGORY: &str = "General";
const RULE_WIDTH: usize = 50;

/// Which sections go into a backup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSections {
    pub todos: bool,
    pub journals: bool,
    pub meetings: bool,
    pub knowledge: bool,
}

impl Default for ExportSections {
    fn default() -> Self {
        ExportSections {
            todos: true,
            journals: true,
            meetings: true,
            knowledge: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Backup {
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub exported_at: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub todos: Option<Vec<Task>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub todo_comments: Option<Vec<TaskComment>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub journals: Option<Vec<JournalEntry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meetings: Option<Vec<Meeting>>,
    /// Actions listed beside their meetings, keyed by `meeting_id`. Only read on import.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_actions: Option<Vec<MeetingAction>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub knowledge: Option<Vec<KnowledgeItem>>,
}

impl Backup {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| StoreError::invalid(format!("not a valid backup file: {}", e)).into())
    }

    pub fn read(path: &Path) -> Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

pub fn backup_file_name(today: NaiveDate) -> String {
    format!("work-suite-backup-{}.json", today)
}

pub fn journal_day_file_name(date: NaiveDate) -> String {
    format!("journal-{}.txt", date)
}

pub fn journal_period_file_name(from: NaiveDate, to: NaiveDate) -> String {
    format!("journal-week-{}-{}.txt", from, to)
}

/// Reads the session user's data for export.
pub struct Exporter<'a> {
    db: &'a Db,
    session: &'a Session,
}

impl<'a> Exporter<'a> {
    pub fn new(db: &'a Db, session: &'a Session) -> Self {
        Self { db, session }
    }

    pub fn backup(&self, sections: ExportSections) -> Result<Backup> {
        let mut backup = Backup {
            version: BACKUP_VERSION,
            exported_at: Some(Local::now().naive_local()),
            ..Backup::default()
        };
        if sections.todos {
            backup.todos = Some(Todos::new(self.db, self.session).list_all()?);
            backup.todo_comments = Some(Comments::new(self.db, self.session).list_all()?);
        }
        if sections.journals {
            backup.journals = Some(Journals::new(self.db, self.session).list_all()?);
        }
        if sections.meetings {
            backup.meetings = Some(Meetings::new(self.db, self.session).list_all()?);
        }
        if sections.knowledge {
            backup.knowledge = Some(Knowledge::new(self.db, self.session).list()?);
        }
        Ok(backup)
    }

    /// Writes a backup to `path`, or to the default file name in the working directory.
    pub fn write_backup(&self, sections: ExportSections, path: Option<PathBuf>, today: NaiveDate) -> Result<PathBuf> {
        let path = path.unwrap_or_else(|| PathBuf::from(backup_file_name(today)));
        fs::write(&path, self.backup(sections)?.to_json()?)?;
        tracing::info!(path = %path.display(), "backup written");
        Ok(path)
    }

    /// Text summary of one day. Archived entries are included.
    pub fn journal_day(&self, date: NaiveDate) -> Result<String> {
        let entries = self.journal_range(date, date)?;
        Ok(format_journal_day(date, &entries))
    }

    /// Text summary of an inclusive date range, grouped by day.
    pub fn journal_period(&self, from: NaiveDate, to: NaiveDate) -> Result<String> {
        let entries = self.journal_range(from, to)?;
        Ok(format_journal_period(from, to, &entries))
    }

    fn journal_range(&self, from: NaiveDate, to: NaiveDate) -> Result<Vec<JournalEntry>> {
        let mut entries: Vec<JournalEntry> = Journals::new(self.db, self.session)
            .list_all()?
            .into_iter()
            .filter(|entry| entry.date >= from && entry.date <= to)
            .collect();
        if entries.is_empty() {
            return Err(StoreError::invalid(format!("no journal entries between {} and {}", from, to)).into());
        }
        entries.sort_by_key(|entry| (entry.date, entry.time));
        Ok(entries)
    }
}

pub fn format_journal_day(date: NaiveDate, entries: &[JournalEntry]) -> String {
    let mut content = format!("Work Journal - {}\n{}\n\n", date, "=".repeat(RULE_WIDTH));
    for entry in entries {
        write_entry(&mut content, entry);
    }
    content
}

pub fn format_journal_period(from: NaiveDate, to: NaiveDate, entries: &[JournalEntry]) -> String {
    let mut content = format!("Work Journal - {} to {}\n{}\n\n", from, to, "=".repeat(RULE_WIDTH));
    let mut current: Option<NaiveDate> = None;
    for entry in entries {
        if current != Some(entry.date) {
            current = Some(entry.date);
            let _ = write!(content, "\n{}\n{}\n\n", entry.date, "=".repeat(RULE_WIDTH));
        }
        write_entry(&mut content, entry);
    }
    content
}

fn write_entry(content: &mut String, entry: &JournalEntry) {
    let category = entry.category.as_deref().filter(|c| !c.is_empty()).unwrap_or(DEFAULT_CATEGORY);
    let _ = writeln!(content, "{} - {}", format_time(entry.time), category);
    let _ = writeln!(content, "{}", "-".repeat(RULE_WIDTH));
    let _ = writeln!(content, "{}", entry.description);
    if !entry.tags.is_empty() {
        let _ = writeln!(content, "Tags: {}", join_list(&entry.tags));
    }
    content.push('\n');
}
