//! Archive maintenance: bulk auto-archive and the archive browser.
//!
//! Auto-archive uses one cutoff date, `today - older_than_days`:
//!
//! - todos: status done and last updated before the cutoff
//! - journals and meetings: dated before the cutoff
//!
//! Knowledge items are never archived.

use super::error::StoreError;
use super::session::Session;
use crate::db::db::Db;
use crate::db::journals::Journals;
use crate::db::meetings::Meetings;
use crate::db::todos::Todos;
use anyhow::Result;
use chrono::{Days, NaiveDate};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ArchiveKind {
    Todos,
    Journals,
    Meetings,
}

impl fmt::Display for ArchiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ArchiveKind::Todos => "todos",
            ArchiveKind::Journals => "journals",
            ArchiveKind::Meetings => "meetings",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ArchiveReport {
    pub cutoff: NaiveDate,
    pub todos: usize,
    pub journals: usize,
    pub meetings: usize,
}

impl ArchiveReport {
    pub fn total(&self) -> usize {
        self.todos + self.journals + self.meetings
    }
}

/// One row of the archive browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchivedItem {
    pub id: i64,
    pub date: Option<NaiveDate>,
    pub title: String,
}

pub fn cutoff_date(today: NaiveDate, older_than_days: u32) -> NaiveDate {
    today.checked_sub_days(Days::new(u64::from(older_than_days))).unwrap_or(NaiveDate::MIN)
}

pub struct Archive<'a> {
    db: &'a Db,
    session: &'a Session,
}

impl<'a> Archive<'a> {
    pub fn new(db: &'a Db, session: &'a Session) -> Self {
        Self { db, session }
    }

    pub fn auto_archive(&self, today: NaiveDate, older_than_days: u32) -> Result<ArchiveReport> {
        let cutoff = cutoff_date(today, older_than_days);
        let tx = self.db.conn.unchecked_transaction()?;
        let report = ArchiveReport {
            cutoff,
            todos: Todos::new(self.db, self.session).archive_completed_before(cutoff)?,
            journals: Journals::new(self.db, self.session).archive_before(cutoff)?,
            meetings: Meetings::new(self.db, self.session).archive_before(cutoff)?,
        };
        tx.commit()?;
        tracing::info!(%cutoff, archived = report.total(), "auto-archive finished");
        Ok(report)
    }

    pub fn list(&self, kind: ArchiveKind) -> Result<Vec<ArchivedItem>> {
        let items = match kind {
            ArchiveKind::Todos => Todos::new(self.db, self.session)
                .list_archived()?
                .into_iter()
                .map(|t| ArchivedItem {
                    id: t.id.unwrap_or_default(),
                    date: t.due_date.or(t.updated_at.map(|at| at.date())),
                    title: t.title,
                })
                .collect(),
            ArchiveKind::Journals => Journals::new(self.db, self.session)
                .list_archived()?
                .into_iter()
                .map(|j| ArchivedItem {
                    id: j.id.unwrap_or_default(),
                    date: Some(j.date),
                    title: j.description,
                })
                .collect(),
            ArchiveKind::Meetings => Meetings::new(self.db, self.session)
                .list_archived()?
                .into_iter()
                .map(|m| ArchivedItem {
                    id: m.id.unwrap_or_default(),
                    date: Some(m.date),
                    title: m.subject,
                })
                .collect(),
        };
        Ok(items)
    }

    pub fn restore(&self, kind: ArchiveKind, id: i64) -> Result<()> {
        match kind {
            ArchiveKind::Todos => Todos::new(self.db, self.session).restore(id),
            ArchiveKind::Journals => Journals::new(self.db, self.session).restore(id),
            ArchiveKind::Meetings => Meetings::new(self.db, self.session).restore(id),
        }
    }

    /// Permanently deletes an archived item. Active items are refused.
    pub fn purge(&self, kind: ArchiveKind, id: i64) -> Result<()> {
        let archived = match kind {
            ArchiveKind::Todos => Todos::new(self.db, self.session).get(id)?.archived,
            ArchiveKind::Journals => Journals::new(self.db, self.session).get(id)?.archived,
            ArchiveKind::Meetings => Meetings::new(self.db, self.session).get(id)?.archived,
        };
        if !archived {
            return Err(StoreError::invalid(format!("{} #{} is not archived", kind, id)).into());
        }
        match kind {
            ArchiveKind::Todos => Todos::new(self.db, self.session).delete(id),
            ArchiveKind::Journals => Journals::new(self.db, self.session).delete(id),
            ArchiveKind::Meetings => Meetings::new(self.db, self.session).delete(id),
        }
    }
}
