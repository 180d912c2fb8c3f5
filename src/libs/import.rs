//! Additive import of a JSON backup.
//!
//! Every record is inserted as a new row owned by the importing user; nothing
//! already stored is touched. Ids inside the file are only used to rewire
//! references between imported records:
//!
//! - subtask parent
//! - comment task
//! - journal linked task
//! - meeting action linked task, and the meeting of actions listed
//!   beside the meetings under `meetingActions`
//! - knowledge linked tasks and journal entries
//!
//! A reference whose target is not part of the same file is dropped.
//! Records failing validation are skipped and counted, other failures abort
//! the import with what was inserted so far kept.

use super::error::StoreError;
use super::export::Backup;
use super::session::Session;
use super::task::Task;
use crate::db::comments::Comments;
use crate::db::db::Db;
use crate::db::journals::Journals;
use crate::db::knowledge::Knowledge;
use crate::db::meetings::{MeetingAction, Meetings};
use crate::db::todos::Todos;
use anyhow::Result;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub todos: usize,
    pub comments: usize,
    pub journals: usize,
    pub meetings: usize,
    pub knowledge: usize,
    pub skipped: usize,
}

impl ImportReport {
    pub fn total(&self) -> usize {
        self.todos + self.comments + self.journals + self.meetings + self.knowledge
    }
}

pub struct Importer<'a> {
    db: &'a Db,
    session: &'a Session,
    todo_ids: HashMap<i64, i64>,
    journal_ids: HashMap<i64, i64>,
    report: ImportReport,
}

impl<'a> Importer<'a> {
    pub fn new(db: &'a Db, session: &'a Session) -> Self {
        Self {
            db,
            session,
            todo_ids: HashMap::new(),
            journal_ids: HashMap::new(),
            report: ImportReport::default(),
        }
    }

    pub fn import(mut self, backup: &Backup) -> Result<ImportReport> {
        if let Some(todos) = &backup.todos {
            self.import_todos(todos)?;
        }
        if let Some(comments) = &backup.todo_comments {
            let store = Comments::new(self.db, self.session);
            for comment in comments {
                let Some(&task_id) = self.todo_ids.get(&comment.task_id) else {
                    self.report.skipped += 1;
                    continue;
                };
                let mut comment = comment.clone();
                comment.task_id = task_id;
                self.tally(store.restore(&comment), |r| r.comments += 1)?;
            }
        }
        if let Some(journals) = &backup.journals {
            let store = Journals::new(self.db, self.session);
            for entry in journals {
                let mut entry = entry.clone();
                entry.linked_todo_id = entry.linked_todo_id.and_then(|id| self.todo_ids.get(&id).copied());
                if let Some(new_id) = self.tally(store.insert(&entry), |r| r.journals += 1)? {
                    if let Some(old_id) = entry.id {
                        self.journal_ids.insert(old_id, new_id);
                    }
                }
            }
        }
        let mut detached = self.detached_actions(backup);
        if let Some(meetings) = &backup.meetings {
            let store = Meetings::new(self.db, self.session);
            for meeting in meetings {
                let mut meeting = meeting.clone();
                if let Some(actions) = meeting.id.and_then(|id| detached.remove(&id)) {
                    meeting.actions.extend(actions);
                }
                meeting.id = None;
                for action in &mut meeting.actions {
                    action.id = None;
                    action.meeting_id = None;
                    action.linked_todo_id = action.linked_todo_id.and_then(|id| self.todo_ids.get(&id).copied());
                }
                self.tally(store.save(&meeting), |r| r.meetings += 1)?;
            }
        }
        if let Some(items) = &backup.knowledge {
            let store = Knowledge::new(self.db, self.session);
            for item in items {
                let mut item = item.clone();
                item.linked_todo_ids = item.linked_todo_ids.iter().filter_map(|id| self.todo_ids.get(id).copied()).collect();
                item.linked_journal_ids = item
                    .linked_journal_ids
                    .iter()
                    .filter_map(|id| self.journal_ids.get(id).copied())
                    .collect();
                self.tally(store.insert(&item), |r| r.knowledge += 1)?;
            }
        }

        tracing::info!(imported = self.report.total(), skipped = self.report.skipped, "backup imported");
        Ok(self.report)
    }

    /// Groups a top-level `meetingActions` list by meeting. Actions pointing at
    /// no meeting of the same file are counted as skipped.
    fn detached_actions(&mut self, backup: &Backup) -> HashMap<i64, Vec<MeetingAction>> {
        let mut grouped: HashMap<i64, Vec<MeetingAction>> = HashMap::new();
        let Some(actions) = &backup.meeting_actions else {
            return grouped;
        };
        let meeting_ids: HashSet<i64> = backup.meetings.iter().flatten().filter_map(|m| m.id).collect();
        for action in actions {
            match action.meeting_id.filter(|id| meeting_ids.contains(id)) {
                Some(meeting_id) => grouped.entry(meeting_id).or_default().push(action.clone()),
                None => {
                    tracing::warn!(meeting_id = ?action.meeting_id, "skipping action without a meeting");
                    self.report.skipped += 1;
                }
            }
        }
        grouped
    }

    /// Inserts parents before their subtasks so every parent id can be remapped.
    fn import_todos(&mut self, todos: &[Task]) -> Result<()> {
        let store = Todos::new(self.db, self.session);
        let known: HashSet<i64> = todos.iter().filter_map(|t| t.id).collect();
        let mut pending: Vec<&Task> = todos.iter().collect();

        while !pending.is_empty() {
            let before = pending.len();
            let mut waiting = Vec::new();
            for task in pending {
                match task.parent_id {
                    Some(parent) if known.contains(&parent) && !self.todo_ids.contains_key(&parent) => waiting.push(task),
                    _ => self.import_todo(&store, task, false)?,
                }
            }
            if waiting.len() == before {
                // Parent cycle or a parent that failed validation: import as top-level.
                for task in waiting {
                    self.import_todo(&store, task, true)?;
                }
                break;
            }
            pending = waiting;
        }
        Ok(())
    }

    fn import_todo(&mut self, store: &Todos, task: &Task, detach: bool) -> Result<()> {
        let mut new_task = task.clone();
        new_task.id = None;
        new_task.parent_id = match task.parent_id {
            Some(parent) if !detach => self.todo_ids.get(&parent).copied(),
            _ => None,
        };
        if let Some(new_id) = self.tally(store.insert(&new_task), |r| r.todos += 1)? {
            if let Some(old_id) = task.id {
                self.todo_ids.insert(old_id, new_id);
            }
        }
        Ok(())
    }

    /// Counts an insert outcome; validation failures become skips, anything else propagates.
    fn tally(&mut self, outcome: Result<i64>, count: impl FnOnce(&mut ImportReport)) -> Result<Option<i64>> {
        match outcome {
            Ok(id) => {
                count(&mut self.report);
                Ok(Some(id))
            }
            Err(e) if e.downcast_ref::<StoreError>().is_some() => {
                tracing::warn!(error = %e, "skipping invalid record");
                self.report.skipped += 1;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
