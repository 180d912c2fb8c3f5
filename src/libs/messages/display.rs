//! Display implementation for application messages.
//!
//! All message text is defined here, in one match. Parameters are
//! interpolated with `format!`; a message with no parameters is a plain
//! string.

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === TODO MESSAGES ===
            Message::TaskCreated(id, title) => format!("Task #{} '{}' created", id, title),
            Message::TaskUpdated(title) => format!("Task '{}' updated", title),
            Message::TaskArchived(title) => format!("Task '{}' archived", title),
            Message::TasksStatusChanged(count, status) => format!("{} task(s) set to {}", count, status),
            Message::TasksDeleted(count) => format!("Deleted {} task(s)", count),
            Message::RecurringTaskScheduled(title, due) if due.is_empty() => format!("Next '{}' scheduled", title),
            Message::RecurringTaskScheduled(title, due) => format!("Next '{}' scheduled, due {}", title, due),
            Message::CommentAdded(id) => format!("Comment added to task #{}", id),
            Message::NoTasksFound => "No tasks found".to_string(),
            Message::ConfirmDeleteTask(title) => format!("Delete task '{}' and its subtasks?", title),
            Message::ConfirmDeleteTasks(count) => format!("Delete {} tasks and their subtasks?", count),

            // === JOURNAL MESSAGES ===
            Message::JournalCreated(id) => format!("Journal entry #{} saved", id),
            Message::JournalUpdated(id) => format!("Journal entry #{} updated", id),
            Message::JournalArchived(id) => format!("Journal entry #{} archived", id),
            Message::JournalDeleted(id) => format!("Journal entry #{} deleted", id),
            Message::NoJournalEntriesFound => "No journal entries found".to_string(),
            Message::ConfirmDeleteJournal(date) => format!("Delete the journal entry of {}?", date),

            // === MEETING MESSAGES ===
            Message::MeetingCreated(id, subject) => format!("Meeting #{} '{}' created", id, subject),
            Message::MeetingUpdated(subject) => format!("Meeting '{}' updated", subject),
            Message::MeetingArchived(subject) => format!("Meeting '{}' archived", subject),
            Message::MeetingDeleted(subject) => format!("Meeting '{}' deleted", subject),
            Message::MeetingActionAdded(subject) => format!("Action item added to '{}'", subject),
            Message::MeetingActionToggled(id, true) => format!("Action #{} completed", id),
            Message::MeetingActionToggled(id, false) => format!("Action #{} reopened", id),
            Message::NoMeetingsFound => "No meetings found".to_string(),
            Message::ConfirmDeleteMeeting(subject) => format!("Delete meeting '{}' with its action items?", subject),

            // === KNOWLEDGE MESSAGES ===
            Message::KnowledgeCreated(id, title) => format!("Knowledge item #{} '{}' created", id, title),
            Message::KnowledgeUpdated(title) => format!("Knowledge item '{}' updated", title),
            Message::KnowledgeDeleted(title) => format!("Knowledge item '{}' deleted", title),
            Message::NoKnowledgeFound => "No knowledge items found".to_string(),
            Message::ConfirmDeleteKnowledge(title) => format!("Delete knowledge item '{}'?", title),

            // === DASHBOARD AND STATS ===
            Message::DashboardHeader(name, date) => format!("📋 {}, here is {}", name, date),
            Message::StorageStatsHeader => "📦 Storage".to_string(),
            Message::MigrationHistoryHeader => "🗂  Migration history".to_string(),

            // === EXPORT / IMPORT ===
            Message::ExportCompleted(path) => format!("Export written to {}", path),
            Message::ConfirmImport(path) => format!("Import {} into your data? Existing items are kept.", path),
            Message::ImportCompleted(report) => format!(
                "Imported {} item(s): {} todos, {} comments, {} journal entries, {} meetings, {} knowledge items ({} skipped)",
                report.total(),
                report.todos,
                report.comments,
                report.journals,
                report.meetings,
                report.knowledge,
                report.skipped
            ),

            // === ARCHIVE MESSAGES ===
            Message::ConfirmAutoArchive(days, cutoff) => {
                format!("Archive completed todos, journal entries and meetings older than {} days (before {})?", days, cutoff)
            }
            Message::AutoArchiveCompleted(report) => format!(
                "Archived {} item(s) before {}: {} todos, {} journal entries, {} meetings",
                report.total(),
                report.cutoff,
                report.todos,
                report.journals,
                report.meetings
            ),
            Message::ArchiveEmpty(kind) => format!("No archived {}", kind),
            Message::ItemRestored(id) => format!("Item #{} restored", id),
            Message::ConfirmPurge(kind, id) => format!("Permanently delete archived {} #{}?", kind, id),
            Message::ItemPurged(id) => format!("Item #{} permanently deleted", id),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved".to_string(),
            Message::ConfigReset => "Configuration reset to defaults".to_string(),
            Message::NoUserConfigured => "No user configured. Run `ws init`, set WORKSUITE_USER or pass --user".to_string(),
            Message::ConfigModuleUser => "👤 User".to_string(),
            Message::ConfigModuleRecurrence => "🔁 Recurrence".to_string(),
            Message::ConfigModuleArchive => "🗄  Archive".to_string(),
            Message::ConfigModuleDashboard => "📋 Dashboard".to_string(),

            // === PROMPTS ===
            Message::PromptSelectModules => "Select modules to configure".to_string(),
            Message::PromptUserId => "User id".to_string(),
            Message::PromptUserName => "Display name".to_string(),
            Message::PromptMonthOverflow => "When a monthly task lands past the end of a month".to_string(),
            Message::PromptArchiveDays => "Auto-archive items older than (days)".to_string(),
            Message::PromptWeekStart => "First day of the week".to_string(),
            Message::PromptUrgentLimit => "Urgent tasks shown on the dashboard".to_string(),

            // === GENERAL ===
            Message::OperationCancelled => "Operation cancelled".to_string(),
            Message::ActivityNotRecorded(error) => format!("Activity feed not updated: {}", error),

            // === MIGRATION MESSAGES ===
            Message::MigrationsFound(count) => format!("Found {} pending database migrations", count),
            Message::RunningMigration(version, name) => format!("Running migration v{}: {}", version, name),
            Message::MigrationFailed(version, error) => format!("✗ Migration v{} failed: {}", version, error),
            Message::DatabaseUpToDate => "Database schema is up to date".to_string(),
        };

        write!(f, "{}", text)
    }
}
