//! Every user-facing message of the application.
//!
//! Text lives in [`super::display`]; callers only pick a variant and its
//! parameters.

use crate::libs::archive::ArchiveReport;
use crate::libs::import::ImportReport;
use crate::libs::task::Status;

#[derive(Debug, Clone)]
pub enum Message {
    // === TODO MESSAGES ===
    TaskCreated(i64, String), // id, title
    TaskUpdated(String),
    TaskArchived(String),
    TasksStatusChanged(usize, Status),
    TasksDeleted(usize),
    RecurringTaskScheduled(String, String), // title, due date
    CommentAdded(i64),
    NoTasksFound,
    ConfirmDeleteTask(String),
    ConfirmDeleteTasks(usize),

    // === JOURNAL MESSAGES ===
    JournalCreated(i64),
    JournalUpdated(i64),
    JournalArchived(i64),
    JournalDeleted(i64),
    NoJournalEntriesFound,
    ConfirmDeleteJournal(String), // entry date

    // === MEETING MESSAGES ===
    MeetingCreated(i64, String), // id, subject
    MeetingUpdated(String),
    MeetingArchived(String),
    MeetingDeleted(String),
    MeetingActionAdded(String),
    MeetingActionToggled(i64, bool), // action id, completed
    NoMeetingsFound,
    ConfirmDeleteMeeting(String),

    // === KNOWLEDGE MESSAGES ===
    KnowledgeCreated(i64, String),
    KnowledgeUpdated(String),
    KnowledgeDeleted(String),
    NoKnowledgeFound,
    ConfirmDeleteKnowledge(String),

    // === DASHBOARD AND STATS ===
    DashboardHeader(String, String), // user name, date
    StorageStatsHeader,
    MigrationHistoryHeader,

    // === EXPORT / IMPORT ===
    ExportCompleted(String), // path
    ConfirmImport(String),   // path
    ImportCompleted(ImportReport),

    // === ARCHIVE MESSAGES ===
    ConfirmAutoArchive(u32, String), // days, cutoff date
    AutoArchiveCompleted(ArchiveReport),
    ArchiveEmpty(String), // kind
    ItemRestored(i64),
    ConfirmPurge(String, i64), // kind, id
    ItemPurged(i64),

    // === CONFIGURATION MESSAGES ===
    ConfigSaved,
    ConfigReset,
    NoUserConfigured,
    ConfigModuleUser,
    ConfigModuleRecurrence,
    ConfigModuleArchive,
    ConfigModuleDashboard,

    // === PROMPTS ===
    PromptSelectModules,
    PromptUserId,
    PromptUserName,
    PromptMonthOverflow,
    PromptArchiveDays,
    PromptWeekStart,
    PromptUrgentLimit,

    // === GENERAL ===
    OperationCancelled,
    ActivityNotRecorded(String),

    // === MIGRATION MESSAGES ===
    MigrationsFound(usize),
    RunningMigration(u32, String),
    MigrationFailed(u32, String),
    DatabaseUpToDate,
}
