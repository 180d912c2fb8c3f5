//! Database schema migration management and versioning.
//!
//! Every table of the application is created here, one versioned step at a
//! time. Each step runs inside the migration transaction and is recorded in the
//! `migrations` table so it is applied exactly once per database file.
//!
//! ## Usage
//!
//! ```rust
//! use worksuite::db::migrations::{get_db_version, init_with_migrations};
//! use rusqlite::Connection;
//!
//! let mut conn = Connection::open_in_memory()?;
//! init_with_migrations(&mut conn)?;
//! assert!(get_db_version(&conn)? > 0);
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::libs::messages::Message;
use crate::{msg_debug, msg_error};
use anyhow::Result;
use rusqlite::{params, Connection, Transaction};

/// Tracking table for applied migrations.
const MIGRATIONS_TABLE: &str = "
CREATE TABLE IF NOT EXISTS migrations (
    id INTEGER PRIMARY KEY,
    version INTEGER NOT NULL UNIQUE,
    name TEXT NOT NULL,
    applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)";

/// A single schema step.
#[derive(Debug, Clone)]
struct Migration {
    version: u32,
    name: &'static str,
    up: fn(&Transaction) -> Result<()>,
}

/// Registry of all migrations, kept in version order.
pub struct MigrationManager {
    migrations: Vec<Migration>,
}

impl Default for MigrationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MigrationManager {
    pub fn new() -> Self {
        let mut manager = Self { migrations: Vec::new() };
        manager.register_migrations();
        manager
    }

    fn register_migrations(&mut self) {
        // Version 1: todos, subtasks (self reference) and task comments
        self.add_migration(1, "create_todos", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS todos (
                    id INTEGER PRIMARY KEY,
                    user_id TEXT NOT NULL,
                    parent_id INTEGER REFERENCES todos(id) ON DELETE CASCADE,
                    title TEXT NOT NULL,
                    description TEXT,
                    owner TEXT,
                    start_date DATE,
                    due_date DATE,
                    priority TEXT NOT NULL DEFAULT 'normal',
                    status TEXT NOT NULL DEFAULT 'new',
                    is_archived BOOLEAN NOT NULL DEFAULT FALSE,
                    is_recurring BOOLEAN NOT NULL DEFAULT FALSE,
                    recurring_type TEXT,
                    recurring_interval INTEGER,
                    sort_order INTEGER NOT NULL DEFAULT 0,
                    created_at TIMESTAMP NOT NULL,
                    updated_at TIMESTAMP NOT NULL,
                    CHECK (
                        (is_recurring = 0 AND recurring_type IS NULL AND recurring_interval IS NULL)
                        OR (is_recurring = 1 AND recurring_type IN ('daily', 'weekly', 'monthly') AND recurring_interval >= 1)
                    )
                )",
                [],
            )?;
            tx.execute(
                "CREATE TABLE IF NOT EXISTS todo_comments (
                    id INTEGER PRIMARY KEY,
                    todo_id INTEGER NOT NULL REFERENCES todos(id) ON DELETE CASCADE,
                    user_id TEXT NOT NULL,
                    text TEXT NOT NULL,
                    created_at TIMESTAMP NOT NULL
                )",
                [],
            )?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_todos_user ON todos(user_id, is_archived)", [])?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_todos_parent ON todos(parent_id)", [])?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_todo_comments_todo ON todo_comments(todo_id)", [])?;
            Ok(())
        });

        // Version 2: work journal and per-user categories
        self.add_migration(2, "add_journals_and_categories", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS journals (
                    id INTEGER PRIMARY KEY,
                    user_id TEXT NOT NULL,
                    date DATE NOT NULL,
                    time TEXT NOT NULL,
                    category TEXT,
                    tags TEXT NOT NULL DEFAULT '[]',
                    description TEXT NOT NULL,
                    linked_todo_id INTEGER REFERENCES todos(id) ON DELETE SET NULL,
                    is_archived BOOLEAN NOT NULL DEFAULT FALSE,
                    created_at TIMESTAMP NOT NULL,
                    updated_at TIMESTAMP NOT NULL
                )",
                [],
            )?;
            tx.execute(
                "CREATE TABLE IF NOT EXISTS categories (
                    id INTEGER PRIMARY KEY,
                    user_id TEXT NOT NULL,
                    kind TEXT NOT NULL,
                    name TEXT NOT NULL,
                    UNIQUE (user_id, kind, name)
                )",
                [],
            )?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_journals_user_date ON journals(user_id, date)", [])?;
            Ok(())
        });

        // Version 3: meetings and their action items
        self.add_migration(3, "add_meetings", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS meetings (
                    id INTEGER PRIMARY KEY,
                    user_id TEXT NOT NULL,
                    date DATE NOT NULL,
                    time TEXT NOT NULL,
                    subject TEXT NOT NULL,
                    goal TEXT,
                    participants TEXT NOT NULL DEFAULT '[]',
                    notes TEXT,
                    is_archived BOOLEAN NOT NULL DEFAULT FALSE,
                    created_at TIMESTAMP NOT NULL,
                    updated_at TIMESTAMP NOT NULL
                )",
                [],
            )?;
            tx.execute(
                "CREATE TABLE IF NOT EXISTS meeting_actions (
                    id INTEGER PRIMARY KEY,
                    meeting_id INTEGER NOT NULL REFERENCES meetings(id) ON DELETE CASCADE,
                    description TEXT NOT NULL,
                    assignee TEXT,
                    due_date DATE,
                    linked_todo_id INTEGER REFERENCES todos(id) ON DELETE SET NULL,
                    is_completed BOOLEAN NOT NULL DEFAULT FALSE,
                    created_at TIMESTAMP NOT NULL
                )",
                [],
            )?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_meetings_user_date ON meetings(user_id, date)", [])?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_meeting_actions_meeting ON meeting_actions(meeting_id)", [])?;
            Ok(())
        });

        // Version 4: knowledge base
        self.add_migration(4, "add_knowledge_base", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS knowledge (
                    id INTEGER PRIMARY KEY,
                    user_id TEXT NOT NULL,
                    title TEXT NOT NULL,
                    description TEXT NOT NULL DEFAULT '',
                    category TEXT,
                    tags TEXT NOT NULL DEFAULT '[]',
                    url TEXT,
                    linked_todo_ids TEXT NOT NULL DEFAULT '[]',
                    linked_journal_ids TEXT NOT NULL DEFAULT '[]',
                    created_at TIMESTAMP NOT NULL,
                    updated_at TIMESTAMP NOT NULL
                )",
                [],
            )?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_knowledge_user ON knowledge(user_id)", [])?;
            Ok(())
        });

        // Version 5: activity feed shown on the dashboard
        self.add_migration(5, "add_activity_log", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS activity_log (
                    id INTEGER PRIMARY KEY,
                    user_id TEXT NOT NULL,
                    action TEXT NOT NULL,
                    entity_type TEXT NOT NULL,
                    entity_title TEXT NOT NULL,
                    created_at TIMESTAMP NOT NULL
                )",
                [],
            )?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_activity_user_created ON activity_log(user_id, created_at)", [])?;
            Ok(())
        });
    }

    fn add_migration(&mut self, version: u32, name: &'static str, up: fn(&Transaction) -> Result<()>) {
        self.migrations.push(Migration { version, name, up });
    }

    /// Applies every migration newer than the recorded schema version.
    ///
    /// All pending steps share one transaction: either the database reaches
    /// the latest version or it stays where it was.
    pub fn run_migrations(&self, conn: &mut Connection) -> Result<()> {
        conn.execute(MIGRATIONS_TABLE, [])?;

        let current_version = self.get_current_version(conn)?;
        let pending: Vec<&Migration> = self.migrations.iter().filter(|m| m.version > current_version).collect();

        if pending.is_empty() {
            msg_debug!(Message::DatabaseUpToDate);
            return Ok(());
        }

        msg_debug!(Message::MigrationsFound(pending.len()));

        let tx = conn.transaction()?;
        for migration in pending {
            msg_debug!(Message::RunningMigration(migration.version, migration.name.to_string()));

            match (migration.up)(&tx) {
                Ok(()) => {
                    tx.execute(
                        "INSERT INTO migrations (version, name) VALUES (?1, ?2)",
                        params![migration.version, migration.name],
                    )?;
                }
                Err(e) => {
                    msg_error!(Message::MigrationFailed(migration.version, e.to_string()));
                    return Err(e);
                }
            }
        }
        tx.commit()?;
        tracing::info!(version = self.latest_version(), "database schema migrated");

        Ok(())
    }

    fn get_current_version(&self, conn: &Connection) -> Result<u32> {
        let version: Option<u32> = conn.query_row("SELECT MAX(version) FROM migrations", [], |row| row.get(0)).unwrap_or(Some(0));

        Ok(version.unwrap_or(0))
    }

    fn latest_version(&self) -> u32 {
        self.migrations.last().map(|m| m.version).unwrap_or(0)
    }

    pub fn is_migration_applied(&self, conn: &Connection, version: u32) -> Result<bool> {
        let count: i32 = conn.query_row("SELECT COUNT(*) FROM migrations WHERE version = ?1", params![version], |row| row.get(0))?;

        Ok(count > 0)
    }

    /// Applied migrations as `(version, name, applied_at)`, oldest first.
    pub fn get_migration_history(&self, conn: &Connection) -> Result<Vec<(u32, String, String)>> {
        let mut stmt = conn.prepare("SELECT version, name, applied_at FROM migrations ORDER BY version")?;

        let history = stmt
            .query_map([], |row| Ok((row.get::<_, u32>(0)?, row.get::<_, String>(1)?, row.get::<_, String>(2)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(history)
    }
}

/// Brings `conn` to the latest schema version.
pub fn init_with_migrations(conn: &mut Connection) -> Result<()> {
    let manager = MigrationManager::new();
    manager.run_migrations(conn)?;
    Ok(())
}

pub fn get_db_version(conn: &Connection) -> Result<u32> {
    let manager = MigrationManager::new();
    manager.get_current_version(conn)
}

pub fn needs_migration(conn: &Connection) -> Result<bool> {
    let manager = MigrationManager::new();
    let current = manager.get_current_version(conn)?;
    Ok(current < manager.latest_version())
}
