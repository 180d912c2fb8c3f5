//! # Work Suite
//!
//! A personal productivity tracker keeping todos, a work journal, meeting
//! notes and a knowledge base in one local SQLite database.
//!
//! ## Features
//!
//! - **Todos**: priorities, statuses, subtasks, comments and recurring tasks
//!   that roll forward when completed
//! - **Journal**: dated entries with categories and tags
//! - **Meetings**: participants, notes and action items
//! - **Knowledge base**: notes linked to todos and journal entries
//! - **Dashboard**: open, overdue and due-today counts plus an activity feed
//! - **Backups**: JSON export and additive import, journal text summaries
//! - **Archive**: auto-archiving of old items, restore and purge
//!
//! All data is scoped to a user; see [`libs::session::Session`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use worksuite::commands::Cli;
//!
//! fn main() -> anyhow::Result<()> {
//!     Cli::menu()
//! }
//! ```

pub mod commands;
pub mod db;
pub mod libs;
