//! Persistence layer.
//!
//! All data lives in one SQLite file whose schema is owned by [`migrations`].
//! Each table has a store type borrowing the open [`db::Db`] and the current
//! [`crate::libs::session::Session`]; stores never see rows of other users.
//!
//! ```rust
//! use worksuite::db::{db::Db, journals::{JournalEntry, Journals}};
//! use worksuite::libs::session::Session;
//! use chrono::{NaiveDate, NaiveTime};
//!
//! let db = Db::in_memory()?;
//! let session = Session::new("alice")?;
//! let journals = Journals::new(&db, &session);
//! let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
//! let time = NaiveTime::from_hms_opt(9, 30, 0).unwrap();
//! journals.insert(&JournalEntry::new(date, time, "Sprint planning"))?;
//! assert_eq!(journals.on_date(date)?.len(), 1);
//! # Ok::<(), anyhow::Error>(())
//! ```

/// Connection setup and JSON column helpers.
pub mod db;

/// Versioned schema.
pub mod migrations;

pub mod activity;
pub mod categories;
pub mod comments;
pub mod journals;
pub mod knowledge;
pub mod meetings;

/// Todos, subtasks and recurring roll-forward.
pub mod todos;
