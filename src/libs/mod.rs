//! Domain logic of Work Suite.
//!
//! - **Core types**: [`task`], [`recurrence`], [`session`], [`error`]
//! - **Queries**: [`filter`], [`stats`], [`dashboard`]
//! - **Data movement**: [`export`], [`import`], [`archive`]
//! - **Infrastructure**: [`config`], [`data_storage`], [`messages`], [`formatter`], [`view`]
//!
//! ```rust,no_run
//! use worksuite::db::{db::Db, todos::Todos};
//! use worksuite::libs::{session::Session, task::Task};
//!
//! let db = Db::new()?;
//! let session = Session::new("u1")?;
//! let id = Todos::new(&db, &session).insert(&Task::new("Write the quarterly plan"))?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod archive;
pub mod config;
pub mod dashboard;
pub mod data_storage;
pub mod error;
pub mod export;
pub mod filter;
pub mod formatter;
pub mod import;
pub mod messages;
pub mod recurrence;
pub mod session;
pub mod stats;
pub mod task;
pub mod view;
