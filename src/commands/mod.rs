//! Command-line interface of `ws`.
//!
//! Each subcommand lives in its own module exposing an `Args` type and a
//! `cmd` handler. Handlers receive a [`Context`] carrying the open database,
//! the resolved user session, the configuration and "today", so none of them
//! reads global state on its own.

pub mod archive;
pub mod dashboard;
pub mod export;
pub mod import;
pub mod init;
pub mod journal;
pub mod knowledge;
pub mod meeting;
pub mod stats;
pub mod todo;

use crate::db::activity::{Activity, ActivityAction, EntityType};
use crate::db::db::Db;
use crate::libs::config::Config;
use crate::libs::messages::Message;
use crate::libs::session::Session;
use crate::{msg_info, msg_warning};
use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use dialoguer::{theme::ColorfulTheme, Confirm};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Interactive configuration")]
    Init(init::InitArgs),
    #[command(about = "Manage todos, subtasks and comments")]
    Todo(todo::TodoArgs),
    #[command(about = "Work journal")]
    Journal(journal::JournalArgs),
    #[command(about = "Meetings and action items")]
    Meeting(meeting::MeetingArgs),
    #[command(about = "Knowledge base")]
    Knowledge(knowledge::KnowledgeArgs),
    #[command(about = "Overview of today")]
    Dashboard,
    #[command(about = "Write a JSON backup or a journal summary")]
    Export(export::ExportArgs),
    #[command(about = "Import a JSON backup")]
    Import(import::ImportArgs),
    #[command(about = "Archive maintenance")]
    Archive(archive::ArchiveArgs),
    #[command(about = "Storage statistics")]
    Stats(stats::StatsArgs),
}

#[derive(Debug, Parser)]
#[command(name = "ws", author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    /// Act as this user instead of the configured one.
    #[arg(long, global = true)]
    user: Option<String>,

    /// Answer yes to every confirmation prompt.
    #[arg(short, long, global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Everything a command handler needs.
pub struct Context {
    pub db: Db,
    pub session: Session,
    pub config: Config,
    pub today: NaiveDate,
    pub assume_yes: bool,
}

impl Context {
    pub fn new(db: Db, session: Session, config: Config, today: NaiveDate, assume_yes: bool) -> Self {
        Self {
            db,
            session,
            config,
            today,
            assume_yes,
        }
    }

    /// Asks for confirmation unless `--yes` was given.
    pub fn confirm(&self, prompt: Message) -> Result<bool> {
        if self.assume_yes {
            return Ok(true);
        }
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt.to_string())
            .default(false)
            .interact()?;
        if !confirmed {
            msg_info!(Message::OperationCancelled);
        }
        Ok(confirmed)
    }

    /// Appends to the dashboard activity feed. A failure here never fails the command.
    pub fn record(&self, action: ActivityAction, entity: EntityType, title: &str) {
        if let Err(e) = Activity::new(&self.db, &self.session).record(action, entity, title) {
            msg_warning!(Message::ActivityNotRecorded(e.to_string()));
        }
    }
}

impl Cli {
    pub fn menu() -> Result<()> {
        let cli = Self::parse();

        if let Commands::Init(args) = cli.command {
            return init::cmd(args);
        }

        let config = Config::read()?;
        let session = config.session(cli.user.as_deref())?;
        let ctx = Context::new(Db::new()?, session, config, Local::now().date_naive(), cli.yes);
        tracing::debug!(user = ctx.session.user_id(), today = %ctx.today, "session resolved");

        match cli.command {
            Commands::Init(_) => Ok(()),
            Commands::Todo(args) => todo::cmd(args, &ctx),
            Commands::Journal(args) => journal::cmd(args, &ctx),
            Commands::Meeting(args) => meeting::cmd(args, &ctx),
            Commands::Knowledge(args) => knowledge::cmd(args, &ctx),
            Commands::Dashboard => dashboard::cmd(&ctx),
            Commands::Export(args) => export::cmd(args, &ctx),
            Commands::Import(args) => import::cmd(args, &ctx),
            Commands::Archive(args) => archive::cmd(args, &ctx),
            Commands::Stats(args) => stats::cmd(args, &ctx),
        }
    }
}
