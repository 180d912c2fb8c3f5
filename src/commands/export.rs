use super::Context;
use crate::{
    libs::{
        export::{journal_day_file_name, journal_period_file_name, ExportSections, Exporter},
        formatter::parse_date,
        messages::Message,
    },
    msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[command(subcommand)]
    command: ExportCommand,
}

#[derive(Debug, Subcommand)]
enum ExportCommand {
    /// JSON backup of the selected sections (all when none is selected).
    Backup {
        #[arg(long)]
        todos: bool,
        #[arg(long)]
        journals: bool,
        #[arg(long)]
        meetings: bool,
        #[arg(long)]
        knowledge: bool,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Plain-text journal of one day.
    JournalDay {
        date: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Plain-text journal of a date range, both ends included.
    JournalPeriod {
        from: String,
        to: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

pub fn cmd(args: ExportArgs, ctx: &Context) -> Result<()> {
    let exporter = Exporter::new(&ctx.db, &ctx.session);
    match args.command {
        ExportCommand::Backup {
            todos,
            journals,
            meetings,
            knowledge,
            output,
        } => {
            let sections = if todos || journals || meetings || knowledge {
                ExportSections {
                    todos,
                    journals,
                    meetings,
                    knowledge,
                }
            } else {
                ExportSections::default()
            };
            let path = exporter.write_backup(sections, output, ctx.today)?;
            msg_success!(Message::ExportCompleted(path.display().to_string()));
        }
        ExportCommand::JournalDay { date, output } => {
            let date = parse_date(&date, ctx.today)?;
            let path = output.unwrap_or_else(|| PathBuf::from(journal_day_file_name(date)));
            fs::write(&path, exporter.journal_day(date)?)?;
            msg_success!(Message::ExportCompleted(path.display().to_string()));
        }
        ExportCommand::JournalPeriod { from, to, output } => {
            let from = parse_date(&from, ctx.today)?;
            let to = parse_date(&to, ctx.today)?;
            let path = output.unwrap_or_else(|| PathBuf::from(journal_period_file_name(from, to)));
            fs::write(&path, exporter.journal_period(from, to)?)?;
            msg_success!(Message::ExportCompleted(path.display().to_string()));
        }
    }
    Ok(())
}
