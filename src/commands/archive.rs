use super::Context;
use crate::{
    libs::{
        archive::{cutoff_date, Archive, ArchiveKind},
        formatter::format_date,
        messages::Message,
    },
    msg_info, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};
use prettytable::{row, Table};

#[derive(Debug, Args)]
pub struct ArchiveArgs {
    #[command(subcommand)]
    command: ArchiveCommand,
}

#[derive(Debug, Subcommand)]
enum ArchiveCommand {
    /// Archive done todos, journals and meetings older than the cutoff.
    Auto {
        /// Age in days; defaults to the configured value.
        #[arg(long)]
        days: Option<u32>,
    },
    List {
        #[arg(value_enum)]
        kind: ArchiveKind,
    },
    Restore {
        #[arg(value_enum)]
        kind: ArchiveKind,
        id: i64,
    },
    /// Permanently delete an archived item.
    Purge {
        #[arg(value_enum)]
        kind: ArchiveKind,
        id: i64,
    },
}

pub fn cmd(args: ArchiveArgs, ctx: &Context) -> Result<()> {
    let archive = Archive::new(&ctx.db, &ctx.session);
    match args.command {
        ArchiveCommand::Auto { days } => {
            let days = days.unwrap_or(ctx.config.archive.older_than_days);
            let cutoff = cutoff_date(ctx.today, days);
            if !ctx.confirm(Message::ConfirmAutoArchive(days, cutoff.to_string()))? {
                return Ok(());
            }
            let report = archive.auto_archive(ctx.today, days)?;
            msg_success!(Message::AutoArchiveCompleted(report));
        }
        ArchiveCommand::List { kind } => {
            let items = archive.list(kind)?;
            if items.is_empty() {
                msg_info!(Message::ArchiveEmpty(kind.to_string()));
                return Ok(());
            }
            let mut table = Table::new();
            table.add_row(row!["ID", "DATE", "TITLE"]);
            for item in items {
                table.add_row(row![item.id, format_date(item.date), item.title]);
            }
            table.printstd();
        }
        ArchiveCommand::Restore { kind, id } => {
            archive.restore(kind, id)?;
            msg_success!(Message::ItemRestored(id));
        }
        ArchiveCommand::Purge { kind, id } => {
            if !ctx.confirm(Message::ConfirmPurge(kind.to_string(), id))? {
                return Ok(());
            }
            archive.purge(kind, id)?;
            msg_success!(Message::ItemPurged(id));
        }
    }
    Ok(())
}
