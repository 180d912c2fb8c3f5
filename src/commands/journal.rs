use super::Context;
use crate::{
    db::{
        activity::{ActivityAction, EntityType},
        categories::{Categories, CategoryKind},
        journals::{JournalEntry, Journals},
    },
    libs::{
        filter::{filter_journals, JournalView},
        formatter::{parse_date, parse_time, split_list, to_minute},
        messages::Message,
        view::View,
    },
    msg_info, msg_print, msg_success,
};
use anyhow::Result;
use chrono::Local;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct JournalArgs {
    #[command(subcommand)]
    command: JournalCommand,
}

#[derive(Debug, Args)]
struct EntryFields {
    /// Date: YYYY-MM-DD, today, tomorrow or yesterday.
    #[arg(long)]
    date: Option<String>,
    /// Time as HH:MM.
    #[arg(long)]
    time: Option<String>,
    #[arg(short, long)]
    category: Option<String>,
    /// Comma separated tags.
    #[arg(short, long)]
    tags: Option<String>,
    /// Id of the task this entry is about.
    #[arg(long)]
    todo: Option<i64>,
}

#[derive(Debug, Subcommand)]
enum JournalCommand {
    /// Log what you did. Date and time default to now.
    Add {
        description: String,
        #[command(flatten)]
        fields: EntryFields,
    },
    List {
        #[arg(short, long, default_value = "")]
        query: String,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
    },
    Edit {
        id: i64,
        #[arg(long)]
        description: Option<String>,
        #[command(flatten)]
        fields: EntryFields,
    },
    Archive { id: i64 },
    Delete { id: i64 },
    /// Known journal categories.
    Categories,
}

pub fn cmd(args: JournalArgs, ctx: &Context) -> Result<()> {
    let journals = Journals::new(&ctx.db, &ctx.session);
    match args.command {
        JournalCommand::Add { description, fields } => {
            let now = Local::now().naive_local();
            let mut entry = JournalEntry::new(now.date(), to_minute(now), &description);
            apply_fields(ctx, &mut entry, fields)?;
            let id = journals.insert(&entry)?;
            ctx.record(ActivityAction::Create, EntityType::Journal, &entry.description);
            msg_success!(Message::JournalCreated(id));
            Ok(())
        }
        JournalCommand::List { query, category, from, to } => {
            let view = JournalView {
                query,
                category,
                from: from.map(|d| parse_date(&d, ctx.today)).transpose()?,
                to: to.map(|d| parse_date(&d, ctx.today)).transpose()?,
            };
            let entries = journals.list_active()?;
            let visible = filter_journals(&entries, &view);
            if visible.is_empty() {
                msg_info!(Message::NoJournalEntriesFound);
                return Ok(());
            }
            View::journals(&visible)
        }
        JournalCommand::Edit { id, description, fields } => {
            let mut entry = journals.get(id)?;
            if let Some(description) = description {
                entry.description = description;
            }
            apply_fields(ctx, &mut entry, fields)?;
            journals.update(&entry)?;
            ctx.record(ActivityAction::Update, EntityType::Journal, &entry.description);
            msg_success!(Message::JournalUpdated(id));
            Ok(())
        }
        JournalCommand::Archive { id } => {
            let entry = journals.get(id)?;
            journals.archive(id)?;
            ctx.record(ActivityAction::Archive, EntityType::Journal, &entry.description);
            msg_success!(Message::JournalArchived(id));
            Ok(())
        }
        JournalCommand::Delete { id } => {
            let entry = journals.get(id)?;
            if !ctx.confirm(Message::ConfirmDeleteJournal(entry.date.to_string()))? {
                return Ok(());
            }
            journals.delete(id)?;
            ctx.record(ActivityAction::Delete, EntityType::Journal, &entry.description);
            msg_success!(Message::JournalDeleted(id));
            Ok(())
        }
        JournalCommand::Categories => {
            for category in Categories::new(&ctx.db, &ctx.session).list(CategoryKind::Journal)? {
                msg_print!(category);
            }
            Ok(())
        }
    }
}

fn apply_fields(ctx: &Context, entry: &mut JournalEntry, fields: EntryFields) -> Result<()> {
    if let Some(date) = fields.date {
        entry.date = parse_date(&date, ctx.today)?;
    }
    if let Some(time) = fields.time {
        entry.time = parse_time(&time)?;
    }
    if let Some(category) = fields.category {
        entry.category = Some(category.trim().to_string()).filter(|c| !c.is_empty());
    }
    if let Some(tags) = fields.tags {
        entry.tags = split_list(&tags);
    }
    if let Some(todo) = fields.todo {
        entry.linked_todo_id = Some(todo).filter(|&id| id > 0);
    }
    Ok(())
}
