use super::Context;
use crate::{
    db::{
        activity::{ActivityAction, EntityType},
        categories::{Categories, CategoryKind},
        knowledge::{Knowledge, KnowledgeItem},
    },
    libs::{
        filter::{filter_knowledge, KnowledgeView},
        formatter::split_list,
        messages::Message,
        view::View,
    },
    msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct KnowledgeArgs {
    #[command(subcommand)]
    command: KnowledgeCommand,
}

#[derive(Debug, Args)]
struct ItemFields {
    #[arg(short, long)]
    description: Option<String>,
    #[arg(short, long)]
    category: Option<String>,
    /// Comma separated tags.
    #[arg(short, long)]
    tags: Option<String>,
    #[arg(short, long)]
    url: Option<String>,
    /// Linked task id, may be repeated.
    #[arg(long = "todo")]
    todos: Vec<i64>,
    /// Linked journal entry id, may be repeated.
    #[arg(long = "journal")]
    journals: Vec<i64>,
}

#[derive(Debug, Subcommand)]
enum KnowledgeCommand {
    Add {
        title: String,
        #[command(flatten)]
        fields: ItemFields,
    },
    List {
        #[arg(short, long, default_value = "")]
        query: String,
        #[arg(short, long)]
        category: Option<String>,
    },
    Show { id: i64 },
    Edit {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        #[command(flatten)]
        fields: ItemFields,
    },
    Delete { id: i64 },
    /// Known knowledge categories.
    Categories,
}

pub fn cmd(args: KnowledgeArgs, ctx: &Context) -> Result<()> {
    let knowledge = Knowledge::new(&ctx.db, &ctx.session);
    match args.command {
        KnowledgeCommand::Add { title, fields } => {
            let mut item = KnowledgeItem::new(&title);
            apply_fields(&mut item, fields);
            let id = knowledge.insert(&item)?;
            ctx.record(ActivityAction::Create, EntityType::Knowledge, &item.title);
            msg_success!(Message::KnowledgeCreated(id, item.title));
            Ok(())
        }
        KnowledgeCommand::List { query, category } => {
            let items = knowledge.list()?;
            let visible = filter_knowledge(&items, &KnowledgeView { query, category });
            if visible.is_empty() {
                msg_info!(Message::NoKnowledgeFound);
                return Ok(());
            }
            View::knowledge(&visible)
        }
        KnowledgeCommand::Show { id } => {
            let item = knowledge.get(id)?;
            View::knowledge(&[&item])?;
            if !item.description.is_empty() {
                msg_print!(item.description, true);
            }
            Ok(())
        }
        KnowledgeCommand::Edit { id, title, fields } => {
            let mut item = knowledge.get(id)?;
            if let Some(title) = title {
                item.title = title;
            }
            apply_fields(&mut item, fields);
            knowledge.update(&item)?;
            ctx.record(ActivityAction::Update, EntityType::Knowledge, &item.title);
            msg_success!(Message::KnowledgeUpdated(item.title));
            Ok(())
        }
        KnowledgeCommand::Delete { id } => {
            let item = knowledge.get(id)?;
            if !ctx.confirm(Message::ConfirmDeleteKnowledge(item.title.clone()))? {
                return Ok(());
            }
            knowledge.delete(id)?;
            ctx.record(ActivityAction::Delete, EntityType::Knowledge, &item.title);
            msg_success!(Message::KnowledgeDeleted(item.title));
            Ok(())
        }
        KnowledgeCommand::Categories => {
            for category in Categories::new(&ctx.db, &ctx.session).list(CategoryKind::Knowledge)? {
                msg_print!(category);
            }
            Ok(())
        }
    }
}

fn apply_fields(item: &mut KnowledgeItem, fields: ItemFields) {
    if let Some(description) = fields.description {
        item.description = description;
    }
    if let Some(category) = fields.category {
        item.category = Some(category.trim().to_string()).filter(|c| !c.is_empty());
    }
    if let Some(tags) = fields.tags {
        item.tags = split_list(&tags);
    }
    if let Some(url) = fields.url {
        item.url = Some(url).filter(|u| !u.trim().is_empty());
    }
    if !fields.todos.is_empty() {
        item.linked_todo_ids = fields.todos;
    }
    if !fields.journals.is_empty() {
        item.linked_journal_ids = fields.journals;
    }
}
