use super::Context;
use crate::{
    db::{
        activity::{ActivityAction, EntityType},
        comments::Comments,
        todos::Todos,
    },
    libs::{
        filter::{filter_tasks, TaskSort, TaskTab, TaskView, TodayMode},
        formatter::parse_date,
        messages::Message,
        recurrence::{Cadence, Recurrence},
        task::{Priority, Status, Task},
        view::View,
    },
    msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct TodoArgs {
    #[command(subcommand)]
    command: TodoCommand,
}

/// Fields shared by `add` and `edit`.
#[derive(Debug, Args)]
struct TaskFields {
    #[arg(short, long)]
    description: Option<String>,
    #[arg(short, long)]
    owner: Option<String>,
    /// Start date: YYYY-MM-DD, today, tomorrow or yesterday.
    #[arg(long)]
    start: Option<String>,
    /// Due date: YYYY-MM-DD, today, tomorrow or yesterday.
    #[arg(long)]
    due: Option<String>,
    #[arg(short, long, value_enum)]
    priority: Option<Priority>,
    #[arg(short, long, value_enum)]
    status: Option<Status>,
    /// Repeat the task after completion.
    #[arg(long, value_enum)]
    repeat: Option<Cadence>,
    /// Repeat interval in cadence units (default 1). On its own it changes the interval of a recurring task.
    #[arg(long)]
    every: Option<u32>,
}

#[derive(Debug, Subcommand)]
enum TodoCommand {
    /// Create a task or, with --parent, a subtask.
    Add {
        title: String,
        #[arg(long)]
        parent: Option<i64>,
        #[command(flatten)]
        fields: TaskFields,
    },
    List {
        #[arg(short, long, value_enum, default_value_t = TaskTab::Today)]
        tab: TaskTab,
        #[arg(short, long, value_enum, default_value_t = TodayMode::Both)]
        mode: TodayMode,
        #[arg(long, value_enum, default_value_t = TaskSort::Created)]
        sort: TaskSort,
        #[arg(short, long, default_value = "")]
        query: String,
        #[arg(short, long, value_enum)]
        priority: Option<Priority>,
        #[arg(short, long)]
        owner: Option<String>,
    },
    /// Task details with subtasks and comments.
    Show { id: i64 },
    Edit {
        id: i64,
        #[arg(long)]
        title: Option<String>,
        /// Stop repeating this task.
        #[arg(long, conflicts_with_all = ["repeat", "every"])]
        no_repeat: bool,
        #[command(flatten)]
        fields: TaskFields,
    },
    /// Set the status of one or more tasks.
    Status {
        #[arg(value_enum)]
        status: Status,
        #[arg(required = true)]
        ids: Vec<i64>,
    },
    /// Mark tasks done.
    Done {
        #[arg(required = true)]
        ids: Vec<i64>,
    },
    Archive { id: i64 },
    Restore { id: i64 },
    Delete {
        #[arg(required = true)]
        ids: Vec<i64>,
    },
    Comment { id: i64, text: String },
    /// Owner names in use.
    Owners,
}

pub fn cmd(args: TodoArgs, ctx: &Context) -> Result<()> {
    match args.command {
        TodoCommand::Add { title, parent, fields } => handle_add(ctx, title, parent, fields),
        TodoCommand::List {
            tab,
            mode,
            sort,
            query,
            priority,
            owner,
        } => {
            let view = TaskView {
                tab,
                today_mode: mode,
                sort,
                query,
                priority,
                owner,
            };
            handle_list(ctx, &view)
        }
        TodoCommand::Show { id } => handle_show(ctx, id),
        TodoCommand::Edit {
            id,
            title,
            no_repeat,
            fields,
        } => handle_edit(ctx, id, title, no_repeat, fields),
        TodoCommand::Status { status, ids } => handle_status(ctx, &ids, status),
        TodoCommand::Done { ids } => handle_status(ctx, &ids, Status::Done),
        TodoCommand::Archive { id } => {
            let task = todos(ctx).get(id)?;
            todos(ctx).archive(id)?;
            ctx.record(ActivityAction::Archive, EntityType::Todo, &task.title);
            msg_success!(Message::TaskArchived(task.title));
            Ok(())
        }
        TodoCommand::Restore { id } => {
            todos(ctx).restore(id)?;
            msg_success!(Message::ItemRestored(id));
            Ok(())
        }
        TodoCommand::Delete { ids } => handle_delete(ctx, &ids),
        TodoCommand::Comment { id, text } => {
            Comments::new(&ctx.db, &ctx.session).add(id, &text)?;
            msg_success!(Message::CommentAdded(id));
            Ok(())
        }
        TodoCommand::Owners => {
            for owner in todos(ctx).owners()? {
                msg_print!(owner);
            }
            Ok(())
        }
    }
}

fn todos(ctx: &Context) -> Todos<'_> {
    Todos::new(&ctx.db, &ctx.session).with_month_overflow(ctx.config.recurrence.month_overflow)
}

fn apply_fields(ctx: &Context, task: &mut Task, fields: TaskFields) -> Result<()> {
    if let Some(description) = fields.description {
        task.description = Some(description).filter(|d| !d.trim().is_empty());
    }
    if let Some(owner) = fields.owner {
        task.owner = Some(owner).filter(|o| !o.trim().is_empty());
    }
    if let Some(start) = fields.start {
        task.start_date = Some(parse_date(&start, ctx.today)?);
    }
    if let Some(due) = fields.due {
        task.due_date = Some(parse_date(&due, ctx.today)?);
    }
    if let Some(priority) = fields.priority {
        task.priority = priority;
    }
    if let Some(status) = fields.status {
        task.status = status;
    }
    task.recurrence = Recurrence::revise(task.recurrence, fields.repeat, fields.every)?;
    Ok(())
}

fn handle_add(ctx: &Context, title: String, parent: Option<i64>, fields: TaskFields) -> Result<()> {
    let mut task = Task::new(&title);
    task.parent_id = parent;
    apply_fields(ctx, &mut task, fields)?;

    let id = todos(ctx).insert(&task)?;
    ctx.record(ActivityAction::Create, EntityType::Todo, &task.title);
    msg_success!(Message::TaskCreated(id, task.title));
    Ok(())
}

fn handle_list(ctx: &Context, view: &TaskView) -> Result<()> {
    let tasks = todos(ctx).list_active()?;
    let visible = filter_tasks(&tasks, view, ctx.today);

    if visible.is_empty() {
        msg_info!(Message::NoTasksFound);
        return Ok(());
    }

    View::tasks(&visible, ctx.today)?;
    Ok(())
}

fn handle_show(ctx: &Context, id: i64) -> Result<()> {
    let store = todos(ctx);
    let task = store.get(id)?;
    let subtasks = store.subtasks(id)?;
    let comments = Comments::new(&ctx.db, &ctx.session).list(id)?;

    View::task_detail(&task, &subtasks, &comments)?;
    Ok(())
}

fn handle_edit(ctx: &Context, id: i64, title: Option<String>, no_repeat: bool, fields: TaskFields) -> Result<()> {
    let store = todos(ctx);
    let mut task = store.get(id)?;
    if let Some(title) = title {
        task.title = title;
    }
    if no_repeat {
        task.recurrence = None;
    }
    apply_fields(ctx, &mut task, fields)?;

    let successor = store.update(&task, ctx.today)?;
    ctx.record(ActivityAction::Update, EntityType::Todo, &task.title);
    msg_success!(Message::TaskUpdated(task.title.clone()));
    report_successor(ctx, successor)
}

fn handle_status(ctx: &Context, ids: &[i64], status: Status) -> Result<()> {
    let store = todos(ctx);
    let successors = store.bulk_set_status(ids, status, ctx.today)?;

    for &id in ids {
        let task = store.get(id)?;
        ctx.record(ActivityAction::Update, EntityType::Todo, &task.title);
    }
    msg_success!(Message::TasksStatusChanged(ids.len(), status));
    for successor in successors {
        report_successor(ctx, Some(successor))?;
    }
    Ok(())
}

fn report_successor(ctx: &Context, successor: Option<i64>) -> Result<()> {
    if let Some(id) = successor {
        let next = todos(ctx).get(id)?;
        let due = next.due_date.map(|d| d.to_string()).unwrap_or_default();
        msg_info!(Message::RecurringTaskScheduled(next.title, due));
    }
    Ok(())
}

fn handle_delete(ctx: &Context, ids: &[i64]) -> Result<()> {
    let store = todos(ctx);
    let titles = ids.iter().map(|&id| store.get(id).map(|t| t.title)).collect::<Result<Vec<_>>>()?;

    let prompt = match titles.as_slice() {
        [title] => Message::ConfirmDeleteTask(title.clone()),
        _ => Message::ConfirmDeleteTasks(titles.len()),
    };
    if !ctx.confirm(prompt)? {
        return Ok(());
    }

    let deleted = store.delete_many(ids)?;
    for title in &titles {
        ctx.record(ActivityAction::Delete, EntityType::Todo, title);
    }
    msg_success!(Message::TasksDeleted(deleted));
    Ok(())
}
