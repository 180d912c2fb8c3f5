use super::Context;
use crate::{
    db::{
        activity::{ActivityAction, EntityType},
        meetings::{Meeting, MeetingAction, Meetings},
    },
    libs::{
        filter::{filter_meetings, MeetingTab, MeetingView},
        formatter::{parse_date, parse_time, split_list, to_minute},
        messages::Message,
        view::View,
    },
    msg_info, msg_success,
};
use anyhow::Result;
use chrono::Local;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct MeetingArgs {
    #[command(subcommand)]
    command: MeetingCommand,
}

#[derive(Debug, Args)]
struct MeetingFields {
    /// Date: YYYY-MM-DD, today, tomorrow or yesterday.
    #[arg(long)]
    date: Option<String>,
    /// Time as HH:MM.
    #[arg(long)]
    time: Option<String>,
    #[arg(short, long)]
    goal: Option<String>,
    /// Comma separated participant names.
    #[arg(short, long)]
    participants: Option<String>,
    #[arg(short, long)]
    notes: Option<String>,
}

#[derive(Debug, Subcommand)]
enum MeetingCommand {
    Add {
        subject: String,
        #[command(flatten)]
        fields: MeetingFields,
        /// Action item description, may be repeated.
        #[arg(short, long = "action")]
        actions: Vec<String>,
    },
    List {
        #[arg(short, long, value_enum, default_value_t = MeetingTab::Upcoming)]
        tab: MeetingTab,
        #[arg(short, long, default_value = "")]
        query: String,
    },
    /// Meeting details with action items.
    Show { id: i64 },
    Edit {
        id: i64,
        #[arg(long)]
        subject: Option<String>,
        #[command(flatten)]
        fields: MeetingFields,
    },
    /// Add an action item to a meeting.
    Action {
        id: i64,
        description: String,
        #[arg(long)]
        assignee: Option<String>,
        #[arg(long)]
        due: Option<String>,
        /// Id of a task that tracks this action.
        #[arg(long)]
        todo: Option<i64>,
    },
    /// Flip the completion of an action item.
    Toggle { action_id: i64 },
    Archive { id: i64 },
    Delete { id: i64 },
}

pub fn cmd(args: MeetingArgs, ctx: &Context) -> Result<()> {
    let meetings = Meetings::new(&ctx.db, &ctx.session);
    match args.command {
        MeetingCommand::Add { subject, fields, actions } => {
            let now = Local::now().naive_local();
            let mut meeting = Meeting::new(ctx.today, to_minute(now), &subject);
            apply_fields(ctx, &mut meeting, fields)?;
            meeting.actions = actions.iter().map(|a| MeetingAction::new(a)).collect();
            let id = meetings.save(&meeting)?;
            ctx.record(ActivityAction::Create, EntityType::Meeting, &meeting.subject);
            msg_success!(Message::MeetingCreated(id, meeting.subject));
            Ok(())
        }
        MeetingCommand::List { tab, query } => {
            let all = meetings.list_active()?;
            let visible = filter_meetings(&all, &MeetingView { tab, query }, ctx.today);
            if visible.is_empty() {
                msg_info!(Message::NoMeetingsFound);
                return Ok(());
            }
            View::meetings(&visible)
        }
        MeetingCommand::Show { id } => View::meeting_detail(&meetings.get(id)?),
        MeetingCommand::Edit { id, subject, fields } => {
            let mut meeting = meetings.get(id)?;
            if let Some(subject) = subject {
                meeting.subject = subject;
            }
            apply_fields(ctx, &mut meeting, fields)?;
            meetings.save(&meeting)?;
            ctx.record(ActivityAction::Update, EntityType::Meeting, &meeting.subject);
            msg_success!(Message::MeetingUpdated(meeting.subject));
            Ok(())
        }
        MeetingCommand::Action {
            id,
            description,
            assignee,
            due,
            todo,
        } => {
            let mut meeting = meetings.get(id)?;
            let mut action = MeetingAction::new(&description);
            action.assignee = assignee;
            action.due_date = due.map(|d| parse_date(&d, ctx.today)).transpose()?;
            action.linked_todo_id = todo;
            meeting.actions.push(action);
            meetings.save(&meeting)?;
            msg_success!(Message::MeetingActionAdded(meeting.subject));
            Ok(())
        }
        MeetingCommand::Toggle { action_id } => {
            let completed = meetings.toggle_action(action_id)?;
            msg_success!(Message::MeetingActionToggled(action_id, completed));
            Ok(())
        }
        MeetingCommand::Archive { id } => {
            let meeting = meetings.get(id)?;
            meetings.archive(id)?;
            ctx.record(ActivityAction::Archive, EntityType::Meeting, &meeting.subject);
            msg_success!(Message::MeetingArchived(meeting.subject));
            Ok(())
        }
        MeetingCommand::Delete { id } => {
            let meeting = meetings.get(id)?;
            if !ctx.confirm(Message::ConfirmDeleteMeeting(meeting.subject.clone()))? {
                return Ok(());
            }
            meetings.delete(id)?;
            ctx.record(ActivityAction::Delete, EntityType::Meeting, &meeting.subject);
            msg_success!(Message::MeetingDeleted(meeting.subject));
            Ok(())
        }
    }
}

fn apply_fields(ctx: &Context, meeting: &mut Meeting, fields: MeetingFields) -> Result<()> {
    if let Some(date) = fields.date {
        meeting.date = parse_date(&date, ctx.today)?;
    }
    if let Some(time) = fields.time {
        meeting.time = parse_time(&time)?;
    }
    if let Some(goal) = fields.goal {
        meeting.goal = Some(goal).filter(|g| !g.trim().is_empty());
    }
    if let Some(participants) = fields.participants {
        meeting.participants = split_list(&participants);
    }
    if let Some(notes) = fields.notes {
        meeting.notes = Some(notes).filter(|n| !n.trim().is_empty());
    }
    Ok(())
}
