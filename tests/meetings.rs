#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};
    use worksuite::db::db::Db;
    use worksuite::db::meetings::{Meeting, MeetingAction, Meetings};
    use worksuite::db::todos::Todos;
    use worksuite::libs::error::StoreError;
    use worksuite::libs::session::Session;
    use worksuite::libs::task::Task;

    struct MeetingTestContext {
        _temp_dir: TempDir,
        db: Db,
        session: Session,
    }

    impl TestContext for MeetingTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db = Db::open(temp_dir.path().join("worksuite.db")).unwrap();
            MeetingTestContext {
                _temp_dir: temp_dir,
                db,
                session: Session::new("alice").unwrap(),
            }
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn kickoff() -> Meeting {
        let mut meeting = Meeting::new(date(2024, 5, 10), time(10, 0), "Project kickoff");
        meeting.goal = Some("Agree on scope".to_string());
        meeting.participants = vec!["Dana".to_string(), "Lee".to_string()];
        meeting.actions = vec![MeetingAction::new("Draft plan"), MeetingAction::new("Book room")];
        meeting
    }

    #[test_context(MeetingTestContext)]
    #[test]
    fn test_save_and_get_with_actions(ctx: &mut MeetingTestContext) {
        let meetings = Meetings::new(&ctx.db, &ctx.session);
        let id = meetings.save(&kickoff()).unwrap();

        let stored = meetings.get(id).unwrap();
        assert_eq!(stored.subject, "Project kickoff");
        assert_eq!(stored.participants, vec!["Dana", "Lee"]);
        assert_eq!(stored.actions.len(), 2);
        assert_eq!(stored.actions[0].description, "Draft plan");
        assert_eq!(stored.actions[0].meeting_id, Some(id));
        assert_eq!(stored.open_actions(), 2);
    }

    #[test_context(MeetingTestContext)]
    #[test]
    fn test_update_replaces_action_list(ctx: &mut MeetingTestContext) {
        let meetings = Meetings::new(&ctx.db, &ctx.session);
        let id = meetings.save(&kickoff()).unwrap();

        let mut meeting = meetings.get(id).unwrap();
        meeting.subject = "Kickoff (moved)".to_string();
        meeting.actions.remove(0);
        meeting.actions.push(MeetingAction::new("Send minutes"));
        assert_eq!(meetings.save(&meeting).unwrap(), id);

        let stored = meetings.get(id).unwrap();
        assert_eq!(stored.subject, "Kickoff (moved)");
        let actions: Vec<&str> = stored.actions.iter().map(|a| a.description.as_str()).collect();
        assert_eq!(actions, vec!["Book room", "Send minutes"]);
        assert_eq!(meetings.list_all().unwrap().len(), 1);
    }

    #[test_context(MeetingTestContext)]
    #[test]
    fn test_blank_action_rejects_whole_save(ctx: &mut MeetingTestContext) {
        let meetings = Meetings::new(&ctx.db, &ctx.session);
        let mut meeting = kickoff();
        meeting.actions.push(MeetingAction::new("  "));

        let err = meetings.save(&meeting).unwrap_err();
        assert!(matches!(err.downcast_ref::<StoreError>(), Some(StoreError::Invalid(_))));
        assert!(meetings.list_all().unwrap().is_empty());
    }

    #[test_context(MeetingTestContext)]
    #[test]
    fn test_toggle_action(ctx: &mut MeetingTestContext) {
        let meetings = Meetings::new(&ctx.db, &ctx.session);
        let id = meetings.save(&kickoff()).unwrap();
        let action_id = meetings.get(id).unwrap().actions[1].id.unwrap();

        assert!(meetings.toggle_action(action_id).unwrap());
        assert_eq!(meetings.get(id).unwrap().open_actions(), 1);
        assert!(!meetings.toggle_action(action_id).unwrap());

        let bob = Session::new("bob").unwrap();
        assert!(Meetings::new(&ctx.db, &bob).toggle_action(action_id).is_err());
        assert!(meetings.toggle_action(9999).is_err());
    }

    #[test_context(MeetingTestContext)]
    #[test]
    fn test_action_links_to_own_todo(ctx: &mut MeetingTestContext) {
        let todo = Todos::new(&ctx.db, &ctx.session).insert(&Task::new("Draft plan")).unwrap();
        let meetings = Meetings::new(&ctx.db, &ctx.session);
        let mut meeting = kickoff();
        meeting.actions[0].linked_todo_id = Some(todo);
        meeting.actions[0].assignee = Some("Dana".to_string());
        meeting.actions[0].due_date = Some(date(2024, 5, 17));

        let id = meetings.save(&meeting).unwrap();
        let action = &meetings.get(id).unwrap().actions[0];
        assert_eq!(action.linked_todo_id, Some(todo));
        assert_eq!(action.assignee.as_deref(), Some("Dana"));
        assert_eq!(action.due_date, Some(date(2024, 5, 17)));

        meeting.actions[0].linked_todo_id = Some(4242);
        assert!(meetings.save(&meeting).is_err());
    }

    #[test_context(MeetingTestContext)]
    #[test]
    fn test_upcoming_and_archive(ctx: &mut MeetingTestContext) {
        let meetings = Meetings::new(&ctx.db, &ctx.session);
        let past = meetings.save(&Meeting::new(date(2024, 5, 1), time(9, 0), "Past")).unwrap();
        meetings.save(&Meeting::new(date(2024, 5, 20), time(9, 0), "Later")).unwrap();
        meetings.save(&Meeting::new(date(2024, 5, 10), time(14, 0), "Today afternoon")).unwrap();
        meetings.save(&Meeting::new(date(2024, 5, 10), time(9, 0), "Today morning")).unwrap();

        let upcoming: Vec<String> = meetings
            .upcoming(date(2024, 5, 10), 2)
            .unwrap()
            .into_iter()
            .map(|m| m.subject)
            .collect();
        assert_eq!(upcoming, vec!["Today morning", "Today afternoon"]);

        meetings.archive(past).unwrap();
        assert_eq!(meetings.list_active().unwrap().len(), 3);
        assert_eq!(meetings.count(true).unwrap(), 1);
    }

    #[test_context(MeetingTestContext)]
    #[test]
    fn test_delete_removes_actions(ctx: &mut MeetingTestContext) {
        let meetings = Meetings::new(&ctx.db, &ctx.session);
        let id = meetings.save(&kickoff()).unwrap();

        meetings.delete(id).unwrap();

        let remaining: i64 = ctx
            .db
            .conn
            .query_row("SELECT COUNT(*) FROM meeting_actions", [], |row| row.get(0))
            .unwrap();
        assert_eq!(remaining, 0);
    }
}
