#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};
    use worksuite::db::comments::Comments;
    use worksuite::db::db::Db;
    use worksuite::db::journals::{JournalEntry, Journals};
    use worksuite::db::knowledge::{Knowledge, KnowledgeItem};
    use worksuite::db::meetings::{Meeting, MeetingAction, Meetings};
    use worksuite::db::todos::Todos;
    use worksuite::libs::error::StoreError;
    use worksuite::libs::export::{
        backup_file_name, journal_day_file_name, journal_period_file_name, Backup, ExportSections, Exporter, BACKUP_VERSION,
    };
    use worksuite::libs::import::Importer;
    use worksuite::libs::session::Session;
    use worksuite::libs::task::{Status, Task};

    struct ExportTestContext {
        temp_dir: TempDir,
        db: Db,
        alice: Session,
        bob: Session,
    }

    impl TestContext for ExportTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db = Db::open(temp_dir.path().join("worksuite.db")).unwrap();
            ExportTestContext {
                temp_dir,
                db,
                alice: Session::new("alice").unwrap(),
                bob: Session::new("bob").unwrap(),
            }
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    /// Fills alice's data with one linked item of every kind.
    fn seed(ctx: &ExportTestContext) -> (i64, i64) {
        let todos = Todos::new(&ctx.db, &ctx.alice);
        let parent = todos.insert(&Task::new("Launch")).unwrap();
        let mut child = Task::new("Write announcement");
        child.parent_id = Some(parent);
        child.status = Status::InProgress;
        let child = todos.insert(&child).unwrap();
        Comments::new(&ctx.db, &ctx.alice).add(child, "Needs legal review").unwrap();

        let mut entry = JournalEntry::new(date(2024, 5, 10), time(9, 30), "Sprint planning");
        entry.tags = vec!["planning".to_string(), "team".to_string()];
        entry.linked_todo_id = Some(parent);
        let journal = Journals::new(&ctx.db, &ctx.alice).insert(&entry).unwrap();

        let mut meeting = Meeting::new(date(2024, 5, 10), time(11, 0), "Launch sync");
        let mut action = MeetingAction::new("Confirm date");
        action.linked_todo_id = Some(child);
        meeting.actions = vec![action];
        Meetings::new(&ctx.db, &ctx.alice).save(&meeting).unwrap();

        let mut item = KnowledgeItem::new("Launch checklist");
        item.linked_todo_ids = vec![parent];
        item.linked_journal_ids = vec![journal];
        Knowledge::new(&ctx.db, &ctx.alice).insert(&item).unwrap();

        (parent, child)
    }

    #[test_context(ExportTestContext)]
    #[test]
    fn test_backup_json_layout(ctx: &mut ExportTestContext) {
        seed(ctx);
        let backup = Exporter::new(&ctx.db, &ctx.alice).backup(ExportSections::default()).unwrap();
        assert_eq!(backup.version, BACKUP_VERSION);
        assert_eq!(backup.todos.as_ref().unwrap().len(), 2);
        assert_eq!(backup.todo_comments.as_ref().unwrap().len(), 1);
        assert_eq!(backup.meetings.as_ref().unwrap()[0].actions.len(), 1);

        let json: serde_json::Value = serde_json::from_str(&backup.to_json().unwrap()).unwrap();
        for key in ["version", "exportedAt", "todos", "todoComments", "journals", "meetings", "knowledge"] {
            assert!(json.get(key).is_some(), "missing key {}", key);
        }
    }

    #[test_context(ExportTestContext)]
    #[test]
    fn test_partial_backup_omits_sections(ctx: &mut ExportTestContext) {
        seed(ctx);
        let sections = ExportSections {
            todos: false,
            journals: true,
            meetings: false,
            knowledge: false,
        };
        let json = Exporter::new(&ctx.db, &ctx.alice).backup(sections).unwrap().to_json().unwrap();

        let parsed = Backup::from_json(&json).unwrap();
        assert!(parsed.todos.is_none());
        assert!(parsed.meetings.is_none());
        assert_eq!(parsed.journals.unwrap().len(), 1);
        assert!(!json.contains("todoComments"));
    }

    #[test_context(ExportTestContext)]
    #[test]
    fn test_backup_only_contains_own_data(ctx: &mut ExportTestContext) {
        seed(ctx);
        let backup = Exporter::new(&ctx.db, &ctx.bob).backup(ExportSections::default()).unwrap();
        assert!(backup.todos.unwrap().is_empty());
        assert!(backup.journals.unwrap().is_empty());
    }

    #[test_context(ExportTestContext)]
    #[test]
    fn test_import_into_other_user_remaps_links(ctx: &mut ExportTestContext) {
        seed(ctx);
        let json = Exporter::new(&ctx.db, &ctx.alice).backup(ExportSections::default()).unwrap().to_json().unwrap();

        let report = Importer::new(&ctx.db, &ctx.bob).import(&Backup::from_json(&json).unwrap()).unwrap();
        assert_eq!(report.todos, 2);
        assert_eq!(report.comments, 1);
        assert_eq!(report.journals, 1);
        assert_eq!(report.meetings, 1);
        assert_eq!(report.knowledge, 1);
        assert_eq!(report.skipped, 0);
        assert_eq!(report.total(), 6);

        let todos = Todos::new(&ctx.db, &ctx.bob);
        let bob_todos = todos.list_all().unwrap();
        let parent = bob_todos.iter().find(|t| t.title == "Launch").unwrap();
        let child = bob_todos.iter().find(|t| t.title == "Write announcement").unwrap();
        assert_eq!(child.parent_id, parent.id);
        assert_eq!(child.status, Status::InProgress);
        assert_eq!(child.user_id, "bob");

        let journal = &Journals::new(&ctx.db, &ctx.bob).list_all().unwrap()[0];
        assert_eq!(journal.linked_todo_id, parent.id);

        let meeting = &Meetings::new(&ctx.db, &ctx.bob).list_all().unwrap()[0];
        assert_eq!(meeting.actions[0].linked_todo_id, child.id);

        let item = &Knowledge::new(&ctx.db, &ctx.bob).list().unwrap()[0];
        assert_eq!(item.linked_todo_ids, vec![parent.id.unwrap()]);
        assert_eq!(item.linked_journal_ids, vec![journal.id.unwrap()]);

        assert_eq!(Comments::new(&ctx.db, &ctx.bob).list(child.id.unwrap()).unwrap().len(), 1);
    }

    #[test_context(ExportTestContext)]
    #[test]
    fn test_import_is_additive(ctx: &mut ExportTestContext) {
        seed(ctx);
        let backup = Exporter::new(&ctx.db, &ctx.alice).backup(ExportSections::default()).unwrap();

        Importer::new(&ctx.db, &ctx.alice).import(&backup).unwrap();

        assert_eq!(Todos::new(&ctx.db, &ctx.alice).list_all().unwrap().len(), 4);
        assert_eq!(Meetings::new(&ctx.db, &ctx.alice).list_all().unwrap().len(), 2);
    }

    #[test_context(ExportTestContext)]
    #[test]
    fn test_import_skips_invalid_records(ctx: &mut ExportTestContext) {
        let mut orphan = Task::new("Orphan comment target");
        orphan.id = Some(5);
        let backup = Backup {
            version: BACKUP_VERSION,
            todos: Some(vec![Task::new("  "), orphan]),
            journals: Some(vec![JournalEntry::new(date(2024, 1, 1), time(9, 0), "")]),
            ..Backup::default()
        };

        let report = Importer::new(&ctx.db, &ctx.alice).import(&backup).unwrap();
        assert_eq!(report.todos, 1);
        assert_eq!(report.journals, 0);
        assert_eq!(report.skipped, 2);
    }

    #[test_context(ExportTestContext)]
    #[test]
    fn test_import_detaches_parent_cycles(ctx: &mut ExportTestContext) {
        let mut a = Task::new("A");
        a.id = Some(1);
        a.parent_id = Some(2);
        let mut b = Task::new("B");
        b.id = Some(2);
        b.parent_id = Some(1);
        let backup = Backup {
            todos: Some(vec![a, b]),
            ..Backup::default()
        };

        let report = Importer::new(&ctx.db, &ctx.alice).import(&backup).unwrap();
        assert_eq!(report.todos, 2);
        assert!(Todos::new(&ctx.db, &ctx.alice).list_all().unwrap().iter().all(|t| t.parent_id.is_none()));
    }

    #[test_context(ExportTestContext)]
    #[test]
    fn test_import_attaches_listed_meeting_actions(ctx: &mut ExportTestContext) {
        let json = r#"{
            "meetings": [
                { "id": 7, "date": "2024-05-10", "time": "10:00:00", "subject": "Planning" }
            ],
            "meetingActions": [
                { "id": 1, "meeting_id": 7, "description": "Send notes", "is_completed": true },
                { "id": 2, "meeting_id": 7, "description": "Book demo" },
                { "id": 3, "meeting_id": 99, "description": "Lost action" }
            ]
        }"#;

        let report = Importer::new(&ctx.db, &ctx.alice).import(&Backup::from_json(json).unwrap()).unwrap();
        assert_eq!(report.meetings, 1);
        assert_eq!(report.skipped, 1);

        let meeting = &Meetings::new(&ctx.db, &ctx.alice).list_all().unwrap()[0];
        let actions: Vec<(&str, bool)> = meeting.actions.iter().map(|a| (a.description.as_str(), a.completed)).collect();
        assert_eq!(actions, vec![("Send notes", true), ("Book demo", false)]);
    }

    #[test_context(ExportTestContext)]
    #[test]
    fn test_invalid_backup_file(ctx: &mut ExportTestContext) {
        let err = Backup::from_json("{ not json").unwrap_err();
        assert!(matches!(err.downcast_ref::<StoreError>(), Some(StoreError::Invalid(_))));

        // Every section is optional.
        let empty = Backup::from_json("{}").unwrap();
        let report = Importer::new(&ctx.db, &ctx.alice).import(&empty).unwrap();
        assert_eq!(report.total(), 0);
    }

    #[test_context(ExportTestContext)]
    #[test]
    fn test_write_backup_to_file(ctx: &mut ExportTestContext) {
        seed(ctx);
        let path = ctx.temp_dir.path().join("backup.json");

        let written = Exporter::new(&ctx.db, &ctx.alice)
            .write_backup(ExportSections::default(), Some(path.clone()), date(2024, 5, 10))
            .unwrap();
        assert_eq!(written, path);

        let backup = Backup::read(&path).unwrap();
        assert_eq!(backup.knowledge.unwrap().len(), 1);
    }

    #[test]
    fn test_file_names() {
        assert_eq!(backup_file_name(date(2024, 5, 10)), "work-suite-backup-2024-05-10.json");
        assert_eq!(journal_day_file_name(date(2024, 5, 10)), "journal-2024-05-10.txt");
        assert_eq!(
            journal_period_file_name(date(2024, 5, 6), date(2024, 5, 12)),
            "journal-week-2024-05-06-2024-05-12.txt"
        );
    }

    #[test_context(ExportTestContext)]
    #[test]
    fn test_journal_day_text(ctx: &mut ExportTestContext) {
        seed(ctx);
        let journals = Journals::new(&ctx.db, &ctx.alice);
        let mut late = JournalEntry::new(date(2024, 5, 10), time(8, 0), "Inbox zero");
        late.category = Some("Admin".to_string());
        let id = journals.insert(&late).unwrap();
        journals.archive(id).unwrap();

        let text = Exporter::new(&ctx.db, &ctx.alice).journal_day(date(2024, 5, 10)).unwrap();
        assert!(text.starts_with("Work Journal - 2024-05-10\n"));
        assert!(text.contains("09:30 - General\n"));
        assert!(text.contains("Tags: planning, team\n"));
        // Archived entries are part of the summary, in time order.
        let admin = text.find("08:00 - Admin").unwrap();
        let planning = text.find("09:30 - General").unwrap();
        assert!(admin < planning);
    }

    #[test_context(ExportTestContext)]
    #[test]
    fn test_journal_period_groups_by_day(ctx: &mut ExportTestContext) {
        let journals = Journals::new(&ctx.db, &ctx.alice);
        journals.insert(&JournalEntry::new(date(2024, 5, 7), time(10, 0), "Tuesday work")).unwrap();
        journals.insert(&JournalEntry::new(date(2024, 5, 6), time(10, 0), "Monday work")).unwrap();
        journals.insert(&JournalEntry::new(date(2024, 5, 20), time(10, 0), "Out of range")).unwrap();

        let text = Exporter::new(&ctx.db, &ctx.alice)
            .journal_period(date(2024, 5, 6), date(2024, 5, 12))
            .unwrap();
        assert!(text.starts_with("Work Journal - 2024-05-06 to 2024-05-12\n"));
        let monday = text.find("\n2024-05-06\n").unwrap();
        let tuesday = text.find("\n2024-05-07\n").unwrap();
        assert!(monday < tuesday);
        assert!(!text.contains("Out of range"));
    }

    #[test_context(ExportTestContext)]
    #[test]
    fn test_journal_export_of_empty_range_fails(ctx: &mut ExportTestContext) {
        let err = Exporter::new(&ctx.db, &ctx.alice).journal_day(date(2024, 5, 10)).unwrap_err();
        assert!(err.to_string().contains("no journal entries"));
    }
}
