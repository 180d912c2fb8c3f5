#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};
    use worksuite::db::categories::{Categories, CategoryKind};
    use worksuite::db::db::Db;
    use worksuite::db::journals::{JournalEntry, Journals};
    use worksuite::db::todos::Todos;
    use worksuite::libs::error::StoreError;
    use worksuite::libs::session::Session;
    use worksuite::libs::task::Task;

    struct JournalTestContext {
        _temp_dir: TempDir,
        db: Db,
        session: Session,
    }

    impl TestContext for JournalTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db = Db::open(temp_dir.path().join("worksuite.db")).unwrap();
            JournalTestContext {
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

    #[test_context(JournalTestContext)]
    #[test]
    fn test_insert_with_tags_and_category(ctx: &mut JournalTestContext) {
        let journals = Journals::new(&ctx.db, &ctx.session);
        let mut entry = JournalEntry::new(date(2024, 5, 10), time(9, 30), "  Sprint planning  ");
        entry.category = Some("Meetings".to_string());
        entry.tags = vec!["planning".to_string(), "team".to_string()];

        let id = journals.insert(&entry).unwrap();
        let stored = journals.get(id).unwrap();
        assert_eq!(stored.description, "Sprint planning");
        assert_eq!(stored.time, time(9, 30));
        assert_eq!(stored.tags, vec!["planning", "team"]);
        assert_eq!(stored.user_id, "alice");

        let categories = Categories::new(&ctx.db, &ctx.session).list(CategoryKind::Journal).unwrap();
        assert_eq!(categories, vec!["Meetings".to_string()]);
        assert!(Categories::new(&ctx.db, &ctx.session).list(CategoryKind::Knowledge).unwrap().is_empty());
    }

    #[test_context(JournalTestContext)]
    #[test]
    fn test_empty_description_is_rejected(ctx: &mut JournalTestContext) {
        let err = Journals::new(&ctx.db, &ctx.session)
            .insert(&JournalEntry::new(date(2024, 5, 10), time(9, 0), " "))
            .unwrap_err();
        assert!(matches!(err.downcast_ref::<StoreError>(), Some(StoreError::Invalid(_))));
    }

    #[test_context(JournalTestContext)]
    #[test]
    fn test_link_to_todo_must_be_owned(ctx: &mut JournalTestContext) {
        let bob = Session::new("bob").unwrap();
        let foreign = Todos::new(&ctx.db, &bob).insert(&Task::new("Bob's task")).unwrap();
        let own = Todos::new(&ctx.db, &ctx.session).insert(&Task::new("My task")).unwrap();
        let journals = Journals::new(&ctx.db, &ctx.session);

        let mut entry = JournalEntry::new(date(2024, 5, 10), time(10, 0), "Worked on it");
        entry.linked_todo_id = Some(foreign);
        assert!(journals.insert(&entry).is_err());

        entry.linked_todo_id = Some(own);
        let id = journals.insert(&entry).unwrap();
        assert_eq!(journals.get(id).unwrap().linked_todo_id, Some(own));
    }

    #[test_context(JournalTestContext)]
    #[test]
    fn test_deleting_linked_todo_clears_link(ctx: &mut JournalTestContext) {
        let todos = Todos::new(&ctx.db, &ctx.session);
        let todo = todos.insert(&Task::new("Temporary")).unwrap();
        let journals = Journals::new(&ctx.db, &ctx.session);
        let mut entry = JournalEntry::new(date(2024, 5, 10), time(10, 0), "Note");
        entry.linked_todo_id = Some(todo);
        let id = journals.insert(&entry).unwrap();

        todos.delete(todo).unwrap();
        assert_eq!(journals.get(id).unwrap().linked_todo_id, None);
    }

    #[test_context(JournalTestContext)]
    #[test]
    fn test_list_orders_and_ranges(ctx: &mut JournalTestContext) {
        let journals = Journals::new(&ctx.db, &ctx.session);
        journals.insert(&JournalEntry::new(date(2024, 5, 9), time(16, 0), "thursday late")).unwrap();
        journals.insert(&JournalEntry::new(date(2024, 5, 10), time(8, 0), "friday early")).unwrap();
        journals.insert(&JournalEntry::new(date(2024, 5, 10), time(17, 0), "friday late")).unwrap();
        journals.insert(&JournalEntry::new(date(2024, 5, 13), time(9, 0), "monday")).unwrap();

        let newest_first: Vec<String> = journals.list_active().unwrap().into_iter().map(|e| e.description).collect();
        assert_eq!(newest_first, vec!["monday", "friday late", "friday early", "thursday late"]);

        let friday: Vec<String> = journals.on_date(date(2024, 5, 10)).unwrap().into_iter().map(|e| e.description).collect();
        assert_eq!(friday, vec!["friday early", "friday late"]);

        let week = journals.between(date(2024, 5, 9), date(2024, 5, 10)).unwrap();
        assert_eq!(week.len(), 3);
        assert_eq!(week[0].description, "thursday late");

        assert_eq!(journals.latest().unwrap().unwrap().description, "monday");
    }

    #[test_context(JournalTestContext)]
    #[test]
    fn test_update_archive_and_delete(ctx: &mut JournalTestContext) {
        let journals = Journals::new(&ctx.db, &ctx.session);
        let id = journals.insert(&JournalEntry::new(date(2024, 5, 10), time(9, 0), "draft")).unwrap();

        let mut entry = journals.get(id).unwrap();
        entry.description = "final".to_string();
        entry.category = Some("Writing".to_string());
        journals.update(&entry).unwrap();
        assert_eq!(journals.get(id).unwrap().description, "final");

        journals.archive(id).unwrap();
        assert!(journals.list_active().unwrap().is_empty());
        assert_eq!(journals.count(true).unwrap(), 1);

        journals.restore(id).unwrap();
        assert_eq!(journals.count(false).unwrap(), 1);

        journals.delete(id).unwrap();
        assert!(journals.get(id).is_err());
    }

    #[test_context(JournalTestContext)]
    #[test]
    fn test_other_user_cannot_touch_entry(ctx: &mut JournalTestContext) {
        let id = Journals::new(&ctx.db, &ctx.session)
            .insert(&JournalEntry::new(date(2024, 5, 10), time(9, 0), "mine"))
            .unwrap();
        let bob = Session::new("bob").unwrap();
        let as_bob = Journals::new(&ctx.db, &bob);

        let err = as_bob.delete(id).unwrap_err();
        assert!(matches!(err.downcast_ref::<StoreError>(), Some(StoreError::Forbidden { .. })));
        assert!(as_bob.list_active().unwrap().is_empty());
    }

    #[test_context(JournalTestContext)]
    #[test]
    fn test_failed_write_leaves_no_category(ctx: &mut JournalTestContext) {
        let journals = Journals::new(&ctx.db, &ctx.session);
        let id = journals.insert(&JournalEntry::new(date(2024, 5, 10), time(9, 0), "plain")).unwrap();
        ctx.db
            .conn
            .execute_batch(
                "CREATE TRIGGER block_journal_insert BEFORE INSERT ON journals BEGIN SELECT RAISE(ABORT, 'blocked'); END;
                 CREATE TRIGGER block_journal_update BEFORE UPDATE ON journals BEGIN SELECT RAISE(ABORT, 'blocked'); END;",
            )
            .unwrap();

        let mut entry = JournalEntry::new(date(2024, 5, 10), time(10, 0), "blocked");
        entry.category = Some("Ops".to_string());
        assert!(journals.insert(&entry).is_err());

        let mut existing = journals.get(id).unwrap();
        existing.category = Some("Support".to_string());
        assert!(journals.update(&existing).is_err());

        assert!(Categories::new(&ctx.db, &ctx.session).list(CategoryKind::Journal).unwrap().is_empty());
    }
}
