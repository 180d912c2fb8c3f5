#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};
    use worksuite::db::activity::{Activity, ActivityAction, EntityType};
    use worksuite::db::db::Db;
    use worksuite::db::journals::{JournalEntry, Journals};
    use worksuite::db::knowledge::{Knowledge, KnowledgeItem};
    use worksuite::db::meetings::{Meeting, Meetings};
    use worksuite::db::todos::Todos;
    use worksuite::libs::config::DashboardConfig;
    use worksuite::libs::dashboard::Dashboard;
    use worksuite::libs::session::Session;
    use worksuite::libs::stats::{is_overdue, month_bounds, urgent_tasks, week_bounds, DashboardStats, StorageStats, WeekStart};
    use worksuite::libs::task::{Status, Task};

    struct StatsTestContext {
        _temp_dir: TempDir,
        db: Db,
        session: Session,
    }

    impl TestContext for StatsTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db = Db::open(temp_dir.path().join("worksuite.db")).unwrap();
            StatsTestContext {
                _temp_dir: temp_dir,
                db,
                session: Session::new("alice").unwrap(),
            }
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn done_on(title: &str, day: NaiveDate) -> Task {
        let mut task = Task::new(title);
        task.status = Status::Done;
        task.updated_at = Some(day.and_hms_opt(12, 0, 0).unwrap());
        task
    }

    fn due(title: &str, day: NaiveDate) -> Task {
        let mut task = Task::new(title);
        task.due_date = Some(day);
        task
    }

    #[test]
    fn test_week_bounds_respect_week_start() {
        // 2024-05-10 is a Friday.
        let friday = date(2024, 5, 10);
        assert_eq!(week_bounds(friday, WeekStart::Monday), (date(2024, 5, 6), date(2024, 5, 12)));
        assert_eq!(week_bounds(friday, WeekStart::Sunday), (date(2024, 5, 5), date(2024, 5, 11)));

        let sunday = date(2024, 5, 12);
        assert_eq!(week_bounds(sunday, WeekStart::Monday), (date(2024, 5, 6), date(2024, 5, 12)));
        assert_eq!(week_bounds(sunday, WeekStart::Sunday), (date(2024, 5, 12), date(2024, 5, 18)));
    }

    #[test]
    fn test_month_bounds() {
        assert_eq!(month_bounds(date(2024, 2, 14)), (date(2024, 2, 1), date(2024, 2, 29)));
        assert_eq!(month_bounds(date(2024, 12, 31)), (date(2024, 12, 1), date(2024, 12, 31)));
    }

    #[test]
    fn test_due_today_is_not_overdue() {
        let today = date(2024, 5, 10);
        assert!(!is_overdue(&due("today", today), today));
        assert!(is_overdue(&due("yesterday", date(2024, 5, 9)), today));

        let mut finished = due("finished late", date(2024, 5, 1));
        finished.status = Status::Done;
        assert!(!is_overdue(&finished, today));
    }

    #[test]
    fn test_dashboard_counters() {
        let today = date(2024, 5, 10);
        let mut starting = Task::new("starting");
        starting.start_date = Some(today);
        let tasks = vec![
            due("overdue", date(2024, 5, 8)),
            due("due today", today),
            starting,
            Task::new("undated"),
            done_on("done this week", date(2024, 5, 7)),
            done_on("done last week", date(2024, 5, 2)),
            done_on("done last month", date(2024, 4, 30)),
        ];

        let stats = DashboardStats::compute(&tasks, today, WeekStart::Monday);
        assert_eq!(stats.open, 4);
        assert_eq!(stats.overdue, 1);
        assert_eq!(stats.due_today, 1);
        assert_eq!(stats.starting_today, 1);
        assert_eq!(stats.completed_week, 1);
        assert_eq!(stats.completed_month, 2);
    }

    #[test]
    fn test_urgent_tasks_order_and_limit() {
        let today = date(2024, 5, 10);
        let mut both = due("due and starting today", today);
        both.start_date = Some(today);
        let mut starting = Task::new("starting");
        starting.start_date = Some(today);
        let tasks = vec![starting, both, due("overdue", date(2024, 5, 1)), Task::new("someday")];

        let urgent: Vec<&str> = urgent_tasks(&tasks, today, 10).iter().map(|t| t.title.as_str()).collect();
        assert_eq!(urgent, vec!["overdue", "due and starting today", "starting"]);

        assert_eq!(urgent_tasks(&tasks, today, 2).len(), 2);
    }

    #[test_context(StatsTestContext)]
    #[test]
    fn test_storage_stats(ctx: &mut StatsTestContext) {
        let todos = Todos::new(&ctx.db, &ctx.session);
        let archived = todos.insert(&Task::new("old")).unwrap();
        todos.archive(archived).unwrap();
        todos.insert(&Task::new("current")).unwrap();

        let day = date(2024, 5, 10);
        let at = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        Journals::new(&ctx.db, &ctx.session).insert(&JournalEntry::new(day, at, "notes")).unwrap();
        Meetings::new(&ctx.db, &ctx.session).save(&Meeting::new(day, at, "sync")).unwrap();
        Knowledge::new(&ctx.db, &ctx.session).insert(&KnowledgeItem::new("howto")).unwrap();

        let stats = StorageStats::collect(&ctx.db, &ctx.session).unwrap();
        assert_eq!(stats.todos_active, 1);
        assert_eq!(stats.todos_archived, 1);
        assert_eq!(stats.journals_active, 1);
        assert_eq!(stats.meetings_active, 1);
        assert_eq!(stats.knowledge, 1);
        assert_eq!(stats.total(), 5);
    }

    #[test_context(StatsTestContext)]
    #[test]
    fn test_dashboard_load(ctx: &mut StatsTestContext) {
        let today = date(2024, 5, 10);
        let todos = Todos::new(&ctx.db, &ctx.session);
        todos.insert(&due("overdue", date(2024, 5, 1))).unwrap();
        let hidden = todos.insert(&due("archived overdue", date(2024, 5, 1))).unwrap();
        todos.archive(hidden).unwrap();

        let at = NaiveTime::from_hms_opt(9, 0, 0).unwrap();
        let meetings = Meetings::new(&ctx.db, &ctx.session);
        meetings.save(&Meeting::new(date(2024, 5, 9), at, "yesterday")).unwrap();
        meetings.save(&Meeting::new(date(2024, 5, 12), at, "sunday")).unwrap();
        meetings.save(&Meeting::new(today, at, "today")).unwrap();

        let journals = Journals::new(&ctx.db, &ctx.session);
        journals.insert(&JournalEntry::new(date(2024, 5, 9), at, "older")).unwrap();
        journals.insert(&JournalEntry::new(today, at, "newest")).unwrap();

        let activity = Activity::new(&ctx.db, &ctx.session);
        activity.record(ActivityAction::Create, EntityType::Todo, "overdue").unwrap();
        activity.record(ActivityAction::Archive, EntityType::Todo, "archived overdue").unwrap();

        let dashboard = Dashboard::load(&ctx.db, &ctx.session, today, &DashboardConfig::default()).unwrap();
        assert_eq!(dashboard.stats.open, 1);
        assert_eq!(dashboard.stats.overdue, 1);
        assert_eq!(dashboard.urgent.len(), 1);

        let subjects: Vec<&str> = dashboard.upcoming_meetings.iter().map(|m| m.subject.as_str()).collect();
        assert_eq!(subjects, vec!["today", "sunday"]);

        assert_eq!(dashboard.latest_journal.unwrap().description, "newest");

        assert_eq!(dashboard.recent_activity.len(), 2);
        assert_eq!(dashboard.recent_activity[0].action, ActivityAction::Archive);
    }

    #[test_context(StatsTestContext)]
    #[test]
    fn test_dashboard_ignores_subtasks(ctx: &mut StatsTestContext) {
        let today = date(2024, 5, 10);
        let todos = Todos::new(&ctx.db, &ctx.session);
        let parent = todos.insert(&due("migrate billing", date(2024, 5, 1))).unwrap();
        let mut child = due("export invoices", date(2024, 5, 2));
        child.parent_id = Some(parent);
        todos.insert(&child).unwrap();

        let dashboard = Dashboard::load(&ctx.db, &ctx.session, today, &DashboardConfig::default()).unwrap();
        assert_eq!(dashboard.stats.open, 1);
        assert_eq!(dashboard.stats.overdue, 1);
        assert_eq!(dashboard.urgent.len(), 1);
        assert_eq!(dashboard.urgent[0].title, "migrate billing");
    }

    #[test_context(StatsTestContext)]
    #[test]
    fn test_activity_is_per_user(ctx: &mut StatsTestContext) {
        Activity::new(&ctx.db, &ctx.session)
            .record(ActivityAction::Create, EntityType::Knowledge, "notes")
            .unwrap();

        let bob = Session::new("bob").unwrap();
        assert!(Activity::new(&ctx.db, &bob).recent(10).unwrap().is_empty());
        assert_eq!(Activity::new(&ctx.db, &ctx.session).recent(10).unwrap().len(), 1);
    }
}
