#[cfg(test)]
mod tests {
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};
    use worksuite::db::db::Db;
    use worksuite::db::migrations::{get_db_version, init_with_migrations, needs_migration, MigrationManager};

    struct MigrationTestContext {
        temp_dir: TempDir,
    }

    impl TestContext for MigrationTestContext {
        fn setup() -> Self {
            MigrationTestContext {
                temp_dir: tempfile::tempdir().unwrap(),
            }
        }
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_fresh_database_needs_migration(ctx: &mut MigrationTestContext) {
        let conn = Db::open_without_migrations(ctx.temp_dir.path().join("worksuite.db")).unwrap();
        assert_eq!(get_db_version(&conn).unwrap(), 0);
        assert!(needs_migration(&conn).unwrap());
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_migrations_reach_latest_version(ctx: &mut MigrationTestContext) {
        let mut conn = Db::open_without_migrations(ctx.temp_dir.path().join("worksuite.db")).unwrap();
        init_with_migrations(&mut conn).unwrap();

        assert_eq!(get_db_version(&conn).unwrap(), 5);
        assert!(!needs_migration(&conn).unwrap());

        let manager = MigrationManager::new();
        let history = manager.get_migration_history(&conn).unwrap();
        let versions: Vec<u32> = history.iter().map(|(version, _, _)| *version).collect();
        assert_eq!(versions, vec![1, 2, 3, 4, 5]);
        assert_eq!(history[0].1, "create_todos");
        assert!(manager.is_migration_applied(&conn, 3).unwrap());
        assert!(!manager.is_migration_applied(&conn, 6).unwrap());
    }

    #[test_context(MigrationTestContext)]
    #[test]
    fn test_migrations_are_idempotent(ctx: &mut MigrationTestContext) {
        let path = ctx.temp_dir.path().join("worksuite.db");
        drop(Db::open(&path).unwrap());
        let db = Db::open(&path).unwrap();

        let history = MigrationManager::new().get_migration_history(&db.conn).unwrap();
        assert_eq!(history.len(), 5);
    }

    #[test]
    fn test_schema_has_every_table() {
        let db = Db::in_memory().unwrap();
        for table in [
            "todos",
            "todo_comments",
            "journals",
            "categories",
            "meetings",
            "meeting_actions",
            "knowledge",
            "activity_log",
        ] {
            let found: i64 = db
                .conn
                .query_row("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1", [table], |row| row.get(0))
                .unwrap();
            assert_eq!(found, 1, "missing table {}", table);
        }
    }
}
