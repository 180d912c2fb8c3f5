use super::Context;
use crate::{
    db::migrations::MigrationManager,
    libs::{messages::Message, stats::StorageStats, view::View},
    msg_print,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct StatsArgs {
    /// Also list applied schema migrations.
    #[arg(long)]
    migrations: bool,
}

pub fn cmd(args: StatsArgs, ctx: &Context) -> Result<()> {
    let stats = StorageStats::collect(&ctx.db, &ctx.session)?;
    msg_print!(Message::StorageStatsHeader, true);
    View::storage(&stats)?;

    if args.migrations {
        let history = MigrationManager::new().get_migration_history(&ctx.db.conn)?;
        msg_print!(Message::MigrationHistoryHeader, true);
        View::migrations(&history)?;
    }
    Ok(())
}
