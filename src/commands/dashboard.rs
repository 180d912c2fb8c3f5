use super::Context;
use crate::{
    libs::{dashboard::Dashboard, messages::Message, view::View},
    msg_print,
};
use anyhow::Result;

pub fn cmd(ctx: &Context) -> Result<()> {
    let dashboard = Dashboard::load(&ctx.db, &ctx.session, ctx.today, &ctx.config.dashboard)?;

    let name = ctx
        .config
        .user
        .as_ref()
        .and_then(|user| user.name.clone())
        .unwrap_or_else(|| ctx.session.user_id().to_string());
    msg_print!(Message::DashboardHeader(name, ctx.today.to_string()), true);
    View::dashboard(&dashboard)
}
