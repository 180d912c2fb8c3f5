use super::Context;
use crate::{
    libs::{export::Backup, import::Importer, messages::Message},
    msg_success,
};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Backup file written by `ws export backup`.
    file: PathBuf,
}

pub fn cmd(args: ImportArgs, ctx: &Context) -> Result<()> {
    let backup = Backup::read(&args.file)?;

    if !ctx.confirm(Message::ConfirmImport(args.file.display().to_string()))? {
        return Ok(());
    }

    let report = Importer::new(&ctx.db, &ctx.session).import(&backup)?;
    msg_success!(Message::ImportCompleted(report));
    Ok(())
}
