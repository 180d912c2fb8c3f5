use crate::{
    libs::{config::Config, messages::Message},
    msg_print, msg_success,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Print the current configuration instead of editing it.
    #[arg(short, long)]
    show: bool,

    /// Overwrite the configuration with defaults.
    #[arg(long)]
    reset: bool,
}

pub fn cmd(init_args: InitArgs) -> Result<()> {
    if init_args.show {
        msg_print!(serde_json::to_string_pretty(&Config::read()?)?);
        return Ok(());
    }

    if init_args.reset {
        Config::default().save()?;
        msg_success!(Message::ConfigReset);
        return Ok(());
    }

    Config::init()?.save()?;
    msg_success!(Message::ConfigSaved);
    Ok(())
}
