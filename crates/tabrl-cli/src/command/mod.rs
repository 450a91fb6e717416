use clap::{Parser, Subcommand};

use self::{bandit::BanditArg, self_play::SelfPlayArg};

mod bandit;
mod self_play;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Average learning curves of bandit agents over many runs
    Bandit(#[clap(flatten)] BanditArg),
    /// Let temporal-difference learners play tic-tac-toe against each other
    SelfPlay(#[clap(flatten)] SelfPlayArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Bandit(arg) => bandit::run(&arg)?,
        Mode::SelfPlay(arg) => self_play::run(&arg)?,
    }
    Ok(())
}
