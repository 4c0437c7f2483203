use anyhow::Result;
use clap::Parser;
use flowreg_sync::cli::{Cli, Command};
use flowreg_sync::cmd;

fn main() -> Result<()> {
    let _ = tracing_subscriber::fmt::try_init();

    let cli = Cli::parse();
    match cli.command {
        Command::Export(args) => cmd::export::run(&args),
        Command::Import(args) => cmd::import::run(&args),
        Command::Copy(args) => cmd::copy::run(&args),
    }
}
