#![doc = include_str!("../README.md")]

pub mod cli;
pub mod command;
pub mod error;
pub mod fs;
pub mod manifest;
pub mod pipeline;
pub mod runner;
pub mod verify;

pub use error::*;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn run() -> Result<()> {
    use clap::Parser;
    use command::Command;

    let cli = cli::Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(cli.log_filter()))
        .format_timestamp(None)
        .init();
    log::debug!("pkgref-toggle {}", VERSION);

    match cli.command {
        Command::Toggle(args) => command::toggle::execute(args),
        Command::Run(args) => command::run::execute(args),
        Command::Restore(args) => command::restore::execute(args),
    }
}
