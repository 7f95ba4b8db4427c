//! `puppet-packager` binary entry point.
use anyhow::Result;
use clap::Parser;

use puppet_packager::{cli, commands, logging};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();
    let command = args.command.name();
    logging::init_subscriber(args.verbose, args.command.is_machine_readable(), command);
    let log = logging::Logger::new(command);

    match args.command {
        cli::Command::Package(opts) => commands::package::run(&args.global, &opts, &log),
        cli::Command::Plan(opts) => commands::plan::run(&args.global, &opts, &log),
        cli::Command::Version => {
            commands::version::run();
            Ok(())
        }
    }
}
