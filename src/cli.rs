//! Command-line interface definition.
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::packaging::PackageType;

/// Top-level CLI entry point for the Puppet module packager.
#[derive(Parser, Debug)]
#[command(
    name = "puppet-packager",
    about = "Build deb and rpm packages from Puppet module workspaces using fpm",
    version
)]
pub struct Cli {
    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Options shared across all subcommands.
    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone)]
pub struct GlobalOpts {
    /// Workspace root (overrides the WORKSPACE environment variable)
    #[arg(long, global = true)]
    pub workspace: Option<PathBuf>,

    /// Build number (overrides the BUILD_NUMBER environment variable)
    #[arg(long, global = true)]
    pub build_number: Option<String>,

    /// Settings file (defaults to packager.toml in the workspace)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Preview changes without building
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,

    /// Build modules one at a time (modules are built in parallel by default)
    #[arg(long = "no-parallel", global = true, action = clap::ArgAction::SetFalse)]
    pub parallel: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build packages for one or more modules
    Package(PackageOpts),
    /// Show the names, paths and fpm arguments a build would use
    Plan(PlanOpts),
    /// Print version information
    Version,
}

impl Command {
    /// Name used for the log file of this command.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Package(_) => "package",
            Self::Plan(_) => "plan",
            Self::Version => "version",
        }
    }

    /// Whether stdout must carry machine-readable output only.
    #[must_use]
    pub const fn is_machine_readable(&self) -> bool {
        matches!(self, Self::Plan(PlanOpts { json: true, .. }))
    }
}

/// Options for the `package` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct PackageOpts {
    /// Package format
    #[arg(short = 't', long = "type", value_enum)]
    pub package_type: PackageType,

    /// Modules (workspace subdirectories) to package
    #[arg(required = true)]
    pub modules: Vec<String>,
}

/// Options for the `plan` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct PlanOpts {
    /// Package format
    #[arg(short = 't', long = "type", value_enum)]
    pub package_type: PackageType,

    /// Print plans as JSON
    #[arg(long)]
    pub json: bool,

    /// Modules (workspace subdirectories) to plan
    #[arg(required = true)]
    pub modules: Vec<String>,
}
