//! Puppet module packager.
//!
//! Builds `.deb` and `.rpm` packages from the modules of a Puppet workspace
//! by running `fpm` once per module, then moves each artifact to
//! `<workspace>/<module>/target/dist/`.
//!
//! The public API is organised into these layers:
//!
//! - **[`config`]**: resolve `WORKSPACE`/`BUILD_NUMBER`, load `packager.toml`, validate
//! - **[`packaging`]**: package type profiles, build plans, the [`Packager`](packaging::Packager)
//! - **[`exec`]**: subprocess execution behind the [`Executor`](exec::Executor) trait
//! - **[`commands`]**: top-level subcommand orchestration (`package`, `plan`, `version`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod packaging;
