//! Command: show build plans without side effects.
use anyhow::Result;
use serde::Serialize;

use crate::cli::{GlobalOpts, PlanOpts};
use crate::exec::display_command;
use crate::logging::Logger;
use crate::packaging::{BuildPlan, modulefile};

/// A build plan together with the version the module's Modulefile declares.
#[derive(Debug, Serialize)]
pub struct PlanReport {
    /// Derived build plan.
    #[serde(flatten)]
    pub plan: BuildPlan,
    /// Version from the module's Modulefile, if any.
    pub declared_version: Option<String>,
}

/// Run the plan command.
///
/// # Errors
///
/// Returns an error if setup fails, a module name is invalid, or a
/// Modulefile cannot be read.
#[allow(clippy::print_stdout)]
pub fn run(global: &GlobalOpts, opts: &PlanOpts, log: &Logger) -> Result<()> {
    let reports = reports(global, opts, log)?;

    if opts.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    for report in &reports {
        let plan = &report.plan;
        log.stage(&plan.module);
        log.info(&format!("package:     {}", plan.package_name));
        log.info(&format!("version:     {}-{}", plan.package_version, plan.release));
        if let Some(declared) = &report.declared_version {
            log.info(&format!("modulefile:  {declared}"));
        }
        log.info(&format!("artifact:    {}", plan.destination_path().display()));
        log.info(&format!("url:         {}", plan.url));
        log.debug(&format!(
            "command:     {}",
            display_command(&plan.program, &plan.arguments)
        ));
    }
    Ok(())
}

/// Derive a [`PlanReport`] for every requested module.
///
/// # Errors
///
/// See [`run`].
pub fn reports(global: &GlobalOpts, opts: &PlanOpts, log: &Logger) -> Result<Vec<PlanReport>> {
    let setup = super::CommandSetup::init(global, opts.package_type, &opts.modules, log)?;
    let packager = &setup.packager;

    setup
        .modules
        .iter()
        .map(|module| -> Result<PlanReport> {
            let plan = packager.plan(module)?;
            let declared_version =
                modulefile::declared_version(&packager.base_directory().join(module))?;
            Ok(PlanReport {
                plan,
                declared_version,
            })
        })
        .collect()
}
