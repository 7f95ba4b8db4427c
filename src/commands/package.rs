//! Command: build packages for one or more modules.
use anyhow::Result;
use rayon::prelude::*;

use crate::cli::{GlobalOpts, PackageOpts};
use crate::error::{PackagerError, ToolError};
use crate::exec::{Executor, SystemExecutor, display_command};
use crate::logging::{BuildStatus, Logger};
use crate::packaging::{Packager, modulefile};

/// Run the package command.
///
/// # Errors
///
/// Returns an error if setup fails, fpm cannot be found, or any module fails to build.
pub fn run(global: &GlobalOpts, opts: &PackageOpts, log: &Logger) -> Result<()> {
    run_with(global, opts, &SystemExecutor, log)
}

/// Run the package command against an explicit [`Executor`].
///
/// Every module is attempted; failures are recorded in the summary and
/// reported together at the end.
///
/// # Errors
///
/// Returns an error if setup fails, fpm cannot be found, or any module fails to build.
pub fn run_with(
    global: &GlobalOpts,
    opts: &PackageOpts,
    exec: &dyn Executor,
    log: &Logger,
) -> Result<()> {
    let version = super::version::version();
    log.info(&format!("puppet-packager {version}"));

    let setup = super::CommandSetup::init(global, opts.package_type, &opts.modules, log)?;
    let packager = &setup.packager;

    if !global.dry_run {
        log.stage("Checking prerequisites");
        let program = &packager.settings().fpm;
        if !exec.which(program) {
            return Err(PackagerError::from(ToolError::NotFound {
                program: program.clone(),
            })
            .into());
        }
        log.info(&format!("found {program}"));
    }

    log.stage(&format!(
        "Packaging {} module(s) as {}",
        setup.modules.len(),
        packager.package_type()
    ));

    let build = |module: &String| package_module(packager, module, exec, log, global.dry_run);
    if global.parallel && setup.modules.len() > 1 {
        setup.modules.par_iter().for_each(build);
    } else {
        setup.modules.iter().for_each(build);
    }

    log.print_summary();

    let count = log.failure_count();
    if count > 0 {
        anyhow::bail!("{count} module(s) failed");
    }
    Ok(())
}

/// Build (or preview) one module and record the result.
fn package_module(
    packager: &Packager,
    module: &str,
    exec: &dyn Executor,
    log: &Logger,
    dry_run: bool,
) {
    let plan = match packager.plan(module) {
        Ok(plan) => plan,
        Err(e) => {
            log.error(&format!("{module}: {e}"));
            log.record_build(module, BuildStatus::Failed, Some(&e.to_string()));
            return;
        }
    };

    match modulefile::declared_version(&packager.base_directory().join(module)) {
        Ok(Some(declared)) => log.debug(&format!("{module}: Modulefile declares {declared}")),
        Ok(None) => {}
        Err(e) => log.warn(&format!("{module}: {e}")),
    }

    if dry_run {
        log.dry_run(&format!(
            "{module}: {}",
            display_command(&plan.program, &plan.arguments)
        ));
        log.dry_run(&format!(
            "{module}: would create {}",
            plan.destination_path().display()
        ));
        log.record_build(module, BuildStatus::DryRun, None);
        return;
    }

    match packager.build(module, exec, log) {
        Ok(outcome) => {
            log.info(&outcome.message());
            log.record_build(
                module,
                BuildStatus::Ok,
                Some(&outcome.plan.destination_file),
            );
        }
        Err(e) => {
            log.error(&format!("{module}: {e}"));
            log.record_build(module, BuildStatus::Failed, Some(&e.to_string()));
        }
    }
}
