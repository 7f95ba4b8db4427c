//! Subcommand implementations and shared setup.
pub mod package;
pub mod plan;
pub mod version;

use anyhow::Result;

use crate::cli::GlobalOpts;
use crate::config::validation::{ConfigValidator, SettingsValidator, WorkspaceValidator};
use crate::config::{Environment, Settings};
use crate::logging::Logger;
use crate::packaging::{PackageType, Packager};

/// Shared state produced by the common command setup sequence.
///
/// Encapsulates environment resolution, settings loading and validation so
/// that each command does not have to repeat the boilerplate.
#[derive(Debug)]
pub struct CommandSetup {
    /// Packager configured for the requested format.
    pub packager: Packager,
    /// Requested modules, duplicates removed, in request order.
    pub modules: Vec<String>,
}

impl CommandSetup {
    /// Resolve the environment, load settings, and validate the request.
    ///
    /// # Errors
    ///
    /// Returns an error if `WORKSPACE` or `BUILD_NUMBER` cannot be resolved
    /// or the settings file cannot be loaded.
    pub fn init(
        global: &GlobalOpts,
        package_type: PackageType,
        modules: &[String],
        log: &Logger,
    ) -> Result<Self> {
        log.stage("Resolving environment");
        let env = Environment::from_process(
            global.workspace.as_deref(),
            global.build_number.as_deref(),
        )?;
        log.info(&format!("workspace: {}", env.workspace.display()));
        log.info(&format!("version: {}", env.package_version()));

        log.stage("Loading settings");
        let settings_path = Settings::path(&env.workspace, global.config.as_deref());
        let settings = Settings::load(&env.workspace, global.config.as_deref())?;
        if settings_path.exists() {
            log.info(&format!("settings: {}", settings_path.display()));
        } else {
            log.debug("no settings file, using defaults");
        }
        log.debug(&format!("fpm: {}", settings.fpm));
        log.debug(&format!("package prefix: {}", settings.package_prefix));
        log.debug(&format!("install prefix: {}", settings.install_prefix));

        let modules = dedup(modules, log);

        let settings_validator = SettingsValidator::new(&settings);
        let workspace_validator = WorkspaceValidator::new(&env.workspace, &modules);
        let validators: [&dyn ConfigValidator; 2] = [&settings_validator, &workspace_validator];
        let warnings: Vec<_> = validators.iter().flat_map(|v| v.validate()).collect();
        if !warnings.is_empty() {
            log.warn(&format!(
                "found {} configuration warning(s):",
                warnings.len()
            ));
            for warning in &warnings {
                log.warn(&format!(
                    "  {} [{}]: {}",
                    warning.source, warning.item, warning.message
                ));
            }
        }

        Ok(Self {
            packager: Packager::new(package_type, env, settings),
            modules,
        })
    }
}

/// Remove repeated module names, keeping the first occurrence.
fn dedup(modules: &[String], log: &Logger) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(modules.len());
    for module in modules {
        if unique.contains(module) {
            log.warn(&format!("module '{module}' requested more than once"));
        } else {
            unique.push(module.clone());
        }
    }
    unique
}
