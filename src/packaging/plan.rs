//! Per-module build plan: every name, path and argument derived up front.
use serde::Serialize;
use std::path::PathBuf;

use super::PackageType;
use crate::config::validation::validate_module_name;
use crate::config::{Environment, Settings};
use crate::error::ConfigError;

/// Release (iteration) number stamped on every package.
pub const RELEASE: &str = "1";

/// Everything needed to package one module, computed without side effects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildPlan {
    /// Module directory name inside the workspace.
    pub module: String,
    /// Package format.
    pub package_type: PackageType,
    /// Full package name, e.g. `cegeka-puppet-users`.
    pub package_name: String,
    /// Package version, e.g. `0.0.42`.
    pub package_version: String,
    /// Package release.
    pub release: String,
    /// Artifact file name fpm is expected to write.
    pub destination_file: String,
    /// Directory the artifact is moved into.
    pub destination_folder: PathBuf,
    /// Project URL embedded in the package metadata.
    pub url: String,
    /// Package description.
    pub description: String,
    /// Packaging program.
    pub program: String,
    /// Complete argument vector for the packaging program.
    pub arguments: Vec<String>,
}

impl BuildPlan {
    /// Derive the plan for `module`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidModuleName`] if `module` cannot name a
    /// workspace subdirectory.
    pub fn derive(
        package_type: PackageType,
        env: &Environment,
        settings: &Settings,
        module: &str,
    ) -> Result<Self, ConfigError> {
        validate_module_name(module)?;

        let package_name = settings.package_name(module);
        let package_version = env.package_version();
        let destination_file = format!(
            "{package_name}{}{package_version}-{RELEASE}{}{}.{package_type}",
            package_type.first_delimiter(),
            package_type.second_delimiter(),
            package_type.architecture(),
        );
        let destination_folder = env.workspace.join(module).join("target").join("dist");
        let url = settings.url(module);
        let description = settings.description(module);

        let mut arguments = static_arguments(package_type, settings);
        arguments.extend([
            "-n".to_string(),
            package_name.clone(),
            "-v".to_string(),
            package_version.clone(),
            "--iteration".to_string(),
            RELEASE.to_string(),
            "--url".to_string(),
            url.clone(),
            "--description".to_string(),
            description.clone(),
            "-C".to_string(),
            env.workspace.display().to_string(),
            module.to_string(),
        ]);

        Ok(Self {
            module: module.to_string(),
            package_type,
            package_name,
            package_version,
            release: RELEASE.to_string(),
            destination_file,
            destination_folder,
            url,
            description,
            program: settings.fpm.clone(),
            arguments,
        })
    }

    /// Final location of the artifact.
    #[must_use]
    pub fn destination_path(&self) -> PathBuf {
        self.destination_folder.join(&self.destination_file)
    }
}

/// Arguments shared by every module: format, source type, excludes,
/// architecture, maintainer and install prefix.
fn static_arguments(package_type: PackageType, settings: &Settings) -> Vec<String> {
    let mut args = vec![
        "-t".to_string(),
        package_type.to_string(),
        "-s".to_string(),
        "dir".to_string(),
    ];
    for pattern in &settings.excludes {
        args.push("-x".to_string());
        args.push(pattern.clone());
    }
    args.extend([
        "-a".to_string(),
        package_type.architecture().to_string(),
        "-m".to_string(),
        settings.maintainer.clone(),
        "--prefix".to_string(),
        settings.install_prefix.clone(),
    ]);
    args
}
