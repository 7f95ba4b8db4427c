//! Packaging settings, optionally overridden by `packager.toml`.
//!
//! Every key is optional; the defaults reproduce the historical Cegeka
//! packaging conventions.
//!
//! ```toml
//! package_prefix = "cegeka-puppet-"
//! maintainer = "Cegeka <computing@cegeka.be>"
//! install_prefix = "/etc/puppet/modules"
//! url_template = "https://github.com/cegeka/puppet-{module}"
//! excludes = [".git", ".gitignore", "build", "Rakefile"]
//! fpm = "fpm"
//! ```
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::toml_loader::load_config;
use crate::error::ConfigError;

/// File name looked up at the workspace root when no `--config` is given.
pub const SETTINGS_FILE: &str = "packager.toml";

/// Placeholder replaced by the module name in templates.
pub const MODULE_PLACEHOLDER: &str = "{module}";

/// Packaging settings shared by every module in a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Prefix prepended to the module name to form the package name.
    pub package_prefix: String,
    /// Value passed to fpm's `-m` flag.
    pub maintainer: String,
    /// Install prefix on the target host.
    pub install_prefix: String,
    /// Project URL template.
    pub url_template: String,
    /// Package description template.
    pub description_template: String,
    /// Glob patterns excluded from the package.
    pub excludes: Vec<String>,
    /// Packaging program name or path.
    pub fpm: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            package_prefix: "cegeka-puppet-".to_string(),
            maintainer: "Cegeka <computing@cegeka.be>".to_string(),
            install_prefix: "/etc/puppet/modules".to_string(),
            url_template: "https://github.com/cegeka/puppet-{module}".to_string(),
            description_template:
                "Puppet module: {module} by Cegeka\nModule {module} description goes here."
                    .to_string(),
            excludes: [".git", ".gitignore", "build", "Rakefile"]
                .iter()
                .map(ToString::to_string)
                .collect(),
            fpm: "fpm".to_string(),
        }
    }
}

impl Settings {
    /// Load settings for `workspace`.
    ///
    /// An explicit path must exist. Without one, `<workspace>/packager.toml`
    /// is used if present and defaults otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(workspace: &Path, explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = Self::path(workspace, explicit);
        if explicit.is_some() && !path.exists() {
            return Err(ConfigError::Io {
                path: path.display().to_string(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            });
        }
        load_config(&path)
    }

    /// Path of the settings file that [`Settings::load`] reads.
    #[must_use]
    pub fn path(workspace: &Path, explicit: Option<&Path>) -> PathBuf {
        explicit.map_or_else(|| workspace.join(SETTINGS_FILE), Path::to_path_buf)
    }

    /// Package name for `module`.
    #[must_use]
    pub fn package_name(&self, module: &str) -> String {
        format!("{}{module}", self.package_prefix)
    }

    /// Project URL for `module`.
    #[must_use]
    pub fn url(&self, module: &str) -> String {
        render(&self.url_template, module)
    }

    /// Package description for `module`.
    #[must_use]
    pub fn description(&self, module: &str) -> String {
        render(&self.description_template, module)
    }
}

/// Substitute every [`MODULE_PLACEHOLDER`] in `template` with `module`.
#[must_use]
pub fn render(template: &str, module: &str) -> String {
    template.replace(MODULE_PLACEHOLDER, module)
}
