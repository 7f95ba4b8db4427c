//! Non-fatal configuration checks and module name validation.
use std::collections::HashSet;
use std::path::Path;

use super::settings::{MODULE_PLACEHOLDER, SETTINGS_FILE, Settings};
use crate::error::ConfigError;

/// A validation warning detected during configuration loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The configuration source (e.g., "packager.toml", "workspace").
    pub source: String,
    /// The specific key or module that triggered the warning.
    pub item: String,
    /// Human-readable warning message.
    pub message: String,
}

impl ValidationWarning {
    /// Create a warning from its three parts.
    #[must_use]
    pub fn new(
        source: impl Into<String>,
        item: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            item: item.into(),
            message: message.into(),
        }
    }
}

/// Trait for configuration validators.
///
/// Validators never fail; they report suspicious but usable configuration.
pub trait ConfigValidator {
    /// Validate the configuration and return any warnings found.
    fn validate(&self) -> Vec<ValidationWarning>;

    /// Return a human-readable name for this validator.
    fn name(&self) -> &'static str;
}

/// Validator for [`Settings`].
#[derive(Debug)]
pub struct SettingsValidator<'a> {
    settings: &'a Settings,
}

impl<'a> SettingsValidator<'a> {
    /// Validate `settings`.
    #[must_use]
    pub const fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }
}

impl ConfigValidator for SettingsValidator<'_> {
    fn validate(&self) -> Vec<ValidationWarning> {
        let s = self.settings;
        let mut warnings = Vec::new();
        let warn = |item: &str, message: &str| {
            ValidationWarning::new(SETTINGS_FILE, item, message)
        };

        for (key, template) in [
            ("url_template", &s.url_template),
            ("description_template", &s.description_template),
        ] {
            if !template.contains(MODULE_PLACEHOLDER) {
                warnings.push(warn(
                    key,
                    "template does not contain {module}; every package gets the same value",
                ));
            }
        }

        if s.package_prefix.is_empty() {
            warnings.push(warn("package_prefix", "empty prefix; package name equals module name"));
        }

        if s.maintainer.trim().is_empty() {
            warnings.push(warn("maintainer", "maintainer is empty"));
        }

        if !s.install_prefix.starts_with('/') {
            warnings.push(warn("install_prefix", "install prefix should be an absolute path"));
        }

        let mut seen = HashSet::new();
        for pattern in &s.excludes {
            if !seen.insert(pattern.as_str()) {
                warnings.push(warn("excludes", &format!("duplicate pattern '{pattern}'")));
            }
        }

        warnings
    }

    fn name(&self) -> &'static str {
        "settings"
    }
}

/// Validator that checks requested modules exist in the workspace.
#[derive(Debug)]
pub struct WorkspaceValidator<'a> {
    workspace: &'a Path,
    modules: &'a [String],
}

impl<'a> WorkspaceValidator<'a> {
    /// Validate that each of `modules` is a directory under `workspace`.
    #[must_use]
    pub const fn new(workspace: &'a Path, modules: &'a [String]) -> Self {
        Self { workspace, modules }
    }
}

impl ConfigValidator for WorkspaceValidator<'_> {
    fn validate(&self) -> Vec<ValidationWarning> {
        if !self.workspace.is_dir() {
            return vec![ValidationWarning::new(
                "workspace",
                self.workspace.display().to_string(),
                "workspace directory does not exist",
            )];
        }

        self.modules
            .iter()
            .filter(|m| validate_module_name(m).is_ok())
            .filter(|m| !self.workspace.join(m).is_dir())
            .map(|m| {
                ValidationWarning::new(
                    "workspace",
                    m.as_str(),
                    format!(
                        "module directory does not exist: {}",
                        self.workspace.join(m).display()
                    ),
                )
            })
            .collect()
    }

    fn name(&self) -> &'static str {
        "workspace"
    }
}

/// Check that `name` can identify a single module directory in the workspace.
///
/// Accepted: ASCII alphanumerics, `_`, `-` and `.`, not starting with `-`
/// (fpm would read it as a flag), and not `.` or `..`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidModuleName`] describing the first violation.
pub fn validate_module_name(name: &str) -> Result<(), ConfigError> {
    let reject = |reason: &str| {
        Err(ConfigError::InvalidModuleName {
            name: name.to_string(),
            reason: reason.to_string(),
        })
    };

    if name.is_empty() {
        return reject("must not be empty");
    }
    if name.contains(['/', '\\']) || name == "." || name == ".." {
        return reject("must be a single path component");
    }
    if name.starts_with('-') {
        return reject("must not start with '-'");
    }
    if let Some(c) = name
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.')))
    {
        return reject(&format!("contains invalid character {c:?}"));
    }
    Ok(())
}
