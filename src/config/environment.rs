//! Resolution of the build environment (`WORKSPACE`, `BUILD_NUMBER`).
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Environment variable naming the workspace root.
pub const WORKSPACE_VAR: &str = "WORKSPACE";

/// Environment variable carrying the CI build number.
pub const BUILD_NUMBER_VAR: &str = "BUILD_NUMBER";

/// Version prefix; the build number is appended as the patch component.
const VERSION_PREFIX: &str = "0.0.";

/// Workspace root and build number for one packager run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Environment {
    /// Root directory holding one subdirectory per module.
    pub workspace: PathBuf,
    /// Build number, guaranteed non-empty ASCII digits.
    pub build_number: String,
}

impl Environment {
    /// Resolve from explicit overrides, falling back to the process environment.
    ///
    /// # Errors
    ///
    /// See [`Environment::resolve`].
    pub fn from_process(
        workspace: Option<&Path>,
        build_number: Option<&str>,
    ) -> Result<Self, ConfigError> {
        Self::resolve(workspace, build_number, |key| std::env::var(key).ok())
    }

    /// Resolve from explicit overrides, falling back to `lookup`.
    ///
    /// Empty values count as unset. `WORKSPACE` is checked before
    /// `BUILD_NUMBER`. A relative workspace is resolved against the current
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingVariable`] if either value is missing,
    /// [`ConfigError::InvalidBuildNumber`] if the build number is not
    /// purely numeric, or [`ConfigError::Workspace`] if the current
    /// directory is needed but unavailable.
    pub fn resolve(
        workspace: Option<&Path>,
        build_number: Option<&str>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let workspace = workspace
            .map(Path::to_path_buf)
            .or_else(|| lookup(WORKSPACE_VAR).map(PathBuf::from))
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or(ConfigError::MissingVariable(WORKSPACE_VAR))?;

        let build_number = build_number
            .map(str::to_string)
            .or_else(|| lookup(BUILD_NUMBER_VAR))
            .filter(|b| !b.is_empty())
            .ok_or(ConfigError::MissingVariable(BUILD_NUMBER_VAR))?;

        if !build_number.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ConfigError::InvalidBuildNumber(build_number));
        }

        // fpm runs in a temporary directory, so `-C` must not be relative.
        let workspace = std::path::absolute(&workspace)
            .map_err(|source| ConfigError::Workspace {
                path: workspace.clone(),
                source,
            })?;

        Ok(Self {
            workspace,
            build_number,
        })
    }

    /// Package version derived from the build number, e.g. `0.0.42`.
    #[must_use]
    pub fn package_version(&self) -> String {
        format!("{VERSION_PREFIX}{}", self.build_number)
    }
}
