//! Package naming profiles and the build procedure around fpm.
pub mod modulefile;
pub mod packager;
pub mod plan;

pub use packager::{BuildOutcome, Packager};
pub use plan::BuildPlan;

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Supported package formats.
///
/// The format fixes the file naming convention: the delimiter between
/// name and version, the delimiter before the architecture tag, and the
/// architecture tag itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PackageType {
    /// Red Hat package: `name-version-release.noarch.rpm`.
    Rpm,
    /// Debian package: `name_version-release_all.deb`.
    Deb,
}

impl PackageType {
    /// Selector and file extension (`rpm` or `deb`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rpm => "rpm",
            Self::Deb => "deb",
        }
    }

    /// Delimiter between package name and version.
    #[must_use]
    pub const fn first_delimiter(self) -> &'static str {
        match self {
            Self::Rpm => "-",
            Self::Deb => "_",
        }
    }

    /// Delimiter between release and architecture.
    #[must_use]
    pub const fn second_delimiter(self) -> &'static str {
        match self {
            Self::Rpm => ".",
            Self::Deb => "_",
        }
    }

    /// Architecture-independent tag understood by the format.
    #[must_use]
    pub const fn architecture(self) -> &'static str {
        match self {
            Self::Rpm => "noarch",
            Self::Deb => "all",
        }
    }
}

impl fmt::Display for PackageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PackageType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rpm" => Ok(Self::Rpm),
            "deb" => Ok(Self::Deb),
            other => Err(ConfigError::InvalidPackageType(other.to_string())),
        }
    }
}
