//! Reader for the legacy Puppet `Modulefile` metadata.
//!
//! Only the declared version is extracted. It is informational: package
//! versions always come from the build number.
use std::path::Path;

use crate::error::ConfigError;

/// Metadata file name inside a module directory.
pub const MODULEFILE: &str = "Modulefile";

/// Read the version declared in `<module_dir>/Modulefile`.
///
/// Returns `Ok(None)` if the file does not exist or declares no version.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file exists but cannot be read.
pub fn declared_version(module_dir: &Path) -> Result<Option<String>, ConfigError> {
    let path = module_dir.join(MODULEFILE);
    if !path.is_file() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(parse_version(&content))
}

/// Extract the version from Modulefile content.
///
/// The first line mentioning `version` decides: its second
/// whitespace-separated token, unquoted, is the version.
#[must_use]
pub fn parse_version(content: &str) -> Option<String> {
    let line = content.lines().find(|l| l.contains("version"))?;
    let token = line.split_whitespace().nth(1)?;
    let version: String = token.chars().filter(|c| !matches!(c, '\'' | '"')).collect();
    (!version.is_empty()).then_some(version)
}
