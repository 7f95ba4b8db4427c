//! Domain-specific error types for the packager.
//!
//! This module provides a structured error hierarchy using [`thiserror`].
//! Library modules return typed errors (e.g., [`ConfigError`], [`ToolError`])
//! while command handlers at the CLI boundary convert them to [`anyhow::Error`]
//! via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! PackagerError
//! ├── Config(ConfigError)    : environment, settings file, package type, module name
//! ├── Tool(ToolError)        : the external packaging program
//! └── Filesystem(FsError)    : temp dir, destination folder, artifact move
//! ```
//!
//! Nothing here is retried: every error aborts the build of the module it
//! belongs to.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for a packaging operation.
#[derive(Error, Debug)]
pub enum PackagerError {
    /// Configuration-related error (environment, settings, invalid input).
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The external packaging program failed or misbehaved.
    #[error("External tool error: {0}")]
    Tool(#[from] ToolError),

    /// A filesystem operation failed.
    #[error("Filesystem error: {0}")]
    Filesystem(#[from] FsError),
}

/// Errors that arise while resolving the build configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required environment variable is unset or empty.
    #[error("Environment variable {0} has not been set.")]
    MissingVariable(&'static str),

    /// `BUILD_NUMBER` is set but cannot be part of a package version.
    #[error("Invalid build number '{0}': must contain only ASCII digits")]
    InvalidBuildNumber(String),

    /// The workspace path cannot be made absolute.
    #[error("Cannot resolve workspace {}: {source}", .path.display())]
    Workspace {
        /// Workspace path as given.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The package type selector is not one of the supported formats.
    #[error("Invalid package type '{0}': must be one of rpm, deb")]
    InvalidPackageType(String),

    /// The module name cannot identify a workspace subdirectory.
    #[error("Invalid module name '{name}': {reason}")]
    InvalidModuleName {
        /// The rejected module name.
        name: String,
        /// Why the name was rejected.
        reason: String,
    },

    /// The settings file contains a syntax or schema error.
    #[error("Invalid TOML syntax in {file}: {message}")]
    InvalidSyntax {
        /// Path of the settings file.
        file: String,
        /// Parser message.
        message: String,
    },

    /// An I/O error occurred while reading a config file.
    #[error("IO error reading config file {path}: {source}")]
    Io {
        /// Path to the file that could not be read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Errors that arise from invoking the external packaging program.
#[derive(Error, Debug)]
pub enum ToolError {
    /// The program could not be located on `PATH`.
    #[error("'{program}' not found on PATH")]
    NotFound {
        /// Program name or path that was looked up.
        program: String,
    },

    /// The program could not be spawned.
    #[error("'{program}' could not be run for module '{module}': {reason}")]
    Spawn {
        /// Program that was invoked.
        program: String,
        /// Module being packaged.
        module: String,
        /// Spawn error, with its context chain.
        reason: String,
    },

    /// The program exited unsuccessfully.
    #[error(
        "'{program}' failed for module '{module}' ({}): {}",
        .code.map_or_else(|| "terminated by signal".to_string(), |c| format!("exit {c}")),
        .stderr.trim()
    )]
    Failed {
        /// Program that was invoked.
        program: String,
        /// Module being packaged.
        module: String,
        /// Exit code, or `None` if the process was killed by a signal.
        code: Option<i32>,
        /// Captured standard error.
        stderr: String,
    },

    /// The program exited successfully but the expected artifact is absent.
    #[error("expected artifact {} was not produced", .path.display())]
    MissingArtifact {
        /// Where the artifact should have been written.
        path: PathBuf,
    },
}

/// Errors that arise from filesystem operations around a build.
#[derive(Error, Debug)]
pub enum FsError {
    /// The temporary working directory could not be created.
    #[error("failed to create temporary build directory: {source}")]
    TempDir {
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A destination directory could not be created.
    #[error("failed to create directory {}: {source}", .path.display())]
    CreateDir {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The artifact could not be moved into place.
    #[error("failed to move {} to {}: {source}", .from.display(), .to.display())]
    Move {
        /// Source path.
        from: PathBuf,
        /// Destination path.
        to: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The temporary working directory could not be removed.
    #[error("failed to remove temporary build directory {}: {source}", .path.display())]
    Cleanup {
        /// Directory that could not be removed.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}
