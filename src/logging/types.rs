//! Core logging types: build entries, status, and the [`Log`] trait.

/// Per-module build result for summary reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildEntry {
    /// Module name.
    pub module: String,
    /// Final status of the build.
    pub status: BuildStatus,
    /// Optional detail (artifact path or error description).
    pub message: Option<String>,
}

/// Status of a finished module build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStatus {
    /// The artifact was built and moved into place.
    Ok,
    /// Dry-run mode; nothing was built.
    DryRun,
    /// The build failed.
    Failed,
}

/// Abstraction over logging backends.
///
/// [`Logger`](super::logger::Logger) is the console/file implementation;
/// tests supply recording implementations.
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message (may be suppressed on console).
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log a dry-run action message.
    fn dry_run(&self, msg: &str);
    /// Record a module build result for the summary.
    fn record_build(&self, module: &str, status: BuildStatus, message: Option<&str>);
}
