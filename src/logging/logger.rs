//! Structured logger with dry-run awareness and summary collection.
use std::path::PathBuf;
use std::sync::Mutex;

use super::subscriber::{DRY_RUN_TARGET, STAGE_TARGET};
use super::types::{BuildEntry, BuildStatus, Log};
use super::utils::log_file_path;

/// Implement the display methods of [`Log`] by delegating to inherent methods
/// of the same name on the implementing type.
macro_rules! forward_log_methods {
    ($($method:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.$method(msg);
            }
        )+
    };
}

/// Structured logger with dry-run awareness and summary collection.
///
/// Console and file output both go through [`tracing`]; the subscriber
/// installed by [`init_subscriber`](super::subscriber::init_subscriber)
/// decides where each event lands. The logger itself only remembers the
/// log file path for the summary and the per-module results.
#[derive(Debug)]
pub struct Logger {
    builds: Mutex<Vec<BuildEntry>>,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create a logger for `command`, pointing the summary at its log file.
    #[must_use]
    pub fn new(command: &str) -> Self {
        Self::with_log_file(log_file_path(command))
    }

    /// Create a logger with an explicit (or no) log file path.
    #[must_use]
    pub const fn with_log_file(log_file: Option<PathBuf>) -> Self {
        Self {
            builds: Mutex::new(Vec::new()),
            log_file,
        }
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (suppressed on console unless verbose).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log a dry-run action message.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: DRY_RUN_TARGET, "{msg}");
    }

    /// Record a module build result for the summary.
    pub fn record_build(&self, module: &str, status: BuildStatus, message: Option<&str>) {
        if let Ok(mut guard) = self.builds.lock() {
            guard.push(BuildEntry {
                module: module.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }

    /// Return a copy of every recorded build, in recording order.
    #[must_use]
    pub fn entries(&self) -> Vec<BuildEntry> {
        self.builds.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Count the number of failed builds.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.builds.lock().map_or(0, |guard| {
            guard
                .iter()
                .filter(|b| b.status == BuildStatus::Failed)
                .count()
        })
    }

    /// Print the summary of all recorded builds.
    #[allow(clippy::print_stdout)]
    pub fn print_summary(&self) {
        let mut builds = self.entries();
        if builds.is_empty() {
            return;
        }
        builds.sort_by(|a, b| a.module.cmp(&b.module));

        println!();
        self.stage("Summary");

        let mut ok = 0u32;
        let mut dry_run = 0u32;
        let mut failed = 0u32;

        for build in &builds {
            let (icon, color) = match build.status {
                BuildStatus::Ok => {
                    ok += 1;
                    ("✓", "\x1b[32m")
                }
                BuildStatus::DryRun => {
                    dry_run += 1;
                    ("~", "\x1b[37m")
                }
                BuildStatus::Failed => {
                    failed += 1;
                    ("✗", "\x1b[31m")
                }
            };

            let suffix = build
                .message
                .as_ref()
                .map_or_else(String::new, |msg| format!(" ({msg})"));

            self.info(&format!("{color}{icon} {}{suffix}\x1b[0m", build.module));
        }

        println!();
        let total = ok + dry_run + failed;
        self.info(&format!(
            "{total} modules: \x1b[32m{ok} ok\x1b[0m, \x1b[37m{dry_run} dry-run\x1b[0m, \x1b[31m{failed} failed\x1b[0m"
        ));

        if let Some(path) = &self.log_file {
            self.info(&format!("\x1b[2mlog: {}\x1b[0m", path.display()));
        }
    }
}

impl Log for Logger {
    forward_log_methods!(stage, info, debug, warn, error, dry_run);

    fn record_build(&self, module: &str, status: BuildStatus, message: Option<&str>) {
        self.record_build(module, status, message);
    }
}
