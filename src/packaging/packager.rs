//! Builds one module package by running fpm in an isolated directory.
use std::path::{Path, PathBuf};

use super::PackageType;
use super::plan::{BuildPlan, RELEASE};
use crate::config::{Environment, Settings};
use crate::error::{ConfigError, FsError, PackagerError, ToolError};
use crate::exec::{Executor, display_command};
use crate::fs;
use crate::logging::Log;

/// Packages modules of one workspace in one format.
///
/// Naming conventions are fixed at construction. Each [`Packager::build`]
/// call works in its own temporary directory and never touches the process
/// working directory, so calls for different modules may run concurrently.
#[derive(Debug, Clone)]
pub struct Packager {
    package_type: PackageType,
    environment: Environment,
    settings: Settings,
}

/// A successfully built artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOutcome {
    /// The plan the artifact was built from.
    pub plan: BuildPlan,
    /// Final artifact path.
    pub artifact: PathBuf,
}

impl BuildOutcome {
    /// Confirmation message naming the artifact.
    #[must_use]
    pub fn message(&self) -> String {
        format!("Created {}", self.artifact.display())
    }
}

impl Packager {
    /// Create a packager from already resolved parts.
    #[must_use]
    pub const fn new(package_type: PackageType, environment: Environment, settings: Settings) -> Self {
        Self {
            package_type,
            environment,
            settings,
        }
    }

    /// Create a packager for `selector` (`"rpm"` or `"deb"`) from the
    /// process environment, with default settings.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `WORKSPACE` or `BUILD_NUMBER` is missing
    /// or the selector is unknown.
    pub fn from_env(selector: &str) -> Result<Self, ConfigError> {
        Self::from_lookup(selector, |key| std::env::var(key).ok())
    }

    /// Like [`Packager::from_env`], reading variables through `lookup`.
    ///
    /// # Errors
    ///
    /// See [`Packager::from_env`].
    pub fn from_lookup(
        selector: &str,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let environment = Environment::resolve(None, None, lookup)?;
        let package_type = selector.parse()?;
        Ok(Self::new(package_type, environment, Settings::default()))
    }

    /// Package format.
    #[must_use]
    pub const fn package_type(&self) -> PackageType {
        self.package_type
    }

    /// Workspace root.
    #[must_use]
    pub fn base_directory(&self) -> &Path {
        &self.environment.workspace
    }

    /// Package version, e.g. `0.0.42`.
    #[must_use]
    pub fn package_version(&self) -> String {
        self.environment.package_version()
    }

    /// Package release.
    #[must_use]
    pub const fn release(&self) -> &'static str {
        RELEASE
    }

    /// Architecture tag for the package format.
    #[must_use]
    pub const fn architecture(&self) -> &'static str {
        self.package_type.architecture()
    }

    /// Delimiter between name and version.
    #[must_use]
    pub const fn first_delimiter(&self) -> &'static str {
        self.package_type.first_delimiter()
    }

    /// Delimiter between release and architecture.
    #[must_use]
    pub const fn second_delimiter(&self) -> &'static str {
        self.package_type.second_delimiter()
    }

    /// Settings in effect.
    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Derive the build plan for `module` without side effects.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidModuleName`] for unusable module names.
    pub fn plan(&self, module: &str) -> Result<BuildPlan, ConfigError> {
        BuildPlan::derive(self.package_type, &self.environment, &self.settings, module)
    }

    /// Build the package for `module` and move it into the module's
    /// `target/dist` folder.
    ///
    /// Steps: derive the plan, create a temporary working directory, ensure
    /// the destination folder, run fpm inside the temporary directory, check
    /// the expected artifact exists, move it, remove the temporary directory.
    /// On failure the temporary directory is removed when its guard drops.
    ///
    /// # Errors
    ///
    /// Returns a [`PackagerError`] for an invalid module name, a filesystem
    /// failure, a failing fpm run, or a missing artifact.
    pub fn build(
        &self,
        module: &str,
        exec: &dyn Executor,
        log: &dyn Log,
    ) -> Result<BuildOutcome, PackagerError> {
        let plan = self.plan(module)?;

        let workdir = tempfile::Builder::new()
            .prefix("puppet-packager-")
            .tempdir()
            .map_err(|source| FsError::TempDir { source })?;
        log.debug(&format!(
            "{module}: working directory {}",
            workdir.path().display()
        ));

        fs::ensure_dir(&plan.destination_folder)?;

        log.debug(&format!(
            "{module}: {}",
            display_command(&plan.program, &plan.arguments)
        ));
        let result = exec
            .run_in_unchecked(workdir.path(), &plan.program, &plan.arguments)
            .map_err(|e| ToolError::Spawn {
                program: plan.program.clone(),
                module: module.to_string(),
                reason: format!("{e:#}"),
            })?;
        if !result.success {
            return Err(ToolError::Failed {
                program: plan.program,
                module: module.to_string(),
                code: result.code,
                stderr: result.stderr,
            }
            .into());
        }
        for line in result.stdout.lines().filter(|l| !l.trim().is_empty()) {
            log.debug(&format!("{module}: {line}"));
        }

        let produced = workdir.path().join(&plan.destination_file);
        if !produced.is_file() {
            log.debug(&format!(
                "{module}: working directory holds [{}]",
                fs::list_file_names(workdir.path()).join(", ")
            ));
            return Err(ToolError::MissingArtifact { path: produced }.into());
        }

        let artifact = plan.destination_path();
        fs::move_file(&produced, &artifact)?;

        let workdir_path = workdir.path().to_path_buf();
        workdir.close().map_err(|source| FsError::Cleanup {
            path: workdir_path,
            source,
        })?;

        Ok(BuildOutcome { plan, artifact })
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::exec::{ExecResult, MockExecutor};
    use crate::logging::BuildStatus;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// Log that keeps debug messages for inspection.
    #[derive(Default)]
    struct RecordingLog {
        debug: Mutex<Vec<String>>,
    }

    impl Log for RecordingLog {
        fn stage(&self, _msg: &str) {}
        fn info(&self, _msg: &str) {}
        fn debug(&self, msg: &str) {
            self.debug.lock().unwrap().push(msg.to_string());
        }
        fn warn(&self, _msg: &str) {}
        fn error(&self, _msg: &str) {}
        fn dry_run(&self, _msg: &str) {}
        fn record_build(&self, _module: &str, _status: BuildStatus, _message: Option<&str>) {}
    }

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn packager(workspace: &Path, package_type: PackageType) -> Packager {
        Packager::new(
            package_type,
            Environment {
                workspace: workspace.to_path_buf(),
                build_number: "42".to_string(),
            },
            Settings::default(),
        )
    }

    fn ok() -> ExecResult {
        ExecResult {
            success: true,
            code: Some(0),
            ..ExecResult::default()
        }
    }

    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    #[test]
    fn construction_requires_workspace() {
        for selector in ["rpm", "deb"] {
            let err = Packager::from_lookup(selector, lookup(&[("BUILD_NUMBER", "42")]))
                .unwrap_err();
            assert!(matches!(err, ConfigError::MissingVariable("WORKSPACE")));
        }
    }

    #[test]
    fn construction_requires_build_number() {
        for selector in ["rpm", "deb"] {
            let err =
                Packager::from_lookup(selector, lookup(&[("WORKSPACE", "/ws")])).unwrap_err();
            assert!(matches!(err, ConfigError::MissingVariable("BUILD_NUMBER")));
        }
    }

    #[test]
    fn construction_rejects_unknown_selector() {
        let err = Packager::from_lookup(
            "tgz",
            lookup(&[("WORKSPACE", "/ws"), ("BUILD_NUMBER", "42")]),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPackageType(_)));
    }

    #[test]
    fn rpm_conventions() {
        let p = Packager::from_lookup("rpm", lookup(&[("WORKSPACE", "/ws"), ("BUILD_NUMBER", "42")]))
            .unwrap();
        assert_eq!(p.first_delimiter(), "-");
        assert_eq!(p.second_delimiter(), ".");
        assert_eq!(p.architecture(), "noarch");
        assert_eq!(p.package_version(), "0.0.42");
        assert_eq!(p.release(), "1");
        assert_eq!(p.base_directory(), Path::new("/ws"));
    }

    #[test]
    fn deb_conventions() {
        let p = Packager::from_lookup("deb", lookup(&[("WORKSPACE", "/ws"), ("BUILD_NUMBER", "42")]))
            .unwrap();
        assert_eq!(p.first_delimiter(), "_");
        assert_eq!(p.second_delimiter(), "_");
        assert_eq!(p.architecture(), "all");
        assert_eq!(p.package_type(), PackageType::Deb);
    }

    #[test]
    fn plan_names_for_users_module() {
        let deb = packager(Path::new("/ws"), PackageType::Deb).plan("users").unwrap();
        assert_eq!(deb.destination_file, "cegeka-puppet-users_0.0.42-1_all.deb");
        assert_eq!(deb.destination_folder, PathBuf::from("/ws/users/target/dist"));

        let rpm = packager(Path::new("/ws"), PackageType::Rpm).plan("users").unwrap();
        assert_eq!(rpm.destination_file, "cegeka-puppet-users-0.0.42-1.noarch.rpm");
    }

    // -----------------------------------------------------------------------
    // Build
    // -----------------------------------------------------------------------

    #[test]
    fn build_moves_artifact_and_removes_workdir() {
        let ws = tempfile::tempdir().unwrap();
        let p = packager(ws.path(), PackageType::Deb);
        let seen: Arc<Mutex<Option<PathBuf>>> = Arc::default();
        let seen_in_mock = Arc::clone(&seen);

        let mut exec = MockExecutor::new();
        exec.expect_run_in_unchecked()
            .withf(|_, program, args| {
                program == "fpm" && args.last().map(String::as_str) == Some("users")
            })
            .times(1)
            .returning(move |dir, _, _| {
                std::fs::write(dir.join("cegeka-puppet-users_0.0.42-1_all.deb"), "pkg").unwrap();
                *seen_in_mock.lock().unwrap() = Some(dir.to_path_buf());
                Ok(ok())
            });

        let outcome = p.build("users", &exec, &RecordingLog::default()).unwrap();

        let expected = ws
            .path()
            .join("users/target/dist/cegeka-puppet-users_0.0.42-1_all.deb");
        assert_eq!(outcome.artifact, expected);
        assert_eq!(std::fs::read_to_string(&expected).unwrap(), "pkg");
        assert_eq!(outcome.message(), format!("Created {}", expected.display()));

        let workdir = seen.lock().unwrap().clone().unwrap();
        assert!(!workdir.exists(), "temporary directory should be removed");
    }

    #[test]
    fn build_does_not_change_process_directory() {
        let ws = tempfile::tempdir().unwrap();
        let before = std::env::current_dir().unwrap();
        let mut exec = MockExecutor::new();
        exec.expect_run_in_unchecked().returning(|dir, _, _| {
            std::fs::write(dir.join("cegeka-puppet-ntp-0.0.42-1.noarch.rpm"), "").unwrap();
            Ok(ok())
        });

        packager(ws.path(), PackageType::Rpm)
            .build("ntp", &exec, &RecordingLog::default())
            .unwrap();

        assert_eq!(std::env::current_dir().unwrap(), before);
    }

    #[test]
    fn failing_tool_propagates_and_leaves_no_artifact() {
        let ws = tempfile::tempdir().unwrap();
        let seen: Arc<Mutex<Option<PathBuf>>> = Arc::default();
        let seen_in_mock = Arc::clone(&seen);
        let mut exec = MockExecutor::new();
        exec.expect_run_in_unchecked().times(1).returning(move |dir, _, _| {
            *seen_in_mock.lock().unwrap() = Some(dir.to_path_buf());
            Ok(ExecResult {
                stderr: "Process failed: tar returned 2\n".to_string(),
                success: false,
                code: Some(1),
                ..ExecResult::default()
            })
        });

        let p = packager(ws.path(), PackageType::Deb);
        let err = p.build("users", &exec, &RecordingLog::default()).unwrap_err();

        assert!(
            matches!(
                &err,
                PackagerError::Tool(ToolError::Failed { module, code: Some(1), stderr, .. })
                    if module == "users" && stderr.contains("tar returned 2")
            ),
            "unexpected error: {err}"
        );
        assert!(!p.plan("users").unwrap().destination_path().exists());
        let workdir = seen.lock().unwrap().clone().unwrap();
        assert!(!workdir.exists(), "temporary directory should be removed on failure");
    }

    #[test]
    fn spawn_error_is_reported_separately() {
        let ws = tempfile::tempdir().unwrap();
        let mut exec = MockExecutor::new();
        exec.expect_run_in_unchecked()
            .times(1)
            .returning(|_, _, _| Err(anyhow::anyhow!("failed to execute: fpm")));

        let err = packager(ws.path(), PackageType::Rpm)
            .build("users", &exec, &RecordingLog::default())
            .unwrap_err();

        assert!(matches!(
            err,
            PackagerError::Tool(ToolError::Spawn { ref reason, .. }) if reason.contains("failed to execute")
        ));
    }

    #[test]
    fn relative_workspace_is_passed_to_fpm_as_absolute() {
        let p = Packager::from_lookup(
            "deb",
            lookup(&[("WORKSPACE", "relative_ws"), ("BUILD_NUMBER", "42")]),
        )
        .unwrap();
        let expected = std::env::current_dir().unwrap().join("relative_ws");

        let plan = p.plan("users").unwrap();
        let source = plan
            .arguments
            .windows(2)
            .find(|w| w[0] == "-C")
            .map(|w| PathBuf::from(&w[1]))
            .unwrap();

        assert!(source.is_absolute(), "-C must not depend on fpm's working directory");
        assert_eq!(source, expected);
        assert_eq!(plan.destination_folder, expected.join("users/target/dist"));
    }

    #[test]
    fn missing_artifact_is_reported() {
        let ws = tempfile::tempdir().unwrap();
        let mut exec = MockExecutor::new();
        exec.expect_run_in_unchecked().times(1).returning(|dir, _, _| {
            std::fs::write(dir.join("cegeka-puppet-users_0.0.42_all.deb"), "").unwrap();
            Ok(ok())
        });
        let log = RecordingLog::default();

        let err = packager(ws.path(), PackageType::Deb)
            .build("users", &exec, &log)
            .unwrap_err();

        assert!(matches!(
            err,
            PackagerError::Tool(ToolError::MissingArtifact { .. })
        ));
        let debug = log.debug.lock().unwrap();
        assert!(
            debug
                .iter()
                .any(|m| m.contains("cegeka-puppet-users_0.0.42_all.deb")),
            "produced files should be logged: {debug:?}"
        );
    }

    #[test]
    fn invalid_module_fails_before_side_effects() {
        let ws = tempfile::tempdir().unwrap();
        let mut exec = MockExecutor::new();
        exec.expect_run_in_unchecked().never();

        let err = packager(ws.path(), PackageType::Rpm)
            .build("../escape", &exec, &RecordingLog::default())
            .unwrap_err();

        assert!(matches!(
            err,
            PackagerError::Config(ConfigError::InvalidModuleName { .. })
        ));
        assert_eq!(std::fs::read_dir(ws.path()).unwrap().count(), 0);
    }

    #[test]
    fn destination_folder_blocked_by_file_is_filesystem_error() {
        let ws = tempfile::tempdir().unwrap();
        std::fs::write(ws.path().join("users"), "not a directory").unwrap();
        let mut exec = MockExecutor::new();
        exec.expect_run_in_unchecked().never();

        let err = packager(ws.path(), PackageType::Deb)
            .build("users", &exec, &RecordingLog::default())
            .unwrap_err();

        assert!(matches!(
            err,
            PackagerError::Filesystem(FsError::CreateDir { .. })
        ));
    }
}
