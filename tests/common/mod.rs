// Shared helpers for integration tests.
//
// Provides a temporary Puppet workspace and fake `fpm` executors so each
// integration test can package modules without the real tool installed.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Result, bail};

use puppet_packager::cli::GlobalOpts;
use puppet_packager::exec::{ExecResult, Executor};

/// An isolated workspace backed by a [`tempfile::TempDir`].
pub struct Workspace {
    /// Temporary directory acting as `$WORKSPACE`.
    pub root: tempfile::TempDir,
}

impl Workspace {
    /// Create an empty workspace.
    pub fn new() -> Self {
        Self {
            root: tempfile::tempdir().expect("create temp dir"),
        }
    }

    /// Create an empty workspace under the current directory, so it can be
    /// addressed by a relative path.
    pub fn in_current_dir() -> Self {
        Self {
            root: tempfile::Builder::new()
                .prefix("packager-ws-")
                .tempdir_in(".")
                .expect("create temp dir"),
        }
    }

    /// Workspace path relative to the current directory.
    pub fn relative_path(&self) -> PathBuf {
        PathBuf::from(self.path().file_name().expect("temp dir name"))
    }

    /// Path to the workspace root.
    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Add a module directory with a manifest and an optional Modulefile version.
    pub fn with_module(self, name: &str, version: Option<&str>) -> Self {
        let dir = self.path().join(name);
        std::fs::create_dir_all(dir.join("manifests")).expect("create module dir");
        std::fs::write(
            dir.join("manifests/init.pp"),
            format!("class {name} {{}}\n"),
        )
        .expect("write init.pp");
        if let Some(version) = version {
            std::fs::write(
                dir.join("Modulefile"),
                format!("name 'cegeka-{name}'\nversion '{version}'\n"),
            )
            .expect("write Modulefile");
        }
        self
    }

    /// Write `packager.toml` at the workspace root.
    pub fn with_settings(self, content: &str) -> Self {
        std::fs::write(self.path().join("packager.toml"), content).expect("write settings");
        self
    }

    /// Global options pointing at this workspace with build number 42.
    pub fn global(&self) -> GlobalOpts {
        GlobalOpts {
            workspace: Some(self.path().to_path_buf()),
            build_number: Some("42".to_string()),
            config: None,
            dry_run: false,
            parallel: true,
        }
    }

    /// Path of an artifact in a module's dist folder.
    pub fn dist(&self, module: &str, file: &str) -> PathBuf {
        self.path().join(module).join("target/dist").join(file)
    }
}

/// One recorded fpm invocation.
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Working directory the command ran in.
    pub dir: PathBuf,
    /// Full argument vector.
    pub args: Vec<String>,
}

/// Executor that behaves like fpm: it names the artifact with fpm's own
/// conventions and fails when the source module directory is missing.
#[derive(Default)]
pub struct FakeFpm {
    /// Every invocation, in call order.
    pub calls: Mutex<Vec<Invocation>>,
    /// Pretend fpm is not installed.
    pub missing: bool,
    /// Modules for which fpm exits non-zero.
    pub failing: Vec<String>,
}

impl FakeFpm {
    /// A fake that reports itself as not installed.
    pub fn not_installed() -> Self {
        Self {
            missing: true,
            ..Self::default()
        }
    }

    /// A fake that fails for the given modules.
    pub fn failing_for(modules: &[&str]) -> Self {
        Self {
            failing: modules.iter().map(ToString::to_string).collect(),
            ..Self::default()
        }
    }

    /// Recorded invocations.
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().expect("calls lock").clone()
    }
}

fn exited(code: i32, stderr: &str) -> ExecResult {
    ExecResult {
        stderr: format!("{stderr}\n"),
        success: false,
        code: Some(code),
        ..ExecResult::default()
    }
}

fn flag<'a>(args: &'a [String], name: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == name)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

impl Executor for FakeFpm {
    fn run_in_unchecked(&self, dir: &Path, _program: &str, args: &[String]) -> Result<ExecResult> {
        self.calls.lock().expect("calls lock").push(Invocation {
            dir: dir.to_path_buf(),
            args: args.to_vec(),
        });

        let (Some(kind), Some(name), Some(version), Some(iteration), Some(arch), Some(source)) = (
            flag(args, "-t"),
            flag(args, "-n"),
            flag(args, "-v"),
            flag(args, "--iteration"),
            flag(args, "-a"),
            flag(args, "-C"),
        ) else {
            bail!("fpm: missing required flags");
        };
        let Some(module) = args.last() else {
            bail!("fpm: no source path");
        };
        if self.failing.contains(module) {
            return Ok(exited(1, "Process failed: tar returned 2"));
        }
        // fpm resolves `-C` against its own working directory.
        if !dir.join(source).join(module).is_dir() {
            return Ok(exited(1, &format!("no such directory: {source}/{module}")));
        }

        let file = match kind {
            "deb" => format!("{name}_{version}-{iteration}_{arch}.deb"),
            "rpm" => format!("{name}-{version}-{iteration}.{arch}.rpm"),
            other => bail!("fpm: unsupported target {other}"),
        };
        std::fs::write(dir.join(&file), format!("{kind} package of {module}"))?;

        Ok(ExecResult {
            stdout: format!("Created package {{:path=>\"{file}\"}}\n"),
            success: true,
            code: Some(0),
            ..ExecResult::default()
        })
    }

    fn which(&self, _program: &str) -> bool {
        !self.missing
    }
}
