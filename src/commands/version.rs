//! Command: print version information.

/// Version string: the build-time `PACKAGER_VERSION` if set, else the crate version.
#[must_use]
pub fn version() -> &'static str {
    option_env!("PACKAGER_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Print the packager version to stdout.
#[allow(clippy::print_stdout)]
pub fn run() {
    println!("puppet-packager {}", version());
}
