//! Build script: embeds version information at compile time.

use std::process::Command;

fn main() {
    // Prefer PACKAGER_VERSION if set (e.g., by the CI release job),
    // otherwise fall back to git describe for local development builds.
    if let Ok(version) = std::env::var("PACKAGER_VERSION") {
        println!("cargo:rustc-env=PACKAGER_VERSION={version}");
    } else if let Ok(output) = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        && output.status.success()
    {
        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        println!("cargo:rustc-env=PACKAGER_VERSION={version}");
    }

    // Re-run if git HEAD changes or env var changes
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");
    println!("cargo:rerun-if-env-changed=PACKAGER_VERSION");
}
