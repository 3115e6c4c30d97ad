//! Stamps the `vocard` binary with its build identity
//!
//! `GIT_HASH`, `BUILD_PROFILE` and `BUILD_TIMESTAMP` go into the startup log
//! line; `VOCARD_LONG_VERSION` is what `vocard --version` prints.

use std::process::Command;

fn git_short_hash() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short=8", "HEAD"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let hash = String::from_utf8(output.stdout).ok()?;
    let hash = hash.trim();
    (!hash.is_empty()).then(|| hash.to_string())
}

fn main() {
    let git_hash = git_short_hash().unwrap_or_else(|| "unknown".to_string());
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());
    let built_at = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
    let version = std::env::var("CARGO_PKG_VERSION").unwrap_or_default();

    println!("cargo:rustc-env=GIT_HASH={}", git_hash);
    println!("cargo:rustc-env=BUILD_PROFILE={}", profile);
    println!("cargo:rustc-env=BUILD_TIMESTAMP={}", built_at);
    println!(
        "cargo:rustc-env=VOCARD_LONG_VERSION={} ({} {}, built {})",
        version, git_hash, profile, built_at
    );
}
