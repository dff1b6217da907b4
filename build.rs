use std::fs;
use std::path::Path;
use std::process::Command;

const BUILD_FILE: &str = "BUILD_NUMBER";
const VERSION_FILE: &str = "VERSION";

fn read_trimmed(path: &str) -> Option<String> {
    fs::read_to_string(Path::new(path))
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Bump the persisted counter; a missing or garbled file restarts at 1
fn next_build_number() -> u64 {
    let previous = read_trimmed(BUILD_FILE)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0);
    let next = previous + 1;
    fs::write(BUILD_FILE, next.to_string()).expect("Failed to write build number");
    next
}

fn short_git_hash() -> String {
    Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "unknown".to_string())
}

fn main() {
    let version =
        read_trimmed(VERSION_FILE).unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());
    let profile = match std::env::var("PROFILE").as_deref() {
        Ok("release") => "release",
        _ => "development",
    };

    for (key, value) in [
        ("COLUMNAR_VERSION", version),
        ("COLUMNAR_BUILD", next_build_number().to_string()),
        ("COLUMNAR_PROFILE", profile.to_string()),
        ("COLUMNAR_GIT_HASH", short_git_hash()),
    ] {
        println!("cargo:rustc-env={}={}", key, value);
    }

    println!("cargo:rerun-if-changed={}", BUILD_FILE);
    println!("cargo:rerun-if-changed={}", VERSION_FILE);
    println!("cargo:rerun-if-env-changed=PROFILE");
}
