// SPDX-License-Identifier: GPL-3.0-only

use std::process::Command;

fn main() {
    println!("cargo::rerun-if-changed=.git/HEAD");
    println!("cargo::rerun-if-changed=.git/refs/tags");
    println!("cargo::rerun-if-env-changed=CAPTURE_BRIDGE_VERSION");

    // Packagers can pin the version explicitly
    let version = if let Ok(v) = std::env::var("CAPTURE_BRIDGE_VERSION") {
        v
    } else {
        git_version().unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string())
    };

    println!("cargo::rustc-env=GIT_VERSION={}", version);
}

/// Turn `git describe` output into `<tag>-<hash>` or `<tag>-dirty-<hash>`.
fn git_version() -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--tags", "--always", "--match", "v*"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }

    let described = String::from_utf8_lossy(&output.stdout).trim().to_string();
    let described = described.strip_prefix('v').unwrap_or(&described);

    let parts: Vec<&str> = described.rsplitn(3, '-').collect();
    if parts.len() >= 3 {
        let hash = parts[0].strip_prefix('g').unwrap_or(parts[0]);
        return Some(format!("{}-dirty-{}", parts[2], hash));
    }

    // No tag reachable: describe fell back to a bare hash
    if !described.contains('.') {
        return Some(format!("{}-{}", env!("CARGO_PKG_VERSION"), described));
    }

    let hash = commit_hash().unwrap_or_else(|| "unknown".to_string());
    Some(format!("{}-{}", described, hash))
}

fn commit_hash() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()?;

    output
        .status
        .success()
        .then(|| String::from_utf8_lossy(&output.stdout).trim().to_string())
}
