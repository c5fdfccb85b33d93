use std::env;
use std::process::Command;

const RUSTC_VERSION_ENV: &str = "GUIDELIGHT_RUSTC_VERSION";
const UNKNOWN_VERSION: &str = "unknown";

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=RUSTC");

    // The User-Agent reports the compiler that built the client, the closest
    // thing a native binary has to a runtime version.
    let rustc = env::var("RUSTC").unwrap_or_else(|_| String::from("rustc"));
    let version = Command::new(rustc)
        .arg("--version")
        .output()
        .ok()
        .filter(|o| o.status.success())
        .and_then(|o| String::from_utf8(o.stdout).ok())
        .and_then(|out| parse_rustc_version(&out))
        .unwrap_or_else(|| String::from(UNKNOWN_VERSION));

    println!("cargo:rustc-env={RUSTC_VERSION_ENV}={version}");
}

/// "rustc 1.85.0 (4d91de4e4 2025-02-17)" -> "1.85.0"
fn parse_rustc_version(output: &str) -> Option<String> {
    output
        .split_whitespace()
        .nth(1)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
