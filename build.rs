use std::env;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=.git/HEAD");

    let git_hash = command_output("git", &["rev-parse", "--short", "HEAD"]);
    let git_status = command_output("git", &["status", "--porcelain"])
        .map(|changes| if changes.is_empty() { "clean" } else { "dirty" }.to_string());
    let rustc = command_output("rustc", &["--version"]);
    let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);

    emit("AUTOVALUE_BUILD_HASH", git_hash.filter(|hash| !hash.is_empty()));
    emit("AUTOVALUE_BUILD_STATUS", git_status);
    emit("AUTOVALUE_BUILD_TIMESTAMP", Some(timestamp));
    emit("AUTOVALUE_BUILD_TARGET", env::var("TARGET").ok());
    emit("AUTOVALUE_BUILD_PROFILE", env::var("PROFILE").ok());
    emit("AUTOVALUE_BUILD_RUSTC", rustc);
}

fn emit(key: &str, value: Option<String>) {
    let value = value.unwrap_or_else(|| "unknown".to_string());
    println!("cargo:rustc-env={key}={value}");
}

/// Trimmed stdout of a successful command, `None` when it fails or is missing.
fn command_output(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|text| text.trim().to_string())
}
