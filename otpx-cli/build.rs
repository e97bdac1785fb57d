use std::process::Command;

fn git_short_sha(repo_root: &str) -> Option<String> {
    let out = Command::new("git")
        .args(["-C", repo_root, "rev-parse", "--short", "HEAD"])
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    let sha = String::from_utf8_lossy(&out.stdout).trim().to_string();
    (!sha.is_empty()).then_some(sha)
}

fn main() {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let repo_root = format!("{}/..", manifest_dir);

    let sha = git_short_sha(&repo_root).unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rerun-if-changed={}/.git/HEAD", repo_root);
    println!("cargo:rustc-env=OTPX_BUILD_SHA={}", sha);
}
