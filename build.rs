use std::process::Command;

fn main() {
    set_build_info();

    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=Cargo.toml");
    println!("cargo:rerun-if-env-changed=TCPING_GIT_COMMIT");
}

fn set_build_info() {
    let build_time = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
    println!("cargo:rustc-env=TCPING_BUILD_TIME={}", build_time);

    // Packagers building from a tarball can inject the commit directly
    if let Ok(commit) = std::env::var("TCPING_GIT_COMMIT") {
        println!("cargo:rustc-env=TCPING_GIT_COMMIT={}", commit);
        return;
    }

    if let Ok(output) = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
    {
        if output.status.success() {
            let commit = String::from_utf8_lossy(&output.stdout).trim().to_string();
            if !commit.is_empty() {
                println!("cargo:rustc-env=TCPING_GIT_COMMIT={}", commit);
            }
        }
    }
}
