//! Build script: embed the git hash and sanity-check GPU toolchains.
//!
//! The GPU checks run before whisper-rs-sys compiles, so a missing toolkit
//! fails with a direct message instead of pages of cmake output.

use std::process::Command;

fn main() {
    // Embed git short hash for version string
    if let Ok(output) = Command::new("git")
        .args(["rev-parse", "--short=7", "HEAD"])
        .output()
        && output.status.success()
    {
        let hash = String::from_utf8_lossy(&output.stdout).trim().to_string();
        println!("cargo:rustc-env=GIT_HASH={}", hash);
    }
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/heads/");

    if cfg!(feature = "cuda") && !tool_exists("nvcc", &["--version"]) {
        panic!(
            "`nvcc` not found — the CUDA toolkit is not installed.\n\
             Install it from https://developer.nvidia.com/cuda-downloads\n\
             or build without CUDA: cargo build --release"
        );
    }

    if cfg!(feature = "vulkan") && !tool_exists("vulkaninfo", &["--summary"]) {
        panic!(
            "`vulkaninfo` not found — the Vulkan SDK is not installed.\n\
             Install it from https://vulkan.lunarg.com/\n\
             or build without Vulkan: cargo build --release"
        );
    }

    if cfg!(feature = "hipblas") && !tool_exists("rocminfo", &[]) {
        panic!(
            "`rocminfo` not found — ROCm is not installed.\n\
             Install it from https://rocm.docs.amd.com/\n\
             or build without HipBLAS: cargo build --release"
        );
    }
}

fn tool_exists(tool: &str, args: &[&str]) -> bool {
    Command::new(tool)
        .args(args)
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}
