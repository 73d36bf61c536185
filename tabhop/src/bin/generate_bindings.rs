//! Generate UniFFI bindings for the TabHop host shell
//!
//! Run: cargo run --bin generate-bindings [swift|kotlin|python] [out_dir]
//!
//! ┌─────────────────────────────────────────────────────────────────────────────┐
//! │ DEPENDENCY MAP                                                              │
//! │                                                                             │
//! │ Inputs:                                                                     │
//! │   target/release/libtabhop.{dylib,so}  ← Built library for bindgen          │
//! │                                                                             │
//! │ Outputs (default out_dir = generated/):                                     │
//! │   generated/tabhop.swift | tabhop.kt | tabhop.py  ← Language bindings       │
//! │   generated/tabhopFFI.h, tabhopFFI.modulemap      ← Swift only              │
//! └─────────────────────────────────────────────────────────────────────────────┘

use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

const LANGUAGES: &[&str] = &["swift", "kotlin", "python"];

fn main() {
    let args: Vec<String> = env::args().collect();
    let language = args.get(1).map(String::as_str).unwrap_or("swift");
    if !LANGUAGES.contains(&language) {
        panic!("Unsupported language {language:?}, expected one of {LANGUAGES:?}");
    }

    let rust_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let out_dir = args
        .get(2)
        .map(PathBuf::from)
        .unwrap_or_else(|| rust_dir.join("generated"));
    std::fs::create_dir_all(&out_dir).expect("Failed to create output directory");

    println!("Building Rust library...");
    run_cmd("cargo", &["build", "--release", "--lib"], &rust_dir);

    let library = library_path(&rust_dir);
    println!("Generating {language} bindings from {}...", library.display());
    run_cmd(
        "cargo",
        &[
            "run",
            "--bin",
            "uniffi-bindgen",
            "generate",
            "--library",
            &library.to_string_lossy(),
            "--language",
            language,
            "--out-dir",
            &out_dir.to_string_lossy(),
        ],
        &rust_dir,
    );

    println!("Done! Bindings written to {}", out_dir.display());
}

/// Workspace target dir holds the cdylib; extension depends on the platform
fn library_path(rust_dir: &Path) -> PathBuf {
    let file = if cfg!(target_os = "macos") {
        "libtabhop.dylib"
    } else if cfg!(target_os = "windows") {
        "tabhop.dll"
    } else {
        "libtabhop.so"
    };
    rust_dir
        .parent()
        .expect("No parent directory")
        .join("target")
        .join("release")
        .join(file)
}

fn run_cmd(program: &str, args: &[&str], dir: &Path) {
    let status = Command::new(program)
        .args(args)
        .current_dir(dir)
        .status()
        .unwrap_or_else(|e| panic!("Failed to run {}: {}", program, e));

    if !status.success() {
        panic!("{} failed with status: {}", program, status);
    }
}
