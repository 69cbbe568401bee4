//! Custom cargo commands for the match engine.
//!
//! Usage:
//!   cargo xtask verify    - Run full verification suite
//!   cargo xtask test      - Run all tests
//!   cargo xtask check     - Quick check (check + test + clippy)
//!   cargo xtask bench     - Run benchmarks

use anyhow::{bail, Context, Result};
use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Contracts every match must keep calling. Each needs a call site outside `src/verify/`.
const CONTRACTS: &[&str] = &[
    "check_advanced",
    "check_skipped",
    "check_weight",
    "check_within_max",
    "check_distinct_global_ids",
    "check_global_id",
    "check_count_bounds",
    "check_ranked_order",
];

/// BM25 parameters as named in the doc table and in the `BM25_DEFAULT_*` constants.
const BM25_PARAMS: &[&str] = &["k1", "k2", "k3", "b", "min_normlen"];

fn main() -> Result<()> {
    let task = env::args().nth(1);
    match task.as_deref() {
        Some("verify") => verify()?,
        Some("test") => test()?,
        Some("check") => check()?,
        Some("bench") => bench()?,
        _ => print_help(),
    }
    Ok(())
}

fn print_help() {
    eprintln!(
        r#"
cargo xtask <COMMAND>

Commands:
  verify    Run full verification suite (contracts + tests + clippy + constants)
  test      Run all Rust tests
  check     Quick check (cargo check + test + clippy)
  bench     Run benchmarks
"#
    );
}

/// Full verification suite
fn verify() -> Result<()> {
    println!("==========================================");
    println!("Match Engine Verification Suite");
    println!("==========================================\n");

    println!("[1/4] Checking contract call sites...");
    check_contract_call_sites()?;
    println!("✓ Every contract is called\n");

    println!("[2/4] Running Rust tests...");
    run_cargo(&["test", "--quiet"])?;
    println!("✓ All Rust tests passed\n");

    println!("[3/4] Running clippy...");
    run_cargo(&["clippy", "--quiet", "--", "-D", "warnings"])?;
    println!("✓ Clippy passed\n");

    println!("[4/4] Verifying BM25 defaults against their documentation...");
    verify_constants()?;
    println!("✓ Constants aligned\n");

    println!("==========================================");
    println!("✓ ALL VERIFICATION CHECKS PASSED");
    println!("==========================================");

    Ok(())
}

/// Run all tests
fn test() -> Result<()> {
    run_cargo(&["test"])
}

fn check() -> Result<()> {
    println!("Running quick checks...\n");

    println!("[1/3] cargo check...");
    run_cargo(&["check"])?;

    println!("[2/3] cargo test...");
    run_cargo(&["test", "--quiet"])?;

    println!("[3/3] cargo clippy...");
    run_cargo(&["clippy", "--quiet", "--", "-D", "warnings"])?;

    println!("\n✓ Quick checks passed");
    Ok(())
}

fn bench() -> Result<()> {
    run_cargo(&["bench"])
}

// ============================================================================
// Helper functions
// ============================================================================

fn project_root() -> Result<PathBuf> {
    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => env::current_dir().context("no current directory")?,
    };

    // xtask is in project_root/xtask, so go up one level
    let root = manifest_dir.parent().unwrap_or(&manifest_dir);
    Ok(root.to_path_buf())
}

fn run_cargo(args: &[&str]) -> Result<()> {
    let root = project_root()?;

    let status = Command::new("cargo")
        .args(args)
        .current_dir(&root)
        .status()
        .with_context(|| format!("Failed to run cargo {:?}", args))?;

    if !status.success() {
        bail!("cargo {:?} failed", args);
    }

    Ok(())
}

fn rust_sources(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
        let path = entry?.path();
        if path.is_dir() {
            rust_sources(&path, out)?;
        } else if path.extension().is_some_and(|e| e == "rs") {
            out.push(path);
        }
    }
    Ok(())
}

/// Someone deleting a contract call from the matcher should fail CI, not go unnoticed.
fn check_contract_call_sites() -> Result<()> {
    let src = project_root()?.join("src");
    let verify_dir = src.join("verify");

    let mut files = Vec::new();
    rust_sources(&src, &mut files)?;

    let mut missing = Vec::new();
    for contract in CONTRACTS {
        let call = format!("{}(", contract);
        let mut found = false;
        for file in files.iter().filter(|f| !f.starts_with(&verify_dir)) {
            let text = std::fs::read_to_string(file)
                .with_context(|| format!("reading {}", file.display()))?;
            if text.contains(&call) {
                found = true;
                break;
            }
        }
        if !found {
            missing.push(*contract);
        }
    }

    if !missing.is_empty() {
        bail!("contracts with no call site outside src/verify: {:?}", missing);
    }
    Ok(())
}

/// The `BM25_DEFAULT_*` constants must match the table in the module docs.
fn verify_constants() -> Result<()> {
    let path = project_root()?.join("src/scoring/bm25.rs");
    let bm25 = std::fs::read_to_string(&path).context("Failed to read scoring/bm25.rs")?;

    for param in BM25_PARAMS {
        let constant = extract_constant(&bm25, &format!("BM25_DEFAULT_{}", param.to_uppercase()))
            .with_context(|| format!("no BM25_DEFAULT constant for {}", param))?;
        let documented = extract_doc_default(&bm25, param)
            .with_context(|| format!("no doc table row for {}", param))?;
        if (constant - documented).abs() > f64::EPSILON {
            bail!(
                "BM25 {}: constant is {} but the docs say {}",
                param,
                constant,
                documented
            );
        }
        println!("  {:<12} {}", param, constant);
    }
    Ok(())
}

fn extract_constant(content: &str, name: &str) -> Option<f64> {
    // pub const BM25_DEFAULT_K1: f64 = 1.0;
    let prefix = format!("pub const {}:", name);
    content
        .lines()
        .find(|line| line.trim_start().starts_with(&prefix))
        .and_then(|line| line.split('=').nth(1))
        .and_then(|v| v.trim().trim_end_matches(';').trim().parse().ok())
}

fn extract_doc_default(content: &str, param: &str) -> Option<f64> {
    // //! | k1           | 1.0     | wdf saturation ...
    content.lines().find_map(|line| {
        let row = line.trim_start().strip_prefix("//!")?.trim();
        let mut cells = row.strip_prefix('|')?.split('|').map(str::trim);
        if cells.next()? != param {
            return None;
        }
        cells.next()?.parse().ok()
    })
}
