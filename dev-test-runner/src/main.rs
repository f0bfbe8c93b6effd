//! Regenerates every built-in and shipped grammar twice into scratch
//! directories and byte-compares the artifacts.
use std::path::Path;
use anyhow::{bail, Context, Result};
use colored::Colorize;
use tempfile::TempDir;

use astgen::Grammar;

fn grammars() -> Result<Vec<(String, Grammar)>> {
    let mut out = vec![
        ("preset:expr".to_string(), Grammar::expr_preset()),
        ("preset:program".to_string(), Grammar::program_preset()),
    ];
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("grammars");
    let mut files = std::fs::read_dir(&dir)
        .with_context(|| format!("cannot list `{}`", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect::<Vec<_>>();
    files.sort();
    for path in files {
        let grammar = Grammar::load(&path)?;
        out.push((path.display().to_string(), grammar));
    }
    Ok(out)
}

fn run() -> Result<()> {
    let mut failures = 0usize;
    for (label, grammar) in grammars()? {
        astgen::validate::ensure_well_formed(&grammar)
            .with_context(|| format!("{label} is not well formed"))?;
        let (first, second) = (TempDir::new()?, TempDir::new()?);
        let a = astgen::sink::generate(first.path(), &grammar)?;
        let b = astgen::sink::generate(second.path(), &grammar)?;
        let (a, b) = (std::fs::read(&a)?, std::fs::read(&b)?);
        let summary = serde_json::json!({
            "grammar": label,
            "families": grammar.families.len(),
            "variants": grammar.variant_count(),
            "bytes": a.len(),
        });
        if a == b {
            eprintln!("✅ {} {summary}", "stable".green());
        } else {
            failures += 1;
            eprintln!("❌ {} {summary}", "drift".red());
        }
    }
    if failures > 0 {
        bail!("{failures} grammar(s) produced different output across runs");
    }
    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("{}: {error:#}", "error".red().bold());
        std::process::exit(1);
    }
}
