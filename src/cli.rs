//! Minimal CLI: grammar → <output_dir>/<base_name>.rs
use std::path::PathBuf;
use anyhow::{Context, Result};
use clap::{Args, Parser, ValueEnum};
use colored::Colorize;

use crate::error::Error;
use crate::grammar::Grammar;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// Generates the AST node enums and visitor traits for the interpreter.
#[derive(Parser, Debug)]
#[command(name = "astgen", version)]
pub struct CommandLineInterface {
    /// existing, writable directory the module is written into
    output_dir: PathBuf,

    #[command(flatten)]
    source: GrammarSource,

    /// reject malformed grammars (duplicate names, unboxed recursion, ...) instead of emitting them
    #[arg(long, default_value_t = false)]
    strict: bool,

    /// print the module to stdout instead of writing it
    #[arg(long, default_value_t = false)]
    stdout: bool,

    /// debugging
    #[arg(long)]
    no_op: bool,
}

#[derive(Args, Debug, Clone)]
#[group(multiple = false)]
struct GrammarSource {
    /// JSON grammar file (families, root and base name)
    #[arg(long, short)]
    grammar: Option<PathBuf>,

    /// built-in grammar used when no file is given
    #[arg(long, value_enum, default_value_t = Preset::Program)]
    preset: Preset,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// expressions only; single `Expr` root, writes `expr.rs`
    Expr,
    /// expressions and statements; `Vec<Box<Stmt>>` root, writes `ast.rs`
    Program,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl Preset {
    pub fn grammar(self) -> Grammar {
        match self {
            Preset::Expr => Grammar::expr_preset(),
            Preset::Program => Grammar::program_preset(),
        }
    }
}

impl GrammarSource {
    fn load(&self) -> Result<Grammar> {
        match self.grammar.as_ref() {
            Some(path) => Ok(Grammar::load(path)?),
            None => Ok(self.preset.grammar()),
        }
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> Result<()> {
        // debug path
        if self.no_op {
            eprintln!("{self:#?}");
            return Ok(())
        }

        // 1) grammar
        let grammar = self.source.load()?;

        // 2) optional structural checks
        if self.strict {
            let diagnostics = crate::validate::check(&grammar);
            if !diagnostics.is_empty() {
                for diagnostic in &diagnostics {
                    eprintln!("{}: {diagnostic}", "warning".yellow().bold());
                }
                return Err(Error::Invalid(diagnostics).into());
            }
        }

        // 3) emit
        if self.stdout {
            print!("{}", crate::emit::render(&grammar));
            return Ok(())
        }
        let path = crate::sink::generate(&self.output_dir, &grammar)
            .with_context(|| format!("failed to generate into `{}`", self.output_dir.display()))?;
        eprintln!(
            "{} {} ({} families, {} variants)",
            "generated".green().bold(),
            path.display(),
            grammar.families.len(),
            grammar.variant_count(),
        );
        Ok(())
    }
}
