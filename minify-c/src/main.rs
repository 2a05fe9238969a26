//! Minifies a single C source file: lexes it, parses it against the
//! built-in C grammar, renames declared identifiers to short symbols,
//! and reprints the result with minimal whitespace on stdout.

use std::fs;
use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;

/// C minifier.
#[derive(Parser, Debug)]
#[command(name = "minify-c")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Minifies a C source file and writes the result to stdout")]
struct Cli {
    /// Path to the C source file to minify.
    path: std::path::PathBuf,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let source = fs::read_to_string(&cli.path)
        .with_context(|| format!("reading {}", cli.path.display()))?;

    // Undefined-use warnings are logged by the renamer itself as it walks
    // the tree; `report.undefined_uses` is available here for a caller
    // that wants the list, not for re-logging it.
    let (minified, _report) = ebnfc_core::minify_c(&source)
        .with_context(|| format!("minifying {}", cli.path.display()))?;

    let mut stdout = io::stdout();
    writeln!(stdout, "{minified}").context("writing minified output to stdout")?;
    Ok(())
}
