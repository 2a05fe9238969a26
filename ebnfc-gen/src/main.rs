//! Reads an EBNF grammar from stdin, loads and validates it, and
//! writes a generated Rust parser configuration to stdout.

mod codegen;

use std::io::{self, Read, Write};

use anyhow::{bail, Context, Result};
use clap::Parser;

/// Parser generator: turns an EBNF grammar into a Rust source module.
#[derive(Parser, Debug)]
#[command(name = "ebnfc-gen")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Generates a parser configuration from an EBNF grammar read on stdin")]
struct Cli {
    /// Rule name to embed as the generated module's `START_RULE`.
    /// Defaults to the first rule declared in the grammar.
    #[arg(long)]
    start: Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut source = String::new();
    io::stdin()
        .read_to_string(&mut source)
        .context("reading EBNF grammar from stdin")?;

    let grammar = ebnfc_core::load_grammar(&source).context("loading EBNF grammar")?;

    let start_rule = match cli.start {
        Some(name) => name,
        None => match grammar.rules().first() {
            Some(rule) => rule.name.clone(),
            None => bail!("grammar declares no rules; nothing to generate"),
        },
    };

    if grammar.rule(&start_rule).is_none() {
        bail!("start rule {start_rule:?} is not defined in the grammar");
    }

    let generated = codegen::generate(&grammar, &start_rule);
    io::stdout()
        .write_all(generated.as_bytes())
        .context("writing generated parser to stdout")?;
    Ok(())
}
