//! oxide-ddl CLI
//!
//! Reads a YAML schema and writes the PostgreSQL DDL for it.

use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use oxide_ddl::prelude::*;

/// Generate PostgreSQL DDL from a YAML entity-relationship schema.
#[derive(Parser)]
#[command(name = "oxide-ddl")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Schema file.
    #[arg(env = "OXIDE_DDL_SCHEMA", default_value = "Structure.yaml")]
    schema: PathBuf,

    /// Output file, or `-` for stdout.
    #[arg(short, long, env = "OXIDE_DDL_OUTPUT", default_value = "output.sql")]
    output: PathBuf,

    /// Require every entity to declare a relation to every other entity.
    #[arg(long)]
    strict: bool,

    /// Validate and generate without writing any output.
    #[arg(long)]
    check: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so `-o -` output stays clean.
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .without_time()
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let mut generator = Generator::with_options(GeneratorOptions { strict: cli.strict });

    generator
        .load_file(&cli.schema)
        .with_context(|| format!("Failed to load {}", cli.schema.display()))?;
    generator
        .generate()
        .with_context(|| format!("Failed to generate DDL for {}", cli.schema.display()))?;

    if cli.check {
        info!("Schema is valid; no output written (--check).");
        return Ok(());
    }

    if cli.output.as_os_str() == "-" {
        generator.dump(&mut io::stdout().lock())?;
    } else {
        generator
            .dump_to_file(&cli.output)
            .with_context(|| format!("Failed to write {}", cli.output.display()))?;
    }

    Ok(())
}
