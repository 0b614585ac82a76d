// SPDX-License-Identifier: MIT OR Apache-2.0
use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use errview_config::{ResolverConfig, load_config, validate_config};
use schemars::schema_for;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "xtask", version, about = "Repo maintenance tasks")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate the JSON Schema for the resolver configuration file.
    Schema {
        /// Output directory.
        #[arg(long, default_value = "contracts/schemas")]
        out_dir: PathBuf,
    },
    /// Load and validate a resolver configuration file.
    CheckConfig {
        /// Path to the TOML file.
        path: PathBuf,
        /// Treat warnings as errors.
        #[arg(long)]
        strict: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Schema { out_dir } => schema(&out_dir),
        Command::CheckConfig { path, strict } => check_config(&path, strict),
    }
}

fn schema(out_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(out_dir).context("create schema output dir")?;

    let config = schema_for!(ResolverConfig);
    write_schema(&out_dir.join("resolver_config.schema.json"), &config)?;

    eprintln!("wrote schemas to {}", out_dir.display());
    Ok(())
}

fn write_schema(path: &Path, schema: &schemars::Schema) -> Result<()> {
    let s = serde_json::to_string_pretty(schema)?;
    std::fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

fn check_config(path: &Path, strict: bool) -> Result<()> {
    let config = load_config(Some(path)).with_context(|| format!("load {}", path.display()))?;
    let warnings = validate_config(&config).with_context(|| format!("validate {}", path.display()))?;

    for w in &warnings {
        println!("warning: {w}");
    }
    if strict && !warnings.is_empty() {
        bail!("{} warning(s) in {}", warnings.len(), path.display());
    }
    println!(
        "ok: {} kind mapping(s), {} code mapping(s)",
        config.exception_mappings.len(),
        config.error_code_mappings.len()
    );
    Ok(())
}
