//! hashrev CLI — content-hash revisioning for static assets.
//!
//! Provides `hashrev build` for copying a directory of assets to an output
//! directory under fingerprinted names with a revision manifest, and
//! `hashrev hash` for printing the fingerprints of individual files.

#![warn(missing_docs)]

mod build;
mod hash;
mod logging;
mod pipeline;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// hashrev — cache-busting file names for build artifacts.
#[derive(Parser, Debug)]
#[command(name = "hashrev", version, about = "Content-hash asset revisioning")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a custom `hashrev.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Revision every file in a directory and write a manifest.
    Build(BuildArgs),
    /// Print the fingerprint of each file.
    Hash(HashArgs),
}

/// Arguments for the `hashrev build` subcommand.
#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Directory containing the files to revision.
    pub src: PathBuf,

    /// Directory the revisioned files and the manifest are written to.
    #[arg(short, long)]
    pub out: PathBuf,

    /// Keep file names and reference files with `?v=<fingerprint>`.
    #[arg(long)]
    pub hash_in_query: bool,

    /// Merge with the manifest already present in the output directory.
    #[arg(long)]
    pub merge: bool,

    /// Do not write a manifest.
    #[arg(long)]
    pub no_manifest: bool,

    /// Manifest path relative to the output directory.
    #[arg(long)]
    pub manifest_path: Option<PathBuf>,
}

/// Arguments for the `hashrev hash` subcommand.
#[derive(Parser, Debug)]
pub struct HashArgs {
    /// Files to fingerprint.
    #[arg(required = true)]
    pub files: Vec<PathBuf>,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to a custom config file.
    pub config: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => stderr_is_terminal(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
    };

    logging::init(&global);

    let result = match cli.command {
        Command::Build(ref args) => build::run(args, &global),
        Command::Hash(ref args) => hash::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

fn stderr_is_terminal() -> bool {
    use std::io::IsTerminal;
    std::io::stderr().is_terminal()
}
