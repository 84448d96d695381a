//! Loom CLI: builds templated web artifacts with the provider pipeline.
//!
//! `loom build` runs the full pipeline against a recording backend and prints
//! one line per result, `loom resources` shows how global resource files are
//! grouped, and `loom resolve` looks up external assemblies in the configured
//! probe paths.

#![warn(missing_docs)]

mod build;
mod pipeline;
mod resolve;
mod resources;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

/// Loom: a build-provider pipeline for templated web artifacts.
#[derive(Parser, Debug)]
#[command(name = "loom", version, about = "Loom build pipeline")]
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

    /// Path to a `loom.toml` file or the directory holding one.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build artifacts of the current project.
    Build(BuildArgs),
    /// Classify and group the resource files of a directory.
    Resources(ResourcesArgs),
    /// Resolve assembly names against the configured probe paths.
    Resolve(ResolveArgs),
}

/// Arguments for the `loom build` subcommand.
#[derive(Parser, Debug)]
pub struct BuildArgs {
    /// Artifacts to build, relative to the project root. Builds every
    /// artifact with a configured provider when omitted.
    pub files: Vec<String>,
}

/// Arguments for the `loom resources` subcommand.
#[derive(Parser, Debug)]
pub struct ResourcesArgs {
    /// Directory holding the resource files.
    #[arg(default_value = "App_GlobalResources")]
    pub dir: PathBuf,

    /// Also list every file with its kind.
    #[arg(short, long)]
    pub list: bool,
}

/// Arguments for the `loom resolve` subcommand.
#[derive(Parser, Debug)]
pub struct ResolveArgs {
    /// Assembly names, simple (`Site.Data`) or fully qualified
    /// (`Site.Data, Version=1.0.0.0`).
    #[arg(required = true)]
    pub names: Vec<String>,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Color when stderr is a terminal.
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
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to a config file or project directory.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let color = match cli.color {
        ColorChoice::Auto => std::io::stderr().is_terminal(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };
    let global = GlobalArgs {
        quiet: cli.quiet,
        color,
        config: cli.config,
    };

    let result = match cli.command {
        Command::Build(ref args) => build::run(args, &global),
        Command::Resources(ref args) => resources::run(args, &global),
        Command::Resolve(ref args) => resolve::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// `RUST_LOG` wins unless `--verbose` is given; the default level is `warn`.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_build_files() {
        let cli = Cli::parse_from(["loom", "build", "Default.aspx", "About.aspx"]);
        match cli.command {
            Command::Build(ref args) => assert_eq!(args.files, vec!["Default.aspx", "About.aspx"]),
            _ => panic!("expected Build command"),
        }
    }

    #[test]
    fn parse_build_everything() {
        let cli = Cli::parse_from(["loom", "build"]);
        match cli.command {
            Command::Build(ref args) => assert!(args.files.is_empty()),
            _ => panic!("expected Build command"),
        }
    }

    #[test]
    fn parse_resources_default_dir() {
        let cli = Cli::parse_from(["loom", "resources"]);
        match cli.command {
            Command::Resources(ref args) => {
                assert_eq!(args.dir, PathBuf::from("App_GlobalResources"));
                assert!(!args.list);
            }
            _ => panic!("expected Resources command"),
        }
    }

    #[test]
    fn parse_resolve_requires_a_name() {
        assert!(Cli::try_parse_from(["loom", "resolve"]).is_err());
        let cli = Cli::parse_from(["loom", "resolve", "Site.Data, Version=1.0.0.0"]);
        match cli.command {
            Command::Resolve(ref args) => assert_eq!(args.names, vec!["Site.Data, Version=1.0.0.0"]),
            _ => panic!("expected Resolve command"),
        }
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::parse_from(["loom", "--verbose", "--color", "never", "--config", "site/loom.toml", "build"]);
        assert!(cli.verbose);
        assert!(!cli.quiet);
        assert_eq!(cli.color, ColorChoice::Never);
        assert_eq!(cli.config.as_deref(), Some("site/loom.toml"));
    }
}
