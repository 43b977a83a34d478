mod commands;
mod config;
mod diag;
mod logging;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

use config::Config;
use diag::DiagDir;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// State diagram to state machine model compiler.
#[derive(Parser)]
#[command(name = "fsmgen", version, about = "State diagram to state machine model compiler")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Log pipeline progress to stderr (debug level)
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a diagram and print its parse tree
    Parse {
        /// Path to the diagram source file
        file: PathBuf,
    },

    /// Build a diagram into model JSON
    Build {
        /// Path to the diagram source file
        file: PathBuf,
        /// Write the model JSON here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
        /// Reject transitions to undeclared states
        #[arg(long)]
        strict: bool,
        /// State machine id (prefix of every entity id)
        #[arg(long)]
        id: Option<String>,
        /// Write parse tree, model and full log into this directory
        #[arg(long)]
        diag: Option<PathBuf>,
    },

    /// Validate model JSON against the model schema
    Validate {
        /// Path to the model JSON file
        model: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match config::read_config(path) {
            Ok(c) => c,
            Err(msg) => {
                report_error(&msg, cli.output, cli.quiet);
                process::exit(1);
            }
        },
        None => Config::default(),
    };

    // Only `build` writes a diagnostics directory; it has to exist before
    // the subscriber is installed so the log file layer can be attached.
    let diag = match &cli.command {
        Commands::Build { diag, .. } => diag.clone().or_else(|| config.diagnostics.dir.clone()),
        _ => None,
    };
    let diag = match diag.map(|dir| DiagDir::create(&dir)).transpose() {
        Ok(d) => d,
        Err(msg) => {
            report_error(&msg, cli.output, cli.quiet);
            process::exit(1);
        }
    };

    let level = if cli.verbose {
        Some("debug")
    } else {
        config.logging.level.as_deref()
    };
    if let Err(msg) = logging::init(level, diag.as_ref()) {
        report_error(&msg, cli.output, cli.quiet);
        process::exit(1);
    }

    match cli.command {
        Commands::Parse { file } => {
            commands::parse::cmd_parse(&file, cli.output, cli.quiet);
        }
        Commands::Build {
            file,
            out,
            strict,
            id,
            diag: _,
        } => {
            commands::build::cmd_build(
                commands::build::BuildArgs {
                    file: &file,
                    out: out.as_deref(),
                    strict,
                    id: id.as_deref(),
                    diag: diag.as_ref(),
                },
                &config,
                cli.output,
                cli.quiet,
            );
        }
        Commands::Validate { model } => {
            commands::validate::cmd_validate(&model, cli.output, cli.quiet);
        }
    }
}

pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}
