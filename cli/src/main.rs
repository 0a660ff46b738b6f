//! LazyScript tools CLI.
//!
//! Stands in for an editor host: `check` and `fmt` run the compiler and
//! formatter once per file, `watch` keeps files "open" and republishes
//! diagnostics as they change on disk.
//!
//! ```text
//! main() -> Context::load() -> check::run | fmt::run | watch::run
//!                                  |            |           |
//!                              Validator    Formatter   DiagnosticsService
//! ```
//!
//! Results go to stdout; logs go to stderr (`RUST_LOG`, default `warn`).

mod check;
mod fmt;
mod watch;

use std::{
    env,
    io::stderr,
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt as tracing_fmt, prelude::*};

use lazyscript_config::LazyscriptConfig;
use lazyscript_tools::Toolchain;

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))
        .unwrap_or_else(|_| EnvFilter::new("error"));

    tracing_subscriber::registry()
        .with(tracing_fmt::layer().with_writer(stderr))
        .with(env_filter)
        .init();
}

#[derive(Parser, Debug)]
#[command(name = "lazyscript-tools", version)]
#[command(about = "Compiler diagnostics and formatting for LazyScript sources", long_about = None)]
struct Cli {
    /// Config file [default: <workspace>/.lazyscript.toml, then ~/.lazyscript/config.toml]
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Workspace folder searched for in-tree tools under `src/` (repeatable)
    #[arg(short = 'w', long = "workspace", global = true)]
    workspaces: Vec<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compile files and print their diagnostics
    Check {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Print diagnostics as JSON
        #[arg(long)]
        json: bool,
    },
    /// Format files (to stdout unless --check or --write)
    Fmt {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Print a diff and fail if any file is not formatted
        #[arg(long, conflicts_with = "write")]
        check: bool,

        /// Rewrite files in place
        #[arg(long)]
        write: bool,
    },
    /// Revalidate files whenever they change on disk
    Watch {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// How often to look for changes, in milliseconds
        #[arg(long, default_value_t = 250)]
        poll_ms: u64,
    },
}

/// Everything a command needs: configuration and resolved tools.
pub(crate) struct Context {
    config: LazyscriptConfig,
    toolchain: Toolchain,
}

impl Context {
    fn load(config_path: Option<&Path>, workspaces: Vec<PathBuf>) -> Result<Self> {
        let workspaces = if workspaces.is_empty() {
            vec![env::current_dir().context("cannot determine current directory")?]
        } else {
            workspaces
        };

        let config = match config_path {
            Some(path) => LazyscriptConfig::load_from(path)?,
            None => LazyscriptConfig::discover(workspaces.first().map(PathBuf::as_path))?,
        };
        let toolchain = Toolchain::from_config(&config, &workspaces);

        Ok(Self { config, toolchain })
    }
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let ctx = Context::load(cli.config.as_deref(), cli.workspaces)?;

    match cli.command {
        Command::Check { files, json } => check::run(&ctx, &files, json).await,
        Command::Fmt {
            files,
            check,
            write,
        } => {
            let mode = if check {
                fmt::Mode::Check
            } else if write {
                fmt::Mode::Write
            } else {
                fmt::Mode::Stdout
            };
            fmt::run(&ctx, &files, mode).await
        }
        Command::Watch { files, poll_ms } => watch::run(&ctx, &files, poll_ms).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}
