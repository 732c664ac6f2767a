mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tagres", version, about = "Tagged result values and status tag registry")]
struct Cli {
    /// JSON catalog of extra tags to declare on top of the built-in ones
    #[arg(short = 'c', long = "catalog", global = true, value_name = "PATH")]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List declared tags with their aliases
    Tags,
    /// List every generated accessor name
    Accessors,
    /// Build a result through a constructor and inspect it
    Eval {
        /// Constructor name (primary tag or alias)
        constructor: String,
        /// Payload as JSON; anything that is not valid JSON is taken as a string
        #[arg(long = "value", value_name = "JSON")]
        value: Option<String>,
        /// Predicate accessors to evaluate, e.g. `ok?` (repeatable)
        #[arg(long = "check", value_name = "NAME?")]
        checks: Vec<String>,
        /// Continuation accessors to evaluate, e.g. `ok_then` (repeatable)
        #[arg(long = "then", value_name = "NAME_then")]
        thens: Vec<String>,
        /// Print the `[status, value]` pair instead of the mapping
        #[arg(long = "pair")]
        pair: bool,
    },
}

pub(crate) fn run() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    commands::prepare_registry(cli.catalog.as_deref())?;

    match cli.command {
        Command::Tags => commands::cmd_tags(),
        Command::Accessors => commands::cmd_accessors(),
        Command::Eval {
            constructor,
            value,
            checks,
            thens,
            pair,
        } => commands::cmd_eval(&constructor, value.as_deref(), &checks, &thens, pair),
    }
}
