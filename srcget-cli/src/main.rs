//! srcget CLI - fetch packages as source archives.

mod commands;
mod error;

use clap::{ArgAction, Parser, Subcommand};
use console::style;

use commands::config::ConfigCommands;
use commands::get::GetArgs;
use commands::path::PathArgs;
use error::CliError;

#[derive(Debug, Parser)]
#[command(
    name = "srcget",
    version,
    about = "Download and install packages without a version control tool"
)]
struct Cli {
    /// Increase logging (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Download and install packages
    Get(GetArgs),

    /// View or modify configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Print the install directory of a package
    Path(PathArgs),
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Get(args) => commands::get::run(args),
        Commands::Config(command) => commands::config::run(command),
        Commands::Path(args) => commands::path::run(args),
    }
}

fn main() {
    let cli = Cli::parse();
    srcget::logging::init(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{} {}", style("error:").red().bold(), e);
        std::process::exit(1);
    }
}
