use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use colored::Colorize;
use depguess::Result;
use std::io;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "depguess")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Guess the npm packages a source tree imports", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Show per-file diagnostics
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the external packages imported under a directory
    Guess(depguess::cli::guess::GuessArgs),

    /// Print raw import paths before classification
    Imports(depguess::cli::imports::ImportsArgs),

    /// Show how raw import paths map to package names
    Classify(depguess::cli::classify::ClassifyArgs),

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins over --verbose
    let level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("depguess={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("{}", format!("Error: failed to create tokio runtime: {}", e).red());
            std::process::exit(1);
        }
    };

    if let Err(e) = runtime.block_on(run_async(cli)) {
        eprintln!("{}", format!("Error: {:#}", e).red());
        std::process::exit(1);
    }
}

async fn run_async(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Guess(args) => {
            depguess::cli::guess::run(args).await?;
        }

        Commands::Imports(args) => {
            depguess::cli::imports::run(args).await?;
        }

        Commands::Classify(args) => {
            depguess::cli::classify::run(args)?;
        }

        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "depguess", &mut io::stdout());
        }
    }

    Ok(())
}
