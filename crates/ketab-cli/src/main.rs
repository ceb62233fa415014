//! Ketab CLI - publish books as signed events and inspect book directories.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::Level;

mod commands;
mod keys;
mod output;

use commands::{add_to_library, check_event, delete_threads, publish, status, validate};

#[derive(Parser)]
#[command(name = "ketab")]
#[command(about = "Publish books as addressable, cross-referencing events", version)]
struct Cli {
    /// Hex-encoded secp256k1 secret key of the signing identity (the same
    /// key a Nostr client uses; events carry BIP-340 Schnorr signatures)
    #[arg(long, global = true, env = "KETAB_SECRET_KEY", hide_env_values = true)]
    secret_key: Option<String>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Publish units, chapters, the book and its library
    Publish(publish::PublishArgs),
    /// Check a book directory for structural problems
    Validate {
        /// Book directory
        dir: std::path::PathBuf,
    },
    /// Summarize a book directory
    Status {
        /// Book directory
        dir: std::path::PathBuf,
    },
    /// Request deletion of chapter discussion threads
    DeleteThreads(delete_threads::DeleteThreadsArgs),
    /// Add a book to your library
    AddToLibrary(add_to_library::AddToLibraryArgs),
    /// Run the schema validator on an event stored as JSON
    CheckEvent {
        /// Event file
        file: std::path::PathBuf,
    },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Validate { dir } => validate::run(&dir),
        Commands::Status { dir } => status::run(&dir),
        Commands::CheckEvent { file } => check_event::run(&file),
        Commands::Publish(args) => {
            let keypair = keys::resolve(cli.secret_key.as_deref())?;
            block_on(publish::run(args, keypair))
        }
        Commands::DeleteThreads(args) => {
            let keypair = keys::resolve(cli.secret_key.as_deref())?;
            block_on(delete_threads::run(args, keypair))
        }
        Commands::AddToLibrary(args) => {
            let keypair = keys::resolve(cli.secret_key.as_deref())?;
            block_on(add_to_library::run(args, keypair))
        }
    }
}

/// Drive one command on a single-threaded runtime.
fn block_on<F: std::future::Future<Output = anyhow::Result<()>>>(future: F) -> anyhow::Result<()> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?
        .block_on(future)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
